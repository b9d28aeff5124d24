// =============================================================================
// Ledger Operation Accounts
// =============================================================================
// invest_underlying, redeem_underlying and redeem_all touch the same accounts:
// the admin's token account, the ledger vault and the lending market.
// =============================================================================

use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::*;
use crate::error::LedgerError;
use crate::external::{LendingMarket, SplUnderlying};
use crate::state::Ledger;

/// Accounts shared by every state-mutating ledger operation
#[derive(Accounts)]
pub struct LedgerOperation<'info> {
    /// Only the ledger admin may move funds
    #[account(
        constraint = admin.key() == ledger.admin @ LedgerError::AdminOnly
    )]
    pub admin: Signer<'info>,

    #[account(
        mut,
        seeds = [LEDGER_SEED, ledger.underlying_mint.as_ref()],
        bump = ledger.bump
    )]
    pub ledger: Account<'info, Ledger>,

    /// Admin's underlying token account (source on invest, destination on redeem)
    #[account(
        mut,
        constraint = admin_token_account.mint == ledger.underlying_mint @ LedgerError::InvalidUnderlyingMint,
        constraint = admin_token_account.owner == admin.key() @ LedgerError::InvalidTokenAccountOwner
    )]
    pub admin_token_account: Account<'info, TokenAccount>,

    #[account(
        mut,
        seeds = [VAULT_SEED, ledger.key().as_ref()],
        bump = ledger.vault_bump
    )]
    pub vault: Account<'info, TokenAccount>,

    // =========================================================================
    // Lending Market Accounts
    // =========================================================================

    /// CHECK: Must be the yield source recorded at initialization
    #[account(
        constraint = yield_source_program.key() == ledger.yield_source_program @ LedgerError::InvalidYieldSource
    )]
    pub yield_source_program: UncheckedAccount<'info>,

    /// CHECK: Must be the position recorded at initialization, layout checked on read
    #[account(
        mut,
        constraint = yield_position.key() == ledger.yield_position @ LedgerError::InvalidYieldPosition
    )]
    pub yield_position: UncheckedAccount<'info>,

    /// CHECK: Lending market validates this
    #[account(mut)]
    pub reserve: UncheckedAccount<'info>,

    /// CHECK: Lending market validates this
    #[account(mut)]
    pub reserve_liquidity_supply: UncheckedAccount<'info>,

    pub token_program: Program<'info, Token>,
}

impl<'info> LedgerOperation<'info> {
    pub fn lending_market(&self) -> LendingMarket<'info> {
        LendingMarket {
            program: self.yield_source_program.to_account_info(),
            reserve: self.reserve.to_account_info(),
            position: self.yield_position.to_account_info(),
            reserve_liquidity_supply: self.reserve_liquidity_supply.to_account_info(),
            vault: self.vault.to_account_info(),
            ledger: self.ledger.to_account_info(),
            token_program: self.token_program.to_account_info(),
            underlying_mint: self.ledger.underlying_mint,
            ledger_bump: self.ledger.bump,
            referral_code: self.ledger.referral_code,
        }
    }

    pub fn underlying_transfer(&self) -> SplUnderlying<'info> {
        SplUnderlying {
            token_program: self.token_program.to_account_info(),
            vault: self.vault.to_account_info(),
            caller_token_account: self.admin_token_account.to_account_info(),
            caller: self.admin.to_account_info(),
            ledger: self.ledger.to_account_info(),
            underlying_mint: self.ledger.underlying_mint,
            ledger_bump: self.ledger.bump,
        }
    }
}
