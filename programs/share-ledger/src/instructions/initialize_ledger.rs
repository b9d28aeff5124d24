// =============================================================================
// Initialize Ledger Instruction
// =============================================================================
// Creates the share ledger for one underlying mint.
//
// Creates:
// - Ledger account (PDA ["ledger", underlying_mint])
// - Vault token account (PDA ["vault", ledger]), owned by the ledger PDA
//
// Validates the yield source before anything is stored: the program must be
// executable and the position must be a lending position owned by that
// program and assigned to this ledger. A bad reference aborts construction.
// =============================================================================

use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::*;
use crate::error::LedgerError;
use crate::external::read_position_balance;
use crate::state::{Ledger, LedgerConfig};

/// Accounts required for the initialize_ledger instruction.
#[derive(Accounts)]
pub struct InitializeLedger<'info> {
    /// The admin who will control the ledger
    /// Pays for account creation and is stored as ledger.admin
    #[account(mut)]
    pub admin: Signer<'info>,

    #[account(
        init,
        payer = admin,
        space = 8 + Ledger::INIT_SPACE,
        seeds = [LEDGER_SEED, underlying_mint.key().as_ref()],
        bump
    )]
    pub ledger: Account<'info, Ledger>,

    /// The underlying asset (e.g., USDC)
    pub underlying_mint: Account<'info, Mint>,

    #[account(
        init,
        payer = admin,
        token::mint = underlying_mint,
        token::authority = ledger,
        seeds = [VAULT_SEED, ledger.key().as_ref()],
        bump
    )]
    pub vault: Account<'info, TokenAccount>,

    /// CHECK: Only needs to be an executable program, verified below
    #[account(
        constraint = yield_source_program.key() != Pubkey::default() @ LedgerError::InvalidYieldSource,
        constraint = yield_source_program.executable @ LedgerError::InvalidYieldSource
    )]
    pub yield_source_program: UncheckedAccount<'info>,

    /// CHECK: Owner and layout verified in the handler
    pub yield_position: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
}

/// Handler function for initialize_ledger
pub fn handler_initialize_ledger(ctx: Context<InitializeLedger>, referral_code: u16) -> Result<()> {
    let ledger_key = ctx.accounts.ledger.key();
    let yield_source_program = ctx.accounts.yield_source_program.key();

    // Fails unless the position belongs to the yield source and names this ledger
    let position_balance = read_position_balance(
        &ctx.accounts.yield_position.to_account_info(),
        &yield_source_program,
        &ledger_key,
    )?;

    let ledger = &mut ctx.accounts.ledger;
    ledger.initialize(LedgerConfig {
        admin: ctx.accounts.admin.key(),
        underlying_mint: ctx.accounts.underlying_mint.key(),
        vault: ctx.accounts.vault.key(),
        yield_source_program,
        yield_position: ctx.accounts.yield_position.key(),
        decimals: ctx.accounts.underlying_mint.decimals,
        referral_code,
        bump: ctx.bumps.ledger,
        vault_bump: ctx.bumps.vault,
    })?;

    msg!("Share ledger initialized");
    msg!("Ledger: {}", ledger_key);
    msg!("Underlying Mint: {}", ledger.underlying_mint);
    msg!("Vault: {}", ledger.vault);
    msg!("Yield Source: {}", ledger.yield_source_program);
    msg!("Yield Position: {} (balance {})", ledger.yield_position, position_balance);
    msg!("Scale: {}, Referral Code: {}", ledger.scale, ledger.referral_code);

    Ok(())
}
