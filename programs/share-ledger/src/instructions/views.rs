// =============================================================================
// Read-Only Instructions
// =============================================================================
// Callable by anyone. Results are returned through return data; no account
// is written.
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::LEDGER_SEED;
use crate::error::LedgerError;
use crate::external::PositionOracle;
use crate::state::Ledger;

#[derive(Accounts)]
pub struct LedgerView<'info> {
    #[account(
        seeds = [LEDGER_SEED, ledger.underlying_mint.as_ref()],
        bump = ledger.bump
    )]
    pub ledger: Account<'info, Ledger>,
}

#[derive(Accounts)]
pub struct ExchangeRateView<'info> {
    #[account(
        seeds = [LEDGER_SEED, ledger.underlying_mint.as_ref()],
        bump = ledger.bump
    )]
    pub ledger: Account<'info, Ledger>,

    /// CHECK: Must be the recorded position, owner and layout checked on read
    #[account(
        constraint = yield_position.key() == ledger.yield_position @ LedgerError::InvalidYieldPosition
    )]
    pub yield_position: UncheckedAccount<'info>,
}

/// Exchange rate with pending interest folded in, computed on a copy
pub fn handler_exchange_rate_stored(ctx: Context<ExchangeRateView>) -> Result<u128> {
    let position = ctx.accounts.yield_position.to_account_info();
    let oracle = PositionOracle {
        position: &position,
        yield_source_program: ctx.accounts.ledger.yield_source_program,
        ledger: ctx.accounts.ledger.key(),
    };

    let rate = ctx.accounts.ledger.exchange_rate(&oracle)?;
    msg!("Exchange rate: {} (scale {})", rate, ctx.accounts.ledger.scale);

    Ok(rate)
}

pub fn handler_accrue_interest(ctx: Context<LedgerView>) -> Result<bool> {
    Ok(ctx.accounts.ledger.accrue_interest())
}

pub fn handler_underlying(ctx: Context<LedgerView>) -> Result<Pubkey> {
    Ok(ctx.accounts.ledger.underlying())
}
