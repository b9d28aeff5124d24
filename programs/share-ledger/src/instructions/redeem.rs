// =============================================================================
// Redeem Underlying Instruction
// =============================================================================
// Flow:
// 1. Snapshot the yield source balance and fold pending interest into the rate
// 2. Withdraw `amount` from the lending market into the vault
// 3. Burn shares for the balance decrease the market actually reports
// 4. Transfer `amount` from the vault to the admin
//
// shares_burned = (before - after) * scale / rate
//
// The ledger only tracks aggregate shares. Per-depositor entitlement is
// enforced by whoever holds the individual balances.
// =============================================================================

use anchor_lang::prelude::*;

use crate::error::LedgerError;

use super::LedgerOperation;

pub fn handler_redeem_underlying(ctx: Context<LedgerOperation>, amount: u64) -> Result<u64> {
    require!(amount > 0, LedgerError::InvalidAmount);

    msg!("Redeeming {} underlying", amount);

    let mut market = ctx.accounts.lending_market();
    let mut underlying = ctx.accounts.underlying_transfer();

    let ledger = &mut ctx.accounts.ledger;
    let shares_burned = ledger.redeem(amount, &mut market, &mut underlying)?;

    msg!("Shares burned: {}", shares_burned);
    msg!("Total staked: {}", ledger.total_staked());
    msg!("Recorded balance: {}", ledger.last_recorded_balance);

    Ok(shares_burned)
}
