// =============================================================================
// Invest Underlying Instruction
// =============================================================================
// Flow:
// 1. Snapshot the yield source balance and fold pending interest into the rate
// 2. Pull `amount` from the admin into the vault
// 3. Deposit it into the lending market
// 4. Mint shares for the balance increase the market actually reports
//
// shares_minted = (after - before) * scale / rate
// =============================================================================

use anchor_lang::prelude::*;

use crate::error::LedgerError;

use super::LedgerOperation;

pub fn handler_invest_underlying(ctx: Context<LedgerOperation>, amount: u64) -> Result<u64> {
    require!(amount > 0, LedgerError::InvalidAmount);
    require!(
        ctx.accounts.admin_token_account.amount >= amount,
        LedgerError::InsufficientBalance
    );

    msg!("Investing {} underlying", amount);

    let mut market = ctx.accounts.lending_market();
    let mut underlying = ctx.accounts.underlying_transfer();

    let ledger = &mut ctx.accounts.ledger;
    let shares_minted = ledger.invest(amount, &mut market, &mut underlying)?;

    msg!("Shares minted: {}", shares_minted);
    msg!("Total staked: {}", ledger.total_staked());
    msg!("Recorded balance: {}", ledger.last_recorded_balance);

    Ok(shares_minted)
}
