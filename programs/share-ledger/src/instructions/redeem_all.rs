// =============================================================================
// Redeem All Instruction
// =============================================================================
// Full liquidation, used to migrate the whole pool off the yield source.
// Withdraws the entire position, sends everything in the vault to the admin
// and resets the totals. The exchange rate is left at its last value.
// =============================================================================

use anchor_lang::prelude::*;

use crate::state::RedeemAllOutcome;

use super::LedgerOperation;

pub fn handler_redeem_all(ctx: Context<LedgerOperation>) -> Result<RedeemAllOutcome> {
    let mut market = ctx.accounts.lending_market();
    let mut underlying = ctx.accounts.underlying_transfer();

    let ledger = &mut ctx.accounts.ledger;
    let outcome = ledger.redeem_all(&mut market, &mut underlying)?;

    msg!("Shares burned: {}", outcome.shares_burned);
    msg!("Underlying returned: {}", outcome.underlying_amount);

    Ok(outcome)
}
