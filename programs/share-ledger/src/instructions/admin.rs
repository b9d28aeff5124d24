// =============================================================================
// Admin Instructions
// =============================================================================
// Configuration changes only the ledger admin can make. None of them touch
// the accounting state.
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::LedgerError;
use crate::state::Ledger;

// =============================================================================
// Referral Code
// =============================================================================

/// Accounts required for set_referral_code instruction
#[derive(Accounts)]
pub struct SetReferralCode<'info> {
    /// The admin must sign
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
}

/// Update the referral code forwarded to the lending market on deposits
pub fn handler_set_referral_code(ctx: Context<SetReferralCode>, referral_code: u16) -> Result<()> {
    let ledger = &mut ctx.accounts.ledger;
    let old_code = ledger.referral_code;

    ledger.set_referral_code(referral_code);

    msg!("Referral code: {} -> {}", old_code, ledger.referral_code);

    Ok(())
}

// =============================================================================
// Admin Transfer
// =============================================================================

/// Accounts required for transfer_admin instruction
#[derive(Accounts)]
pub struct TransferAdmin<'info> {
    /// The current admin must sign
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

    /// The new admin
    /// CHECK: This is just the new admin address, we just store it
    pub new_admin: UncheckedAccount<'info>,
}

/// Hand the ledger to a new admin. Takes effect immediately.
pub fn handler_transfer_admin(ctx: Context<TransferAdmin>) -> Result<()> {
    let ledger = &mut ctx.accounts.ledger;
    let old_admin = ledger.admin;

    ledger.transfer_admin(ctx.accounts.new_admin.key())?;

    msg!("Admin transfer completed");
    msg!("Old admin: {}", old_admin);
    msg!("New admin: {}", ledger.admin);

    Ok(())
}
