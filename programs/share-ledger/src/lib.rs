// =============================================================================
// Share Ledger - Yield-Bearing Pool Accounting
// =============================================================================
//
// The share ledger tracks a pool's claims on a single lending market position:
// - The admin invests underlying, the ledger deposits it into the market and
//   records the claim as shares
// - Shares never grow in count, yield raises the exchange rate instead
// - Interest is discovered lazily by diffing the market's reported balance
//   against the last recorded checkpoint at the start of every operation
//
// This is the main entry point for the share ledger Anchor program.
// =============================================================================

pub mod constants;
pub mod error;
pub mod external;
pub mod instructions;
pub mod state;

use anchor_lang::prelude::*;

pub use constants::*;
pub use error::*;
pub use instructions::*;
pub use state::*;

declare_id!("DVeBmwD8DCvXghAiEkgBU54KKUYXgfnvfZjkfZ89wuJr");

/// The share ledger program module
///
/// Each function here corresponds to an instruction that can be sent to the program.
#[program]
pub mod share_ledger {
    use super::*;

    // =========================================================================
    // Setup
    // =========================================================================

    /// Create the ledger and its vault for one underlying mint
    ///
    /// # Arguments
    /// * `referral_code` - Referral metadata forwarded to the lending market
    ///
    /// Fails if the yield source program or position account is invalid.
    pub fn initialize_ledger(ctx: Context<InitializeLedger>, referral_code: u16) -> Result<()> {
        instructions::initialize_ledger::handler_initialize_ledger(ctx, referral_code)
    }

    // =========================================================================
    // Read-Only
    // =========================================================================

    /// Current exchange rate including interest not yet folded in
    ///
    /// # Returns
    /// * Value of one share in underlying base units, scaled by `scale`
    pub fn exchange_rate_stored(ctx: Context<ExchangeRateView>) -> Result<u128> {
        instructions::views::handler_exchange_rate_stored(ctx)
    }

    /// Strategy interface hook. Accrual is lazy, so this always returns true
    /// without touching state.
    pub fn accrue_interest(ctx: Context<LedgerView>) -> Result<bool> {
        instructions::views::handler_accrue_interest(ctx)
    }

    /// The underlying mint this ledger accounts for
    pub fn underlying(ctx: Context<LedgerView>) -> Result<Pubkey> {
        instructions::views::handler_underlying(ctx)
    }

    // =========================================================================
    // Accounting Operations (admin only)
    // =========================================================================

    /// Deposit underlying into the yield source and mint shares
    ///
    /// # Arguments
    /// * `amount` - Underlying to invest (in base units)
    ///
    /// # Returns
    /// * Shares minted for the balance increase the yield source reports
    pub fn invest_underlying(ctx: Context<LedgerOperation>, amount: u64) -> Result<u64> {
        instructions::invest::handler_invest_underlying(ctx, amount)
    }

    /// Withdraw underlying from the yield source and burn shares
    ///
    /// # Arguments
    /// * `amount` - Underlying to redeem (in base units)
    ///
    /// # Returns
    /// * Shares burned for the balance decrease the yield source reports
    pub fn redeem_underlying(ctx: Context<LedgerOperation>, amount: u64) -> Result<u64> {
        instructions::redeem::handler_redeem_underlying(ctx, amount)
    }

    /// Withdraw the entire position and reset the totals
    ///
    /// # Returns
    /// * Shares burned and the underlying sent to the admin
    pub fn redeem_all(ctx: Context<LedgerOperation>) -> Result<RedeemAllOutcome> {
        instructions::redeem_all::handler_redeem_all(ctx)
    }

    // =========================================================================
    // Admin Operations
    // =========================================================================

    /// Update the referral code forwarded on deposits (admin only)
    pub fn set_referral_code(ctx: Context<SetReferralCode>, referral_code: u16) -> Result<()> {
        instructions::admin::handler_set_referral_code(ctx, referral_code)
    }

    /// Transfer admin rights to a new address (admin only)
    ///
    /// # Warning
    /// * This is irreversible!
    /// * Make sure the new admin address is correct
    pub fn transfer_admin(ctx: Context<TransferAdmin>) -> Result<()> {
        instructions::admin::handler_transfer_admin(ctx)
    }
}
