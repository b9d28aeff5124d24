// =============================================================================
// Share Ledger Error Codes
// =============================================================================
// Every failure aborts the whole instruction. Accounting anomalies are never
// clamped or skipped, they surface as one of the codes below.
// =============================================================================

use anchor_lang::prelude::*;

/// All possible errors that the share ledger program can return.
///
/// Anchor assigns numeric codes starting from 6000 in declaration order.
#[error_code]
pub enum LedgerError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================

    /// The yield source program is missing or not an executable program
    #[msg("Invalid yield source program")]
    InvalidYieldSource,

    /// The position account is not a lending position owned by this ledger
    #[msg("Invalid yield source position account")]
    InvalidYieldPosition,

    /// 10^decimals would not fit the scale factor
    #[msg("Underlying mint decimals are not supported")]
    UnsupportedDecimals,

    /// Zero address where a real key is required
    #[msg("Invalid address")]
    InvalidAddress,

    // =========================================================================
    // Authorization Errors
    // =========================================================================

    /// Only the ledger admin can call this function
    #[msg("Only admin can perform this action")]
    AdminOnly,

    /// The requested authority change is not valid
    #[msg("Invalid authority")]
    InvalidAuthority,

    // =========================================================================
    // Balance & Amount Errors
    // =========================================================================

    /// Trying to invest/redeem 0 tokens
    #[msg("Amount must be greater than zero")]
    InvalidAmount,

    /// Caller doesn't have enough underlying tokens
    #[msg("Insufficient balance for operation")]
    InsufficientBalance,

    /// Redeeming more than the pool has deployed in the yield source
    #[msg("Amount exceeds balance deployed in the yield source")]
    InsufficientYieldBalance,

    // =========================================================================
    // Accounting Invariant Errors
    // =========================================================================

    /// The yield source balance dropped between two checkpoints without a
    /// withdrawal by this ledger
    #[msg("Yield source balance decreased since last checkpoint")]
    NegativeInterest,

    /// A deposit lowered the yield source balance
    #[msg("Yield source deposit produced a negative balance change")]
    InconsistentDeposit,

    /// A withdrawal raised the balance or removed more than requested
    #[msg("Yield source withdrawal produced an inconsistent balance change")]
    InconsistentWithdrawal,

    // =========================================================================
    // Math Errors
    // =========================================================================

    #[msg("Math overflow - calculation exceeded maximum value")]
    MathOverflow,

    #[msg("Math underflow - result would be negative")]
    MathUnderflow,

    #[msg("Division by zero")]
    DivisionByZero,

    // =========================================================================
    // Account Validation Errors
    // =========================================================================

    /// Token account mint doesn't match the ledger's underlying mint
    #[msg("Invalid underlying mint")]
    InvalidUnderlyingMint,

    /// Token account owner doesn't match expected owner
    #[msg("Invalid token account owner")]
    InvalidTokenAccountOwner,

    // =========================================================================
    // External Collaborator Errors
    // =========================================================================

    /// The CPI into the lending market failed
    #[msg("Yield source CPI failed")]
    YieldSourceCpiFailed,
}
