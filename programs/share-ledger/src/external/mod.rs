// =============================================================================
// External Collaborators
// =============================================================================
// The ledger talks to two things it does not own:
// - the yield source (a lending market holding the pool's underlying)
// - the underlying asset's token program (moving tokens in and out)
//
// The accounting core in state::ledger is written against the traits below.
// On-chain the traits are implemented by CPI adapters; tests use in-memory
// doubles from the `mock` module.
// =============================================================================

use anchor_lang::prelude::*;

pub mod lending_market;
pub mod token_transfer;

#[cfg(test)]
pub mod mock;

pub use lending_market::*;
pub use token_transfer::*;

/// Reports how much underlying the pool currently holds in the yield source.
pub trait BalanceOracle {
    /// Current balance of the pool's position, in underlying base units
    fn balance_of(&self) -> Result<u64>;
}

/// A yield source the pool can deposit into and withdraw from.
///
/// Implementations must never lower `balance_of` except when `withdraw` is
/// called, and never by more than the amount requested.
pub trait YieldSource: BalanceOracle {
    /// Move `amount` from the pool vault into the yield source
    fn deposit(&mut self, amount: u64) -> Result<()>;

    /// Move `amount` from the yield source back into the pool vault
    fn withdraw(&mut self, amount: u64) -> Result<()>;
}

/// Moves the underlying asset between the caller and the pool vault.
pub trait UnderlyingAsset {
    /// transferFrom(caller, pool, amount)
    fn pull_from_caller(&mut self, amount: u64) -> Result<()>;

    /// transfer(caller, amount)
    fn push_to_caller(&mut self, amount: u64) -> Result<()>;

    /// Underlying currently sitting in the pool vault
    fn held(&self) -> Result<u64>;
}
