// =============================================================================
// State Module
// =============================================================================
// The share ledger keeps a single account per underlying mint.
// =============================================================================

pub mod ledger;

pub use ledger::*;
