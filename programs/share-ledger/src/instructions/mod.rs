// =============================================================================
// Instructions Module
// =============================================================================
// Each module is one (or a family of) instruction handlers of the share
// ledger program.
// =============================================================================

// Setup
pub mod initialize_ledger;

// Accounting operations
pub mod invest;
pub mod ledger_operation;
pub mod redeem;
pub mod redeem_all;
pub mod views;

// Admin operations
pub mod admin;

// Re-export everything from each module
// The #[derive(Accounts)] macro generates helper types that need to be at crate root
pub use admin::*;
pub use initialize_ledger::*;
pub use invest::*;
pub use ledger_operation::*;
pub use redeem::*;
pub use redeem_all::*;
pub use views::*;
