// =============================================================================
// Share Ledger Constants
// =============================================================================
// PDA seeds, lending market interface constants and configuration limits for
// the share ledger program. Everything the program hard-codes lives here.
// =============================================================================

// =============================================================================
// PDA SEEDS
// =============================================================================

/// Seed for the Ledger account PDA
/// Full seed: ["ledger", underlying_mint_pubkey]
pub const LEDGER_SEED: &[u8] = b"ledger";

/// Seed for the vault token account PDA (holds underlying in transit)
/// Full seed: ["vault", ledger_pubkey]
pub const VAULT_SEED: &[u8] = b"vault";

// =============================================================================
// UNDERLYING ASSET
// =============================================================================

/// Largest mint decimals we accept. 10^18 is the biggest power of ten that
/// still fits in a u64 scale factor.
pub const MAX_UNDERLYING_DECIMALS: u8 = 18;

/// Referral code forwarded to the lending market when none is configured
pub const DEFAULT_REFERRAL_CODE: u16 = 0;

// =============================================================================
// LENDING MARKET INTERFACE (manual CPI)
// =============================================================================
// The lending market is called through hand-built instructions so the program
// does not depend on the market's crate. Discriminators follow the Anchor
// convention: sha256("global:<name>")[..8] and sha256("account:<Name>")[..8].
// =============================================================================

/// sha256("global:deposit_reserve_liquidity")[..8]
pub const DEPOSIT_RESERVE_LIQUIDITY_DISCRIMINATOR: [u8; 8] = [169, 201, 30, 126, 6, 205, 102, 68];

/// sha256("global:withdraw_reserve_liquidity")[..8]
pub const WITHDRAW_RESERVE_LIQUIDITY_DISCRIMINATOR: [u8; 8] = [0, 23, 77, 151, 224, 100, 103, 112];

/// sha256("account:LendingPosition")[..8]
pub const LENDING_POSITION_DISCRIMINATOR: [u8; 8] = [47, 255, 252, 35, 20, 245, 157, 243];

/// Position account layout: [discriminator | owner | underlying_balance]
pub const POSITION_OWNER_OFFSET: usize = 8;
pub const POSITION_BALANCE_OFFSET: usize = POSITION_OWNER_OFFSET + 32;
pub const POSITION_MIN_LEN: usize = POSITION_BALANCE_OFFSET + 8;
