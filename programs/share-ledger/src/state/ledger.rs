// =============================================================================
// Ledger State Account
// =============================================================================
// The Ledger account owns all share accounting for one underlying mint.
//
// Shares never grow in count. Yield is captured by raising the exchange rate:
//
//   rate += interest * scale / total_shares
//
// where interest is the growth of the yield source balance since the last
// recorded checkpoint. There is no clock and no interest feed, the diff is
// taken lazily at the start of every operation.
//
// Conversions always round against the party dealing with the pool, so the
// ledger never loses value to rounding:
//   minted = floor(amount * scale / rate)
//   burned = ceil(amount * scale / rate)
//   value  = floor(shares * rate / scale)
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::MAX_UNDERLYING_DECIMALS;
use crate::error::LedgerError;
use crate::external::{BalanceOracle, UnderlyingAsset, YieldSource};

/// The share ledger for one underlying asset.
///
/// This account is a PDA derived from ["ledger", underlying_mint_pubkey].
#[account]
#[derive(InitSpace, Debug, PartialEq)]
pub struct Ledger {
    // =========================================================================
    // Authority & Identification
    // =========================================================================

    /// The single administrator gating invest/redeem/configuration
    pub admin: Pubkey,

    /// The underlying asset depositors contribute and withdraw
    pub underlying_mint: Pubkey,

    /// PDA token account holding underlying on its way in or out
    pub vault: Pubkey,

    /// Program id of the lending market used as yield source
    pub yield_source_program: Pubkey,

    /// The lending market account that reports this pool's balance
    pub yield_position: Pubkey,

    // =========================================================================
    // Accounting State
    // =========================================================================

    /// Sum of all outstanding shares, 0 means no depositors
    pub total_shares: u64,

    /// Yield source balance as of the last checkpoint
    pub last_recorded_balance: u64,

    /// Value of one share in underlying units, scaled by `scale`.
    /// Starts at `scale` (1:1) and never goes down.
    pub last_exchange_rate: u128,

    /// 10^decimals of the underlying mint
    pub scale: u64,

    pub decimals: u8,

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Referral metadata forwarded on deposits, no accounting effect
    pub referral_code: u16,

    pub bump: u8,
    pub vault_bump: u8,
}

/// Everything `Ledger::initialize` needs to set up a fresh ledger
pub struct LedgerConfig {
    pub admin: Pubkey,
    pub underlying_mint: Pubkey,
    pub vault: Pubkey,
    pub yield_source_program: Pubkey,
    pub yield_position: Pubkey,
    pub decimals: u8,
    pub referral_code: u16,
    pub bump: u8,
    pub vault_bump: u8,
}

/// Result of a full liquidation
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct RedeemAllOutcome {
    pub shares_burned: u64,
    pub underlying_amount: u64,
}

/// floor(a * b / d) with a u128 intermediate
fn mul_div_down(a: u128, b: u128, d: u128) -> Result<u128> {
    a.checked_mul(b)
        .ok_or(error!(LedgerError::MathOverflow))?
        .checked_div(d)
        .ok_or(error!(LedgerError::DivisionByZero))
}

/// ceil(a * b / d) with a u128 intermediate
fn mul_div_up(a: u128, b: u128, d: u128) -> Result<u128> {
    let product = a.checked_mul(b).ok_or(error!(LedgerError::MathOverflow))?;
    let quotient = product
        .checked_div(d)
        .ok_or(error!(LedgerError::DivisionByZero))?;
    if product % d == 0 {
        Ok(quotient)
    } else {
        quotient
            .checked_add(1)
            .ok_or(error!(LedgerError::MathOverflow))
    }
}

fn to_u64(value: u128) -> Result<u64> {
    u64::try_from(value).map_err(|_| error!(LedgerError::MathOverflow))
}

impl Ledger {
    /// Fixed-point scale for a mint with `decimals` decimals
    pub fn scale_for_decimals(decimals: u8) -> Result<u64> {
        require!(
            decimals <= MAX_UNDERLYING_DECIMALS,
            LedgerError::UnsupportedDecimals
        );
        10u64
            .checked_pow(decimals as u32)
            .ok_or(error!(LedgerError::MathOverflow))
    }

    /// Set up a fresh ledger: rate = scale, no shares, nothing recorded
    pub fn initialize(&mut self, config: LedgerConfig) -> Result<()> {
        require!(
            config.yield_source_program != Pubkey::default(),
            LedgerError::InvalidYieldSource
        );
        require!(
            config.yield_position != Pubkey::default(),
            LedgerError::InvalidYieldPosition
        );
        require!(config.admin != Pubkey::default(), LedgerError::InvalidAddress);

        let scale = Self::scale_for_decimals(config.decimals)?;

        self.admin = config.admin;
        self.underlying_mint = config.underlying_mint;
        self.vault = config.vault;
        self.yield_source_program = config.yield_source_program;
        self.yield_position = config.yield_position;

        self.total_shares = 0;
        self.last_recorded_balance = 0;
        self.last_exchange_rate = scale as u128;
        self.scale = scale;
        self.decimals = config.decimals;

        self.referral_code = config.referral_code;
        self.bump = config.bump;
        self.vault_bump = config.vault_bump;

        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn underlying(&self) -> Pubkey {
        self.underlying_mint
    }

    pub fn total_staked(&self) -> u64 {
        self.total_shares
    }

    /// Shares owed for `amount` underlying at the last computed rate
    pub fn shares_for(&self, amount: u64) -> Result<u64> {
        to_u64(mul_div_down(
            amount as u128,
            self.scale as u128,
            self.last_exchange_rate,
        )?)
    }

    /// Shares a redeemer gives up for `amount` underlying, rounded up
    pub fn shares_to_burn(&self, amount: u64) -> Result<u64> {
        to_u64(mul_div_up(
            amount as u128,
            self.scale as u128,
            self.last_exchange_rate,
        )?)
    }

    /// Underlying value of `shares` at the last computed rate
    pub fn value_of(&self, shares: u64) -> Result<u64> {
        to_u64(mul_div_down(
            shares as u128,
            self.last_exchange_rate,
            self.scale as u128,
        )?)
    }

    // =========================================================================
    // Interest Accrual
    // =========================================================================

    /// Fold yield earned since the last checkpoint into the exchange rate.
    ///
    /// With no shares outstanding the rate stays frozen and the yield is left
    /// unattributed. Does not touch `last_recorded_balance`, callers set it
    /// once they know the balance after their own deposit/withdraw.
    fn accrue(&mut self, current_balance: u64) -> Result<()> {
        if self.total_shares == 0 {
            return Ok(());
        }

        let interest = current_balance
            .checked_sub(self.last_recorded_balance)
            .ok_or(LedgerError::NegativeInterest)?;

        let rate_increase = mul_div_down(
            interest as u128,
            self.scale as u128,
            self.total_shares as u128,
        )?;

        self.last_exchange_rate = self
            .last_exchange_rate
            .checked_add(rate_increase)
            .ok_or(LedgerError::MathOverflow)?;

        Ok(())
    }

    /// Current exchange rate, accrued on a copy. `self` is not modified.
    pub fn exchange_rate<O: BalanceOracle + ?Sized>(&self, oracle: &O) -> Result<u128> {
        let mut view = self.clone();
        view.accrue(oracle.balance_of()?)?;
        Ok(view.last_exchange_rate)
    }

    /// Interface hook kept for strategy compatibility. Accrual happens lazily
    /// inside every other operation, so there is nothing to do here.
    pub fn accrue_interest(&self) -> bool {
        true
    }

    // =========================================================================
    // Operations
    // =========================================================================
    // Each operation works on a copy of the state and commits it only after
    // every step succeeded.
    // =========================================================================

    /// Pull `amount` from the caller, deposit it into the yield source and
    /// mint shares for the balance increase actually observed.
    pub fn invest<Y, A>(&mut self, amount: u64, source: &mut Y, asset: &mut A) -> Result<u64>
    where
        Y: YieldSource + ?Sized,
        A: UnderlyingAsset + ?Sized,
    {
        require!(amount > 0, LedgerError::InvalidAmount);

        let mut next = self.clone();

        let before = source.balance_of()?;
        next.accrue(before)?;

        // Incoming principal is never counted as interest
        next.last_recorded_balance = before
            .checked_add(amount)
            .ok_or(LedgerError::MathOverflow)?;

        asset.pull_from_caller(amount)?;
        source.deposit(amount)?;

        let after = source.balance_of()?;
        let deposited = after
            .checked_sub(before)
            .ok_or(LedgerError::InconsistentDeposit)?;

        let minted = next.shares_for(deposited)?;
        next.total_shares = next
            .total_shares
            .checked_add(minted)
            .ok_or(LedgerError::MathOverflow)?;

        if after != next.last_recorded_balance {
            msg!(
                "Yield source credited {} for a deposit of {}",
                deposited,
                amount
            );
        }
        // Checkpoint must match what the yield source reports
        next.last_recorded_balance = after;

        msg!(
            "Invested {} at rate {}: minted {}, total shares {}",
            amount,
            next.last_exchange_rate,
            minted,
            next.total_shares
        );

        *self = next;
        Ok(minted)
    }

    /// Withdraw `amount` from the yield source, burn the matching shares and
    /// send the underlying to the caller. The yield source must give back
    /// exactly `amount`.
    pub fn redeem<Y, A>(&mut self, amount: u64, source: &mut Y, asset: &mut A) -> Result<u64>
    where
        Y: YieldSource + ?Sized,
        A: UnderlyingAsset + ?Sized,
    {
        require!(amount > 0, LedgerError::InvalidAmount);

        let mut next = self.clone();

        let before = source.balance_of()?;
        next.accrue(before)?;

        next.last_recorded_balance = before
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientYieldBalance)?;

        source.withdraw(amount)?;

        let after = source.balance_of()?;
        let withdrawn = before
            .checked_sub(after)
            .ok_or(LedgerError::InconsistentWithdrawal)?;
        require!(withdrawn == amount, LedgerError::InconsistentWithdrawal);

        let burned = next.shares_to_burn(withdrawn)?;
        next.total_shares = next
            .total_shares
            .checked_sub(burned)
            .ok_or(LedgerError::MathUnderflow)?;
        next.last_recorded_balance = after;

        asset.push_to_caller(amount)?;

        msg!(
            "Redeemed {} at rate {}: burned {}, total shares {}",
            amount,
            next.last_exchange_rate,
            burned,
            next.total_shares
        );

        *self = next;
        Ok(burned)
    }

    /// Pull everything out of the yield source and hand the whole vault to
    /// the caller. Totals reset to zero, the rate stays where it is.
    pub fn redeem_all<Y, A>(&mut self, source: &mut Y, asset: &mut A) -> Result<RedeemAllOutcome>
    where
        Y: YieldSource + ?Sized,
        A: UnderlyingAsset + ?Sized,
    {
        let mut next = self.clone();

        let before = source.balance_of()?;
        next.accrue(before)?;

        if before > 0 {
            source.withdraw(before)?;
        }

        let shares_burned = next.shares_for(before)?;
        if shares_burned != next.total_shares {
            msg!(
                "WARNING: redeem_all burned {} shares but {} were outstanding",
                shares_burned,
                next.total_shares
            );
        }

        // Includes any dust already sitting in the vault
        let underlying_amount = asset.held()?;

        next.total_shares = 0;
        next.last_recorded_balance = 0;

        if underlying_amount > 0 {
            asset.push_to_caller(underlying_amount)?;
        }

        msg!(
            "Redeemed all: {} shares, {} underlying, rate frozen at {}",
            shares_burned,
            underlying_amount,
            next.last_exchange_rate
        );

        *self = next;
        Ok(RedeemAllOutcome {
            shares_burned,
            underlying_amount,
        })
    }

    // =========================================================================
    // Administration
    // =========================================================================

    pub fn set_referral_code(&mut self, referral_code: u16) {
        self.referral_code = referral_code;
    }

    pub fn transfer_admin(&mut self, new_admin: Pubkey) -> Result<()> {
        require!(new_admin != Pubkey::default(), LedgerError::InvalidAddress);
        require!(new_admin != self.admin, LedgerError::InvalidAuthority);

        self.admin = new_admin;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::mock::{mock_pool, MockMarket, MockToken};
    use test_case::test_case;

    const USDC_SCALE: u64 = 1_000_000;

    fn new_ledger(decimals: u8) -> Ledger {
        let mut ledger = Ledger {
            admin: Pubkey::default(),
            underlying_mint: Pubkey::default(),
            vault: Pubkey::default(),
            yield_source_program: Pubkey::default(),
            yield_position: Pubkey::default(),
            total_shares: 0,
            last_recorded_balance: 0,
            last_exchange_rate: 0,
            scale: 0,
            decimals: 0,
            referral_code: 0,
            bump: 0,
            vault_bump: 0,
        };
        ledger
            .initialize(LedgerConfig {
                admin: Pubkey::new_unique(),
                underlying_mint: Pubkey::new_unique(),
                vault: Pubkey::new_unique(),
                yield_source_program: Pubkey::new_unique(),
                yield_position: Pubkey::new_unique(),
                decimals,
                referral_code: 0,
                bump: 255,
                vault_bump: 254,
            })
            .unwrap();
        ledger
    }

    fn setup(caller: u64) -> (Ledger, MockMarket, MockToken) {
        let (market, token) = mock_pool(caller);
        (new_ledger(6), market, token)
    }

    #[test_case(0, 1)]
    #[test_case(6, 1_000_000)]
    #[test_case(9, 1_000_000_000)]
    #[test_case(18, 1_000_000_000_000_000_000)]
    fn test_scale_for_decimals(decimals: u8, scale: u64) {
        assert_eq!(Ledger::scale_for_decimals(decimals).unwrap(), scale);
    }

    #[test]
    fn test_scale_rejects_wide_decimals() {
        let err = Ledger::scale_for_decimals(19).unwrap_err();
        assert_eq!(err, LedgerError::UnsupportedDecimals.into());
    }

    #[test]
    fn test_initialize_starts_at_one_to_one() {
        let ledger = new_ledger(6);
        assert_eq!(ledger.last_exchange_rate, USDC_SCALE as u128);
        assert_eq!(ledger.scale, USDC_SCALE);
        assert_eq!(ledger.total_staked(), 0);
        assert_eq!(ledger.last_recorded_balance, 0);
    }

    #[test]
    fn test_initialize_rejects_missing_yield_source() {
        let mut ledger = new_ledger(6);
        let err = ledger
            .initialize(LedgerConfig {
                admin: Pubkey::new_unique(),
                underlying_mint: Pubkey::new_unique(),
                vault: Pubkey::new_unique(),
                yield_source_program: Pubkey::default(),
                yield_position: Pubkey::new_unique(),
                decimals: 6,
                referral_code: 0,
                bump: 0,
                vault_bump: 0,
            })
            .unwrap_err();
        assert_eq!(err, LedgerError::InvalidYieldSource.into());
    }

    #[test]
    fn test_scenario_invest_earn_redeem() {
        let (mut ledger, mut market, mut token) = setup(10_000_000);

        // 1. invest 1 USDC into an empty pool
        let minted = ledger.invest(1_000_000, &mut market, &mut token).unwrap();
        assert_eq!(minted, 1_000_000);
        assert_eq!(ledger.total_shares, 1_000_000);
        assert_eq!(ledger.last_exchange_rate, 1_000_000);
        assert_eq!(ledger.last_recorded_balance, 1_000_000);

        // 2. 10% yield, no calls
        market.earn(100_000);

        // 3. lazy accrual through the read-only query
        assert_eq!(ledger.exchange_rate(&market).unwrap(), 1_100_000);
        assert_eq!(ledger.last_exchange_rate, 1_000_000);

        // 4. redeem half the value
        let burned = ledger.redeem(550_000, &mut market, &mut token).unwrap();
        assert_eq!(burned, 500_000);
        assert_eq!(ledger.total_shares, 500_000);
        assert_eq!(ledger.last_exchange_rate, 1_100_000);
        assert_eq!(ledger.last_recorded_balance, 550_000);
        assert_eq!(market.0.borrow().caller, 9_550_000);
    }

    #[test]
    fn test_exchange_rate_does_not_persist() {
        let (mut ledger, mut market, mut token) = setup(5_000_000);
        ledger.invest(2_000_000, &mut market, &mut token).unwrap();
        market.earn(1_000_000);

        let snapshot = ledger.clone();
        assert_eq!(ledger.exchange_rate(&market).unwrap(), 1_500_000);
        assert_eq!(ledger, snapshot);
    }

    #[test]
    fn test_rate_is_monotonic_under_growing_balance() {
        let (mut ledger, mut market, mut token) = setup(100_000_000);
        let mut last_rate = ledger.exchange_rate(&market).unwrap();

        let steps: [(u64, u64, bool); 6] = [
            (3_000_000, 0, true),
            (400_000, 12_345, false),
            (1_700_001, 999, true),
            (250_000, 77_777, false),
            (999_999, 1, true),
            (1_000_000, 31_337, false),
        ];

        for (amount, interest, invest) in steps {
            market.earn(interest);
            if invest {
                ledger.invest(amount, &mut market, &mut token).unwrap();
            } else {
                ledger.redeem(amount, &mut market, &mut token).unwrap();
            }
            let rate = ledger.exchange_rate(&market).unwrap();
            assert!(rate >= last_rate, "rate went from {} to {}", last_rate, rate);
            assert!(rate >= ledger.scale as u128);
            last_rate = rate;
        }
    }

    #[test]
    fn test_idle_yield_is_not_attributed() {
        let (mut ledger, mut market, mut token) = setup(10_000_000);

        ledger.invest(1_000_000, &mut market, &mut token).unwrap();
        market.earn(500_000);
        ledger.redeem_all(&mut market, &mut token).unwrap();
        let frozen = ledger.last_exchange_rate;
        assert_eq!(frozen, 1_500_000);

        // Yield lands while nobody holds shares
        market.earn(200_000);
        assert_eq!(ledger.exchange_rate(&market).unwrap(), frozen);

        // Next deposit mints at the frozen rate on the real balance delta
        let minted = ledger.invest(3_000_000, &mut market, &mut token).unwrap();
        assert_eq!(minted, 2_000_000);
        assert_eq!(ledger.last_exchange_rate, frozen);
        assert_eq!(ledger.last_recorded_balance, 3_200_000);
    }

    #[test_case(1)]
    #[test_case(3)]
    #[test_case(999_999)]
    #[test_case(1_234_567)]
    #[test_case(98_765_432_109)]
    fn test_round_trip_never_creates_value(amount: u64) {
        let (mut ledger, mut market, mut token) = setup(u64::MAX / 2);

        // Push the rate to an awkward value first
        ledger.invest(3_000_000, &mut market, &mut token).unwrap();
        market.earn(1_000_001);
        ledger.invest(7, &mut market, &mut token).unwrap();

        let shares = ledger.invest(amount, &mut market, &mut token).unwrap();
        let value = ledger.value_of(shares).unwrap();

        assert!(value <= amount, "{} shares worth {} > {}", shares, value, amount);
        // One share's worth of truncation at most, plus one unit
        let epsilon = (ledger.last_exchange_rate / ledger.scale as u128) as u64 + 1;
        assert!(value + epsilon >= amount, "lost more than {} on {}", epsilon, amount);
    }

    #[test]
    fn test_conservation_without_interest() {
        let (mut ledger, mut market, mut token) = setup(50_000_000);
        ledger.invest(4_000_000, &mut market, &mut token).unwrap();
        market.earn(1_000_000);
        ledger.redeem(1, &mut market, &mut token).unwrap();

        let shares_before = ledger.total_shares;
        let minted = ledger.invest(2_500_000, &mut market, &mut token).unwrap();

        assert_eq!(ledger.total_shares, shares_before + minted);
        let value = ledger.value_of(minted).unwrap();
        assert!(value <= 2_500_000);
        assert!(value >= 2_500_000 - 2);
    }

    #[test]
    fn test_invest_mints_on_actual_delta() {
        let (mut ledger, mut market, mut token) = setup(10_000_000);

        market.0.borrow_mut().credit_override = Some(990_000);
        let minted = ledger.invest(1_000_000, &mut market, &mut token).unwrap();

        assert_eq!(minted, 990_000);
        assert_eq!(ledger.last_recorded_balance, 990_000);
        // No phantom interest from the short credit
        assert_eq!(ledger.exchange_rate(&market).unwrap(), 1_000_000);
    }

    #[test]
    fn test_redeem_all_burns_everything() {
        let (mut ledger, mut market, mut token) = setup(10_000_000);
        ledger.invest(2_000_000, &mut market, &mut token).unwrap();
        ledger.invest(2_000_000, &mut market, &mut token).unwrap();
        market.earn(400_000);

        let outstanding = ledger.total_shares;
        let outcome = ledger.redeem_all(&mut market, &mut token).unwrap();

        assert_eq!(outcome.shares_burned, outstanding);
        assert_eq!(outcome.underlying_amount, 4_400_000);
        assert_eq!(ledger.total_shares, 0);
        assert_eq!(ledger.last_recorded_balance, 0);
        assert_eq!(ledger.last_exchange_rate, 1_100_000);

        let b = market.0.borrow();
        assert_eq!(b.market, 0);
        assert_eq!(b.vault, 0);
        assert_eq!(b.caller, 10_400_000);
    }

    #[test]
    fn test_redeem_all_sweeps_vault_dust() {
        let (mut ledger, mut market, mut token) = setup(10_000_000);
        ledger.invest(1_000_000, &mut market, &mut token).unwrap();
        market.0.borrow_mut().vault += 3;

        let outcome = ledger.redeem_all(&mut market, &mut token).unwrap();
        assert_eq!(outcome.shares_burned, 1_000_000);
        assert_eq!(outcome.underlying_amount, 1_000_003);
    }

    #[test]
    fn test_redeem_all_on_empty_ledger() {
        let (mut ledger, mut market, mut token) = setup(0);

        let outcome = ledger.redeem_all(&mut market, &mut token).unwrap();
        assert_eq!(
            outcome,
            RedeemAllOutcome {
                shares_burned: 0,
                underlying_amount: 0
            }
        );
        assert_eq!(market.0.borrow().withdraw_calls, 0);
    }

    #[test]
    fn test_negative_interest_is_rejected() {
        let (mut ledger, mut market, mut token) = setup(10_000_000);
        ledger.invest(1_000_000, &mut market, &mut token).unwrap();
        market.lose(1);

        let err = ledger.exchange_rate(&market).unwrap_err();
        assert_eq!(err, LedgerError::NegativeInterest.into());

        let snapshot = ledger.clone();
        let err = ledger.invest(1_000_000, &mut market, &mut token).unwrap_err();
        assert_eq!(err, LedgerError::NegativeInterest.into());
        let err = ledger.redeem(1_000, &mut market, &mut token).unwrap_err();
        assert_eq!(err, LedgerError::NegativeInterest.into());
        let err = ledger.redeem_all(&mut market, &mut token).unwrap_err();
        assert_eq!(err, LedgerError::NegativeInterest.into());
        assert_eq!(ledger, snapshot);
    }

    #[test]
    fn test_zero_amounts_are_rejected() {
        let (mut ledger, mut market, mut token) = setup(10_000_000);

        let err = ledger.invest(0, &mut market, &mut token).unwrap_err();
        assert_eq!(err, LedgerError::InvalidAmount.into());
        let err = ledger.redeem(0, &mut market, &mut token).unwrap_err();
        assert_eq!(err, LedgerError::InvalidAmount.into());
    }

    #[test]
    fn test_redeem_more_than_deployed() {
        let (mut ledger, mut market, mut token) = setup(10_000_000);
        ledger.invest(1_000_000, &mut market, &mut token).unwrap();

        let err = ledger.redeem(1_000_001, &mut market, &mut token).unwrap_err();
        assert_eq!(err, LedgerError::InsufficientYieldBalance.into());
        assert_eq!(market.0.borrow().withdraw_calls, 0);
    }

    #[test]
    fn test_redeem_more_shares_than_outstanding() {
        let (mut ledger, mut market, mut token) = setup(10_000_000);
        ledger.invest(1_000_000, &mut market, &mut token).unwrap();

        // Balance the ledger never recorded as backing shares
        ledger.last_recorded_balance = 3_000_000;
        market.earn(2_000_000);

        let err = ledger.redeem(3_000_000, &mut market, &mut token).unwrap_err();
        assert_eq!(err, LedgerError::MathUnderflow.into());
    }

    #[test]
    fn test_deposit_that_lowers_balance_is_rejected() {
        let (mut ledger, mut market, mut token) = setup(10_000_000);
        ledger.invest(1_000_000, &mut market, &mut token).unwrap();

        let snapshot = ledger.clone();
        {
            let mut b = market.0.borrow_mut();
            b.credit_override = Some(0);
            b.deposit_drain = 1;
        }

        let err = ledger.invest(500_000, &mut market, &mut token).unwrap_err();
        assert_eq!(err, LedgerError::InconsistentDeposit.into());
        assert_eq!(ledger, snapshot);
    }

    #[test_case(Some(100_000), 0 ; "short withdrawal")]
    #[test_case(Some(500_001), 0 ; "over withdrawal")]
    #[test_case(Some(0), 10 ; "withdrawal raises balance")]
    fn test_inconsistent_withdrawal_is_rejected(debit: Option<u64>, bonus: u64) {
        let (mut ledger, mut market, mut token) = setup(10_000_000);
        ledger.invest(1_000_000, &mut market, &mut token).unwrap();

        let snapshot = ledger.clone();
        {
            let mut b = market.0.borrow_mut();
            // Enough idle funds in the vault to cover the payout
            b.vault += 400_000;
            b.debit_override = debit;
            b.withdraw_bonus = bonus;
        }

        let err = ledger.redeem(500_000, &mut market, &mut token).unwrap_err();
        assert_eq!(err, LedgerError::InconsistentWithdrawal.into());
        assert_eq!(ledger, snapshot);
        assert_eq!(market.0.borrow().caller, 9_000_000);
    }

    #[test]
    fn test_small_redeems_always_burn() {
        let (mut ledger, mut market, mut token) = setup(10_000_000);
        ledger.invest(1_000_000, &mut market, &mut token).unwrap();
        market.earn(100_000);

        for _ in 0..10 {
            let burned = ledger.redeem(1, &mut market, &mut token).unwrap();
            assert_eq!(burned, 1);
        }

        assert_eq!(ledger.last_exchange_rate, 1_100_000);
        assert_eq!(ledger.total_shares, 999_990);
        assert_eq!(ledger.last_recorded_balance, 1_099_990);
        // Outstanding shares stay fully backed
        let backing = ledger.value_of(ledger.total_shares).unwrap();
        assert!(backing <= ledger.last_recorded_balance);
    }

    #[test]
    fn test_failed_deposit_leaves_state_untouched() {
        let (mut ledger, mut market, mut token) = setup(10_000_000);
        ledger.invest(1_000_000, &mut market, &mut token).unwrap();
        market.earn(50_000);

        let snapshot = ledger.clone();
        market.0.borrow_mut().fail_deposit = true;

        assert!(ledger.invest(1_000_000, &mut market, &mut token).is_err());
        assert_eq!(ledger, snapshot);
    }

    #[test]
    fn test_failed_push_leaves_state_untouched() {
        let (mut ledger, mut market, mut token) = setup(10_000_000);
        ledger.invest(1_000_000, &mut market, &mut token).unwrap();

        let snapshot = ledger.clone();
        market.0.borrow_mut().fail_push = true;

        assert!(ledger.redeem(500_000, &mut market, &mut token).is_err());
        assert_eq!(ledger, snapshot);
    }

    #[test]
    fn test_failed_withdraw_leaves_state_untouched() {
        let (mut ledger, mut market, mut token) = setup(10_000_000);
        ledger.invest(1_000_000, &mut market, &mut token).unwrap();
        market.earn(25_000);

        let snapshot = ledger.clone();
        market.0.borrow_mut().fail_withdraw = true;

        assert!(ledger.redeem(500_000, &mut market, &mut token).is_err());
        assert_eq!(ledger, snapshot);
        assert!(ledger.redeem_all(&mut market, &mut token).is_err());
        assert_eq!(ledger, snapshot);
        assert_eq!(market.0.borrow().caller, 9_000_000);
    }

    #[test]
    fn test_failed_sweep_leaves_state_untouched() {
        let (mut ledger, mut market, mut token) = setup(10_000_000);
        ledger.invest(1_000_000, &mut market, &mut token).unwrap();
        market.earn(25_000);

        let snapshot = ledger.clone();
        market.0.borrow_mut().fail_push = true;

        assert!(ledger.redeem_all(&mut market, &mut token).is_err());
        assert_eq!(ledger, snapshot);
    }

    #[test]
    fn test_accrue_interest_is_a_no_op() {
        let (mut ledger, mut market, mut token) = setup(10_000_000);
        ledger.invest(1_000_000, &mut market, &mut token).unwrap();
        market.earn(10);

        let snapshot = ledger.clone();
        assert!(ledger.accrue_interest());
        assert_eq!(ledger, snapshot);
    }

    #[test]
    fn test_transfer_admin() {
        let mut ledger = new_ledger(6);
        let current = ledger.admin;

        let err = ledger.transfer_admin(Pubkey::default()).unwrap_err();
        assert_eq!(err, LedgerError::InvalidAddress.into());
        let err = ledger.transfer_admin(current).unwrap_err();
        assert_eq!(err, LedgerError::InvalidAuthority.into());

        let next = Pubkey::new_unique();
        ledger.transfer_admin(next).unwrap();
        assert_eq!(ledger.admin, next);
    }
}
