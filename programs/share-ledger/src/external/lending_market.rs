// =============================================================================
// Lending Market Adapter
// =============================================================================
// Manual CPI into the lending market that acts as the pool's yield source.
//
// Deposit:  [DEPOSIT_RESERVE_LIQUIDITY_DISCRIMINATOR | amount u64 | referral u16]
// Withdraw: [WITHDRAW_RESERVE_LIQUIDITY_DISCRIMINATOR | amount u64]
//
// Accounts (both instructions, in order):
// 0. `[writable]` reserve - the market's reserve state
// 1. `[writable]` position - the pool's lending position
// 2. `[writable]` reserve_liquidity_supply - the market's token account
// 3. `[writable]` vault - the pool's underlying token account
// 4. `[signer]` ledger - ledger PDA, authority over vault and position
// 5. `[]` token_program
//
// The balance is read straight out of the position account:
// [LENDING_POSITION_DISCRIMINATOR | owner Pubkey | underlying_balance u64]
// =============================================================================

use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::{AccountMeta, Instruction};
use anchor_lang::solana_program::program::invoke_signed;

use crate::constants::*;
use crate::error::LedgerError;

use super::{BalanceOracle, YieldSource};

/// Parse a lending position account and return its underlying balance.
///
/// Fails with `InvalidYieldPosition` unless the data carries the position
/// discriminator and names `ledger` as owner.
pub fn parse_position_balance(data: &[u8], ledger: &Pubkey) -> Result<u64> {
    require!(
        data.len() >= POSITION_MIN_LEN,
        LedgerError::InvalidYieldPosition
    );
    require!(
        data[..8] == LENDING_POSITION_DISCRIMINATOR,
        LedgerError::InvalidYieldPosition
    );

    let owner = Pubkey::try_from(&data[POSITION_OWNER_OFFSET..POSITION_BALANCE_OFFSET])
        .map_err(|_| error!(LedgerError::InvalidYieldPosition))?;
    require_keys_eq!(owner, *ledger, LedgerError::InvalidYieldPosition);

    let balance: [u8; 8] = data[POSITION_BALANCE_OFFSET..POSITION_MIN_LEN]
        .try_into()
        .map_err(|_| error!(LedgerError::InvalidYieldPosition))?;

    Ok(u64::from_le_bytes(balance))
}

/// Read the balance of a live position account, checking it belongs to the
/// yield source program.
pub fn read_position_balance(
    position: &AccountInfo,
    yield_source_program: &Pubkey,
    ledger: &Pubkey,
) -> Result<u64> {
    require_keys_eq!(
        *position.owner,
        *yield_source_program,
        LedgerError::InvalidYieldPosition
    );

    let data = position.try_borrow_data()?;
    parse_position_balance(&data[..], ledger)
}

/// Deposit instruction data
pub fn deposit_instruction_data(amount: u64, referral_code: u16) -> Vec<u8> {
    let mut data = Vec::with_capacity(18);
    data.extend_from_slice(&DEPOSIT_RESERVE_LIQUIDITY_DISCRIMINATOR);
    data.extend_from_slice(&amount.to_le_bytes());
    data.extend_from_slice(&referral_code.to_le_bytes());
    data
}

/// Withdraw instruction data
pub fn withdraw_instruction_data(amount: u64) -> Vec<u8> {
    let mut data = Vec::with_capacity(16);
    data.extend_from_slice(&WITHDRAW_RESERVE_LIQUIDITY_DISCRIMINATOR);
    data.extend_from_slice(&amount.to_le_bytes());
    data
}

/// Balance-only view of a position, used by read-only instructions.
pub struct PositionOracle<'a, 'info> {
    pub position: &'a AccountInfo<'info>,
    pub yield_source_program: Pubkey,
    pub ledger: Pubkey,
}

impl BalanceOracle for PositionOracle<'_, '_> {
    fn balance_of(&self) -> Result<u64> {
        read_position_balance(self.position, &self.yield_source_program, &self.ledger)
    }
}

/// The lending market as seen from one ledger instruction.
pub struct LendingMarket<'info> {
    pub program: AccountInfo<'info>,
    pub reserve: AccountInfo<'info>,
    pub position: AccountInfo<'info>,
    pub reserve_liquidity_supply: AccountInfo<'info>,
    pub vault: AccountInfo<'info>,
    pub ledger: AccountInfo<'info>,
    pub token_program: AccountInfo<'info>,

    /// Needed to rebuild the ledger PDA signer seeds
    pub underlying_mint: Pubkey,
    pub ledger_bump: u8,

    /// Forwarded on every deposit, no accounting effect
    pub referral_code: u16,
}

impl<'info> LendingMarket<'info> {
    fn invoke(&self, data: Vec<u8>) -> Result<()> {
        let ix = Instruction {
            program_id: self.program.key(),
            accounts: vec![
                AccountMeta::new(self.reserve.key(), false),
                AccountMeta::new(self.position.key(), false),
                AccountMeta::new(self.reserve_liquidity_supply.key(), false),
                AccountMeta::new(self.vault.key(), false),
                AccountMeta::new_readonly(self.ledger.key(), true),
                AccountMeta::new_readonly(self.token_program.key(), false),
            ],
            data,
        };

        let account_infos = [
            self.reserve.clone(),
            self.position.clone(),
            self.reserve_liquidity_supply.clone(),
            self.vault.clone(),
            self.ledger.clone(),
            self.token_program.clone(),
            self.program.clone(),
        ];

        let bump = [self.ledger_bump];
        let ledger_seeds: &[&[u8]] = &[LEDGER_SEED, self.underlying_mint.as_ref(), &bump];

        invoke_signed(&ix, &account_infos, &[ledger_seeds]).map_err(|err| {
            msg!("Lending market CPI failed: {:?}", err);
            error!(LedgerError::YieldSourceCpiFailed)
        })
    }
}

impl BalanceOracle for LendingMarket<'_> {
    fn balance_of(&self) -> Result<u64> {
        read_position_balance(&self.position, self.program.key, self.ledger.key)
    }
}

impl YieldSource for LendingMarket<'_> {
    fn deposit(&mut self, amount: u64) -> Result<()> {
        msg!("Lending market deposit: {} (referral {})", amount, self.referral_code);
        self.invoke(deposit_instruction_data(amount, self.referral_code))
    }

    fn withdraw(&mut self, amount: u64) -> Result<()> {
        msg!("Lending market withdraw: {}", amount);
        self.invoke(withdraw_instruction_data(amount))
    }
}
