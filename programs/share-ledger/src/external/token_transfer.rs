// =============================================================================
// Underlying Token Transfers
// =============================================================================
// SPL Token moves between the admin and the ledger vault.
// - pull: admin token account -> vault, signed by the admin
// - push: vault -> admin token account, signed by the ledger PDA
// =============================================================================

use anchor_lang::prelude::*;
use anchor_spl::token::{self, TokenAccount, Transfer};

use crate::constants::LEDGER_SEED;

use super::UnderlyingAsset;

pub struct SplUnderlying<'info> {
    pub token_program: AccountInfo<'info>,
    pub vault: AccountInfo<'info>,
    pub caller_token_account: AccountInfo<'info>,
    pub caller: AccountInfo<'info>,
    pub ledger: AccountInfo<'info>,

    pub underlying_mint: Pubkey,
    pub ledger_bump: u8,
}

impl UnderlyingAsset for SplUnderlying<'_> {
    fn pull_from_caller(&mut self, amount: u64) -> Result<()> {
        let transfer_ctx = CpiContext::new(
            self.token_program.clone(),
            Transfer {
                from: self.caller_token_account.clone(),
                to: self.vault.clone(),
                authority: self.caller.clone(),
            },
        );

        token::transfer(transfer_ctx, amount)
    }

    fn push_to_caller(&mut self, amount: u64) -> Result<()> {
        // The vault is owned by the ledger PDA, so we need PDA signing
        let bump = [self.ledger_bump];
        let ledger_seeds: &[&[u8]] = &[LEDGER_SEED, self.underlying_mint.as_ref(), &bump];
        let signer_seeds = &[ledger_seeds];

        let transfer_ctx = CpiContext::new_with_signer(
            self.token_program.clone(),
            Transfer {
                from: self.vault.clone(),
                to: self.caller_token_account.clone(),
                authority: self.ledger.clone(),
            },
            signer_seeds,
        );

        token::transfer(transfer_ctx, amount)
    }

    fn held(&self) -> Result<u64> {
        // Re-read the account data, CPIs earlier in the instruction move funds
        let data = self.vault.try_borrow_data()?;
        let vault = TokenAccount::try_deserialize(&mut &data[..])?;
        Ok(vault.amount)
    }
}
