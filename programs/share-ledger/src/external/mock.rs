//! In-memory collaborators for exercising the accounting core off-chain.
//!
//! `MockMarket` and `MockToken` share one `Balances` so tokens are conserved
//! across caller, vault and market the way they are on-chain.

use std::cell::RefCell;
use std::rc::Rc;

use anchor_lang::error::Error;
use anchor_lang::prelude::*;

use super::{BalanceOracle, UnderlyingAsset, YieldSource};

#[derive(Debug, Default)]
pub struct Balances {
    pub caller: u64,
    pub vault: u64,
    pub market: u64,

    /// When set, the next deposit credits this much instead of the amount sent
    pub credit_override: Option<u64>,
    /// Taken off the market position on every deposit
    pub deposit_drain: u64,
    /// When set, the next withdrawal moves this much instead of the amount asked
    pub debit_override: Option<u64>,
    /// Added to the market position on every withdrawal
    pub withdraw_bonus: u64,
    pub fail_deposit: bool,
    pub fail_withdraw: bool,
    pub fail_push: bool,

    pub withdraw_calls: u32,
}

/// Simulated ProgramError for a failing collaborator
fn collaborator_failure() -> Error {
    ProgramError::Custom(0xdead).into()
}

#[derive(Clone)]
pub struct MockMarket(pub Rc<RefCell<Balances>>);

#[derive(Clone)]
pub struct MockToken(pub Rc<RefCell<Balances>>);

/// Build a connected market/token pair with `caller` tokens in the caller's wallet
pub fn mock_pool(caller: u64) -> (MockMarket, MockToken) {
    let balances = Rc::new(RefCell::new(Balances {
        caller,
        ..Balances::default()
    }));
    (MockMarket(balances.clone()), MockToken(balances))
}

impl MockMarket {
    /// Interest credited by the market between ledger calls
    pub fn earn(&self, interest: u64) {
        self.0.borrow_mut().market += interest;
    }

    /// Balance loss the ledger did not ask for
    pub fn lose(&self, amount: u64) {
        self.0.borrow_mut().market -= amount;
    }
}

impl BalanceOracle for MockMarket {
    fn balance_of(&self) -> Result<u64> {
        Ok(self.0.borrow().market)
    }
}

impl YieldSource for MockMarket {
    fn deposit(&mut self, amount: u64) -> Result<()> {
        let mut b = self.0.borrow_mut();
        if b.fail_deposit || b.vault < amount {
            return Err(collaborator_failure());
        }
        b.vault -= amount;
        let credited = b.credit_override.take().unwrap_or(amount);
        b.market += credited;
        let drain = b.deposit_drain.min(b.market);
        b.market -= drain;
        Ok(())
    }

    fn withdraw(&mut self, amount: u64) -> Result<()> {
        let mut b = self.0.borrow_mut();
        b.withdraw_calls += 1;
        let debited = b.debit_override.take().unwrap_or(amount);
        if b.fail_withdraw || b.market < debited {
            return Err(collaborator_failure());
        }
        b.market -= debited;
        b.vault += debited;
        let bonus = b.withdraw_bonus;
        b.market += bonus;
        Ok(())
    }
}

impl UnderlyingAsset for MockToken {
    fn pull_from_caller(&mut self, amount: u64) -> Result<()> {
        let mut b = self.0.borrow_mut();
        if b.caller < amount {
            return Err(collaborator_failure());
        }
        b.caller -= amount;
        b.vault += amount;
        Ok(())
    }

    fn push_to_caller(&mut self, amount: u64) -> Result<()> {
        let mut b = self.0.borrow_mut();
        if b.fail_push || b.vault < amount {
            return Err(collaborator_failure());
        }
        b.vault -= amount;
        b.caller += amount;
        Ok(())
    }

    fn held(&self) -> Result<u64> {
        Ok(self.0.borrow().vault)
    }
}
