//! Thread-safe handle over a [`Ledger`].
//!
//! Mutators take the write lock for the whole operation, which makes
//! check-then-act on balances atomic across threads. Readers take the read
//! lock and get owned snapshots, so they never see a half-applied
//! operation.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use custody_types::{
    Account, Checkpoint, CheckpointId, CheckpointRoot, LedgerError, LedgerEvent, NewOrder, Order,
    OrderId, Result,
};

use crate::ledger::Ledger;
use crate::transfer::AssetTransfer;

/// Cloneable, lock-guarded ledger handle.
pub struct SharedLedger<T: AssetTransfer> {
    inner: Arc<RwLock<Ledger<T>>>,
}

impl<T: AssetTransfer> Clone for SharedLedger<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: AssetTransfer> SharedLedger<T> {
    #[must_use]
    pub fn new(ledger: Ledger<T>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ledger)),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Ledger<T>>> {
        self.inner
            .read()
            .map_err(|_| LedgerError::Internal("ledger lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Ledger<T>>> {
        self.inner
            .write()
            .map_err(|_| LedgerError::Internal("ledger lock poisoned".into()))
    }

    pub fn deposit(&self, caller: &Account, account: &Account, amount: u64) -> Result<u64> {
        self.write()?.deposit(caller, account, amount)
    }

    pub fn debit(&self, caller: &Account, account: &Account, amount: u64) -> Result<u64> {
        self.write()?.debit(caller, account, amount)
    }

    pub fn place_order(&self, caller: &Account, order: NewOrder) -> Result<OrderId> {
        self.write()?.place_order(caller, order)
    }

    pub fn record_checkpoint(&self, caller: &Account, root: CheckpointRoot) -> Result<CheckpointId> {
        self.write()?.record_checkpoint(caller, root)
    }

    pub fn record_checkpoint_hex(&self, caller: &Account, root_hex: &str) -> Result<CheckpointId> {
        self.write()?.record_checkpoint_hex(caller, root_hex)
    }

    pub fn withdraw(&self, caller: &Account, receiver: &Account, amount: u64) -> Result<()> {
        self.write()?.withdraw(caller, receiver, amount)
    }

    pub fn transfer_ownership(&self, caller: &Account, new_owner: Account) -> Result<()> {
        self.write()?.transfer_ownership(caller, new_owner)
    }

    pub fn deposit_balance_of(&self, account: &Account) -> Result<u64> {
        Ok(self.read()?.deposit_balance_of(account))
    }

    /// Snapshot of all orders in id order.
    pub fn list_orders(&self) -> Result<Vec<Order>> {
        Ok(self.read()?.list_orders().cloned().collect())
    }

    /// Snapshot of all checkpoints in id order.
    pub fn list_checkpoints(&self) -> Result<Vec<Checkpoint>> {
        Ok(self.read()?.list_checkpoints().cloned().collect())
    }

    /// Snapshot of the audit trail.
    pub fn events(&self) -> Result<Vec<LedgerEvent>> {
        Ok(self.read()?.events().cloned().collect())
    }

    pub fn verify_event_chain(&self) -> Result<()> {
        self.read()?.verify_event_chain()
    }

    pub fn owner(&self) -> Result<Account> {
        Ok(self.read()?.owner().clone())
    }

    /// Run `f` with read access to the ledger and the collaborator.
    pub fn inspect<R>(&self, f: impl FnOnce(&Ledger<T>) -> R) -> Result<R> {
        let guard = self.read()?;
        Ok(f(&guard))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::RecordingTransfer;
    use custody_types::{ErrorKind, LedgerConfig};

    #[test]
    fn clones_share_state() {
        let owner = Account::new("exchange");
        let shared = SharedLedger::new(
            Ledger::new(LedgerConfig::new(owner.clone()), RecordingTransfer::new()).unwrap(),
        );
        let other = shared.clone();
        other.record_checkpoint_hex(&owner, "ab12").unwrap();
        assert_eq!(shared.list_checkpoints().unwrap().len(), 1);
        let err = shared.record_checkpoint_hex(&owner, "ab12").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateEntry);
    }

    #[test]
    fn inspect_reaches_collaborator() {
        let owner = Account::new("exchange");
        let shared = SharedLedger::new(
            Ledger::new(LedgerConfig::new(owner.clone()), RecordingTransfer::new()).unwrap(),
        );
        shared.deposit(&owner, &owner, 10).unwrap();
        shared.withdraw(&owner, &Account::new("bob"), 4).unwrap();
        let sent = shared.inspect(|l| l.transfer().total_sent()).unwrap();
        assert_eq!(sent, 4);
    }
}
