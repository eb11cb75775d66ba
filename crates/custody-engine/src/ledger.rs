//! The ledger facade: the public operation surface.
//!
//! Every mutating call runs the same pipeline:
//!
//! ```text
//! begin LedgerTx → AuthorizationGate::admit → component staging
//!     → Ok:  into_changes() → LedgerState::apply   (commit)
//!     → Err: drop the LedgerTx                      (rollback)
//! ```
//!
//! Authorization runs before any component touches a table, and a failed
//! call leaves every table, id counter, and the audit trail unchanged.
//! Mutators take `&mut self`, so calls on one `Ledger` are linearized; see
//! [`SharedLedger`](crate::SharedLedger) for concurrent use.

use custody_types::{
    constants, Account, Checkpoint, CheckpointId, CheckpointRoot, EventKind, LedgerConfig,
    LedgerError, LedgerEvent, NewOrder, Operation, Order, OrderId, Result, TxId,
};

use crate::audit;
use crate::auth::{AuthorizationGate, Authorized};
use crate::checkpoints::CheckpointRegistry;
use crate::deposits::DepositLedger;
use crate::orders::OrderLedger;
use crate::transfer::AssetTransfer;
use crate::tx::{LedgerState, LedgerTx};
use crate::withdrawal::WithdrawalGate;

/// Custodial ledger over deposits, orders, and checkpoints.
pub struct Ledger<T: AssetTransfer> {
    state: LedgerState,
    config: LedgerConfig,
    transfer: T,
}

impl<T: AssetTransfer> Ledger<T> {
    /// Empty ledger administered by `config.owner`.
    pub fn new(config: LedgerConfig, transfer: T) -> Result<Self> {
        config.validate()?;
        tracing::info!(
            version = constants::VERSION,
            owner = %config.owner,
            max_root_bytes = config.max_root_bytes,
            event_log = config.event_log,
            "Ledger initialized"
        );
        Ok(Self {
            state: LedgerState::new(config.owner.clone()),
            config,
            transfer,
        })
    }

    /// Run `body` as one all-or-nothing operation.
    fn execute<R>(
        &mut self,
        operation: Operation,
        caller: &Account,
        subject: Option<&Account>,
        body: impl FnOnce(&mut LedgerTx<'_>, &Authorized, &mut T) -> Result<R>,
    ) -> Result<R> {
        let tx_id = TxId::new();
        let outcome = {
            let mut tx = LedgerTx::begin(tx_id, &self.state, self.config.event_log);
            AuthorizationGate::admit(operation, caller, tx.owner(), subject)
                .and_then(|auth| body(&mut tx, &auth, &mut self.transfer))
                .map(|out| (out, tx.into_changes()))
        };
        match outcome {
            Ok((out, changes)) => {
                let rows = changes.rows_written();
                self.state.apply(changes);
                tracing::info!(tx = %tx_id, op = %operation, caller = %caller, rows, "Committed");
                Ok(out)
            }
            Err(err) => {
                tracing::debug!(
                    tx = %tx_id,
                    op = %operation,
                    caller = %caller,
                    kind = %err.kind(),
                    error = %err,
                    "Rolled back"
                );
                Err(err)
            }
        }
    }

    // -----------------------------------------------------------------
    // Mutating operations
    // -----------------------------------------------------------------

    /// Credit `amount` to `account`. The caller must be `account`.
    /// Returns the new balance.
    pub fn deposit(&mut self, caller: &Account, account: &Account, amount: u64) -> Result<u64> {
        self.execute(Operation::Deposit, caller, Some(account), |tx, auth, _| {
            auth.ensure(Operation::Deposit, account)?;
            if amount == 0 {
                return Err(LedgerError::malformed("deposit amount must be > 0"));
            }
            let balance = DepositLedger::credit(tx, account, amount)?;
            tx.emit(EventKind::Deposited {
                account: account.clone(),
                amount,
                balance,
            })?;
            Ok(balance)
        })
    }

    /// Owner-only debit of `account`. Returns the new balance.
    pub fn debit(&mut self, caller: &Account, account: &Account, amount: u64) -> Result<u64> {
        self.execute(Operation::Debit, caller, None, |tx, auth, _| {
            auth.ensure(Operation::Debit, tx.owner())?;
            let balance = DepositLedger::debit(tx, account, amount)?;
            tx.emit(EventKind::Debited {
                account: account.clone(),
                amount,
                balance,
            })?;
            Ok(balance)
        })
    }

    /// Place an order on the owner's behalf. The caller must be the owner
    /// named in `order`. Returns the new order id.
    pub fn place_order(&mut self, caller: &Account, order: NewOrder) -> Result<OrderId> {
        let owner = order.owner.clone();
        self.execute(Operation::PlaceOrder, caller, Some(&owner), |tx, auth, _| {
            OrderLedger::place(tx, auth, order)
        })
    }

    /// Owner-only: register a new commitment. Returns the new checkpoint id.
    pub fn record_checkpoint(
        &mut self,
        caller: &Account,
        root: CheckpointRoot,
    ) -> Result<CheckpointId> {
        let max_root_bytes = self.config.max_root_bytes;
        self.execute(Operation::RecordCheckpoint, caller, None, |tx, auth, _| {
            CheckpointRegistry::record(tx, auth, root, max_root_bytes)
        })
    }

    /// [`record_checkpoint`](Self::record_checkpoint) with a hex-encoded root.
    /// Authorization is checked before the encoding.
    pub fn record_checkpoint_hex(&mut self, caller: &Account, root_hex: &str) -> Result<CheckpointId> {
        let max_root_bytes = self.config.max_root_bytes;
        self.execute(Operation::RecordCheckpoint, caller, None, |tx, auth, _| {
            let root = CheckpointRoot::from_hex(root_hex)?;
            CheckpointRegistry::record(tx, auth, root, max_root_bytes)
        })
    }

    /// Owner-only: debit the owner's balance and pay `receiver` through the
    /// asset-transfer collaborator.
    pub fn withdraw(&mut self, caller: &Account, receiver: &Account, amount: u64) -> Result<()> {
        self.execute(Operation::Withdraw, caller, None, |tx, auth, transfer| {
            WithdrawalGate::withdraw(tx, auth, transfer, receiver, amount)
        })
    }

    /// Owner-only: hand administration to `new_owner`.
    pub fn transfer_ownership(&mut self, caller: &Account, new_owner: Account) -> Result<()> {
        self.execute(Operation::TransferOwnership, caller, None, |tx, auth, _| {
            auth.ensure(Operation::TransferOwnership, tx.owner())?;
            if new_owner.is_empty() {
                return Err(LedgerError::malformed("new owner must not be empty"));
            }
            let previous = tx.owner().clone();
            tx.emit(EventKind::OwnershipTransferred {
                previous,
                new: new_owner.clone(),
            })?;
            tx.set_owner(new_owner);
            Ok(())
        })
    }

    // -----------------------------------------------------------------
    // Queries (no authorization)
    // -----------------------------------------------------------------

    /// Balance of `account`, 0 if it has never been credited.
    #[must_use]
    pub fn deposit_balance_of(&self, account: &Account) -> u64 {
        DepositLedger::balance_of(self.state.deposits(), account)
    }

    /// Orders in id order. Call again to restart.
    pub fn list_orders(&self) -> impl Iterator<Item = &Order> + '_ {
        OrderLedger::list(self.state.orders())
    }

    /// Checkpoints in id order. Call again to restart.
    pub fn list_checkpoints(&self) -> impl Iterator<Item = &Checkpoint> + '_ {
        CheckpointRegistry::list(self.state.checkpoints())
    }

    #[must_use]
    pub fn find_checkpoint(&self, root: &CheckpointRoot) -> Option<&Checkpoint> {
        CheckpointRegistry::find(self.state.checkpoints(), root)
    }

    #[must_use]
    pub fn next_order_id(&self) -> OrderId {
        OrderLedger::next_id(self.state.orders())
    }

    #[must_use]
    pub fn next_checkpoint_id(&self) -> CheckpointId {
        CheckpointRegistry::next_id(self.state.checkpoints())
    }

    /// Audit trail in sequence order.
    pub fn events(&self) -> impl Iterator<Item = &LedgerEvent> + '_ {
        self.state.events().iter()
    }

    /// Recompute the audit trail's hash chain.
    pub fn verify_event_chain(&self) -> Result<()> {
        audit::verify_chain(self.state.events().iter())
    }

    /// Current administrative principal.
    #[must_use]
    pub fn owner(&self) -> &Account {
        self.state.owner()
    }

    #[must_use]
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// The asset-transfer collaborator.
    #[must_use]
    pub fn transfer(&self) -> &T {
        &self.transfer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::RecordingTransfer;
    use custody_types::ErrorKind;

    fn ledger() -> Ledger<RecordingTransfer> {
        Ledger::new(LedgerConfig::new(Account::new("exchange")), RecordingTransfer::new()).unwrap()
    }

    #[test]
    fn invalid_config_rejected() {
        let cfg = LedgerConfig::new(Account::new(""));
        assert!(Ledger::new(cfg, RecordingTransfer::new()).is_err());
    }

    #[test]
    fn deposit_is_self_attested() {
        let mut l = ledger();
        let alice = Account::new("alice");
        assert_eq!(l.deposit(&alice, &alice, 100).unwrap(), 100);
        let err = l.deposit(&Account::new("bob"), &alice, 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);
        assert_eq!(l.deposit_balance_of(&alice), 100);
    }

    #[test]
    fn zero_deposit_is_malformed() {
        let mut l = ledger();
        let alice = Account::new("alice");
        assert_eq!(l.deposit(&alice, &alice, 0).unwrap_err().kind(), ErrorKind::MalformedInput);
        assert_eq!(l.events().count(), 0);
    }

    #[test]
    fn debit_is_owner_only() {
        let mut l = ledger();
        let alice = Account::new("alice");
        let owner = l.owner().clone();
        l.deposit(&alice, &alice, 100).unwrap();
        assert_eq!(l.debit(&alice, &alice, 10).unwrap_err().kind(), ErrorKind::Authorization);
        assert_eq!(l.debit(&owner, &alice, 10).unwrap(), 90);
    }

    #[test]
    fn unauthorized_checkpoint_with_bad_hex_reports_authorization() {
        let mut l = ledger();
        let err = l.record_checkpoint_hex(&Account::new("alice"), "zz").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);
    }

    #[test]
    fn malformed_hex_from_owner() {
        let mut l = ledger();
        let owner = l.owner().clone();
        let err = l.record_checkpoint_hex(&owner, "abc").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
        assert_eq!(l.next_checkpoint_id(), CheckpointId(0));
    }

    #[test]
    fn ownership_transfer_moves_authority() {
        let mut l = ledger();
        let old = l.owner().clone();
        let new = Account::new("treasury");
        l.transfer_ownership(&old, new.clone()).unwrap();
        assert_eq!(l.owner(), &new);
        assert_eq!(
            l.record_checkpoint_hex(&old, "01").unwrap_err().kind(),
            ErrorKind::Authorization
        );
        assert_eq!(l.record_checkpoint_hex(&new, "01").unwrap(), CheckpointId(0));
    }

    #[test]
    fn ownership_transfer_to_empty_rejected() {
        let mut l = ledger();
        let owner = l.owner().clone();
        let err = l.transfer_ownership(&owner, Account::new("")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
        assert_eq!(l.owner(), &owner);
    }

    #[test]
    fn every_commit_extends_verified_chain() {
        let mut l = ledger();
        let owner = l.owner().clone();
        let alice = Account::new("alice");
        l.deposit(&owner, &owner, 500).unwrap();
        l.place_order(&alice, NewOrder::new(alice.clone(), 1, 1, 1)).unwrap();
        l.record_checkpoint_hex(&owner, "ab").unwrap();
        l.withdraw(&owner, &alice, 5).unwrap();
        let _ = l.withdraw(&alice, &alice, 5);
        let kinds: Vec<String> = l.events().map(|e| e.kind.to_string()).collect();
        assert_eq!(
            kinds,
            vec!["DEPOSITED", "ORDER_PLACED", "CHECKPOINT_RECORDED", "WITHDRAWN"]
        );
        l.verify_event_chain().unwrap();
    }

    #[test]
    fn event_log_can_be_disabled() {
        let mut cfg = LedgerConfig::new(Account::new("exchange"));
        cfg.event_log = false;
        let mut l = Ledger::new(cfg, RecordingTransfer::new()).unwrap();
        let alice = Account::new("alice");
        l.deposit(&alice, &alice, 1).unwrap();
        assert_eq!(l.events().count(), 0);
        assert_eq!(l.deposit_balance_of(&alice), 1);
    }
}
