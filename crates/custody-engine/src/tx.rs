//! Transaction boundary.
//!
//! [`LedgerState`] holds the committed tables. A [`LedgerTx`] opens a
//! staging overlay over every table at once; ledger components read and
//! write only through it. On success the overlay is turned into an owned
//! [`ChangeSet`] and applied in one step. On any error the overlay is
//! dropped, so the committed state is exactly what it was before.

use custody_store::{
    checkpoint_table, deposit_table, event_table, order_table, Staged, Table, TableTx,
};
use custody_types::{
    constants, Account, Checkpoint, DepositBalance, EventKind, LedgerEvent, Order, Result, TxId,
};

/// Committed ledger state.
pub struct LedgerState {
    pub(crate) deposits: Table<DepositBalance>,
    pub(crate) orders: Table<Order>,
    pub(crate) checkpoints: Table<Checkpoint>,
    pub(crate) events: Table<LedgerEvent>,
    pub(crate) owner: Account,
}

impl LedgerState {
    /// Empty tables administered by `owner`.
    #[must_use]
    pub fn new(owner: Account) -> Self {
        Self {
            deposits: deposit_table(),
            orders: order_table(),
            checkpoints: checkpoint_table(),
            events: event_table(),
            owner,
        }
    }

    /// Fold a successful transaction's writes in.
    pub fn apply(&mut self, changes: ChangeSet) {
        self.deposits.apply(changes.deposits);
        self.orders.apply(changes.orders);
        self.checkpoints.apply(changes.checkpoints);
        self.events.apply(changes.events);
        if let Some(owner) = changes.owner {
            self.owner = owner;
        }
    }

    #[must_use]
    pub fn owner(&self) -> &Account {
        &self.owner
    }

    #[must_use]
    pub fn deposits(&self) -> &Table<DepositBalance> {
        &self.deposits
    }

    #[must_use]
    pub fn orders(&self) -> &Table<Order> {
        &self.orders
    }

    #[must_use]
    pub fn checkpoints(&self) -> &Table<Checkpoint> {
        &self.checkpoints
    }

    #[must_use]
    pub fn events(&self) -> &Table<LedgerEvent> {
        &self.events
    }
}

/// Staged writes of one in-flight operation.
pub struct LedgerTx<'a> {
    id: TxId,
    pub(crate) deposits: TableTx<'a, DepositBalance>,
    pub(crate) orders: TableTx<'a, Order>,
    pub(crate) checkpoints: TableTx<'a, Checkpoint>,
    events: TableTx<'a, LedgerEvent>,
    committed_owner: &'a Account,
    staged_owner: Option<Account>,
    event_log: bool,
}

impl<'a> LedgerTx<'a> {
    #[must_use]
    pub fn begin(id: TxId, state: &'a LedgerState, event_log: bool) -> Self {
        Self {
            id,
            deposits: TableTx::begin(&state.deposits),
            orders: TableTx::begin(&state.orders),
            checkpoints: TableTx::begin(&state.checkpoints),
            events: TableTx::begin(&state.events),
            committed_owner: &state.owner,
            staged_owner: None,
            event_log,
        }
    }

    #[must_use]
    pub fn id(&self) -> TxId {
        self.id
    }

    /// Administrative principal as this transaction sees it.
    #[must_use]
    pub fn owner(&self) -> &Account {
        self.staged_owner.as_ref().unwrap_or(self.committed_owner)
    }

    pub(crate) fn set_owner(&mut self, owner: Account) {
        self.staged_owner = Some(owner);
    }

    /// Append an audit event, chained to the last one this transaction sees.
    pub(crate) fn emit(&mut self, kind: EventKind) -> Result<()> {
        if !self.event_log {
            return Ok(());
        }
        let seq = self.events.allocate_seq()?;
        let prev_digest = match seq.checked_sub(1) {
            Some(prev) => self
                .events
                .get(&prev)
                .map_or(constants::GENESIS_DIGEST, |e| e.digest),
            None => constants::GENESIS_DIGEST,
        };
        let event = LedgerEvent::chained(seq, self.id, kind, prev_digest)?;
        self.events.insert(event)
    }

    /// Finish staging and release the borrow on the committed state.
    #[must_use]
    pub fn into_changes(self) -> ChangeSet {
        ChangeSet {
            tx_id: self.id,
            deposits: self.deposits.into_staged(),
            orders: self.orders.into_staged(),
            checkpoints: self.checkpoints.into_staged(),
            events: self.events.into_staged(),
            owner: self.staged_owner,
        }
    }
}

/// Owned write set of a finished transaction.
pub struct ChangeSet {
    pub tx_id: TxId,
    deposits: Staged<DepositBalance>,
    orders: Staged<Order>,
    checkpoints: Staged<Checkpoint>,
    events: Staged<LedgerEvent>,
    owner: Option<Account>,
}

impl ChangeSet {
    /// Number of rows written across all tables.
    #[must_use]
    pub fn rows_written(&self) -> usize {
        self.deposits.len() + self.orders.len() + self.checkpoints.len() + self.events.len()
    }
}
