//! [`Row`] bindings for the ledger's entities, and table constructors.

use custody_types::{
    constants, Account, Checkpoint, CheckpointId, DepositBalance, LedgerEvent, Order, OrderId,
};

use crate::table::{Row, Table};

impl Row for DepositBalance {
    type Key = Account;
    fn key(&self) -> Account {
        self.account.clone()
    }
}

impl Row for Order {
    type Key = OrderId;
    fn key(&self) -> OrderId {
        self.id
    }
}

impl Row for Checkpoint {
    type Key = CheckpointId;
    fn key(&self) -> CheckpointId {
        self.id
    }
}

impl Row for LedgerEvent {
    type Key = u64;
    fn key(&self) -> u64 {
        self.seq
    }
}

/// Index key of a checkpoint: its raw root bytes.
pub fn checkpoint_root_key(checkpoint: &Checkpoint) -> Vec<u8> {
    checkpoint.root.as_bytes().to_vec()
}

/// account → balance.
#[must_use]
pub fn deposit_table() -> Table<DepositBalance> {
    Table::new(constants::DEPOSIT_TABLE)
}

/// id → order, append-only.
#[must_use]
pub fn order_table() -> Table<Order> {
    Table::new(constants::ORDER_TABLE)
}

/// id → checkpoint, with a unique index on `root`.
#[must_use]
pub fn checkpoint_table() -> Table<Checkpoint> {
    Table::with_unique_index(
        constants::CHECKPOINT_TABLE,
        constants::CHECKPOINT_ROOT_INDEX,
        checkpoint_root_key,
    )
}

/// seq → event.
#[must_use]
pub fn event_table() -> Table<LedgerEvent> {
    Table::new(constants::EVENT_TABLE)
}
