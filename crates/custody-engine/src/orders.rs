//! Order ledger: append-only table of placed orders.
//!
//! Placing an order credits the owner's deposit balance by the order's
//! `value` and stores the order under a fresh id. Both writes are staged
//! in the same transaction, so either both land or neither does. Orders
//! are never matched, cancelled, or updated afterwards.

use custody_store::Table;
use custody_types::{EventKind, NewOrder, Operation, Order, OrderId, Result};

use crate::auth::Authorized;
use crate::deposits::DepositLedger;
use crate::tx::LedgerTx;

pub struct OrderLedger;

impl OrderLedger {
    /// Credit `order.value` to the owner and insert the order row.
    ///
    /// `auth` must have been issued for [`Operation::PlaceOrder`] with the
    /// order's owner as the required principal.
    ///
    /// # Errors
    /// - `BalanceOverflow` if the credit overflows
    /// - `IdSpaceExhausted` if no order id is left
    pub fn place(tx: &mut LedgerTx<'_>, auth: &Authorized, order: NewOrder) -> Result<OrderId> {
        auth.ensure(Operation::PlaceOrder, &order.owner)?;

        let balance = DepositLedger::credit(tx, &order.owner, order.value)?;
        let id = OrderId(tx.orders.allocate_seq()?);
        let order = order.into_order(id);

        tx.emit(EventKind::OrderPlaced {
            order_id: id,
            owner: order.owner.clone(),
            price: order.price,
            amount: order.amount,
            value: order.value,
            balance,
        })?;
        tracing::debug!(
            tx = %tx.id(),
            order = %id,
            owner = %order.owner,
            price = order.price,
            amount = order.amount,
            value = order.value,
            "Order staged"
        );
        tx.orders.insert(order)?;
        Ok(id)
    }

    /// Committed orders in id (insertion) order.
    pub fn list(table: &Table<Order>) -> impl Iterator<Item = &Order> + '_ {
        table.iter()
    }

    /// Id the next successful placement will receive.
    #[must_use]
    pub fn next_id(table: &Table<Order>) -> OrderId {
        OrderId(table.next_seq())
    }
}
