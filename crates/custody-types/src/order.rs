//! Order entity.
//!
//! Orders are append-only: inserted once with a ledger-assigned id, never
//! mutated, cancelled, or matched.

use serde::{Deserialize, Serialize};

use crate::{Account, OrderId};

/// Request payload for placing an order. The id is assigned by the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    /// The account placing the order; must be the request's signer.
    pub owner: Account,
    pub price: u64,
    pub amount: u64,
    /// Credited to the owner's deposit balance when the order is placed.
    pub value: u64,
}

impl NewOrder {
    #[must_use]
    pub fn new(owner: Account, price: u64, amount: u64, value: u64) -> Self {
        Self {
            owner,
            price,
            amount,
            value,
        }
    }

    /// Attach the allocated id, producing the stored row.
    #[must_use]
    pub fn into_order(self, id: OrderId) -> Order {
        Order {
            id,
            owner: self.owner,
            price: self.price,
            amount: self.amount,
            value: self.value,
        }
    }
}

/// A stored order row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub owner: Account,
    pub price: u64,
    pub amount: u64,
    pub value: u64,
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl NewOrder {
    /// An order for a random account with small fixed terms.
    pub fn dummy() -> Self {
        Self::new(Account::random(), 10, 5, 50)
    }
}
