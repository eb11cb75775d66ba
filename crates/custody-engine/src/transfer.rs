//! Outbound asset transfers.
//!
//! The ledger does not move funds itself. Withdrawals hand a single
//! instruction to an [`AssetTransfer`] collaborator inside the enclosing
//! transaction; a rejection aborts that transaction.

use custody_types::Account;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A refusal from the transfer collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct TransferRejection {
    pub reason: String,
}

impl TransferRejection {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// One instruction issued to the collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferInstruction {
    pub receiver: Account,
    pub amount: u64,
}

/// External ledger that moves funds out of custody.
pub trait AssetTransfer {
    /// Move `amount` to `receiver`. Synchronous from the ledger's view.
    fn transfer(&mut self, receiver: &Account, amount: u64) -> Result<(), TransferRejection>;
}

impl<T: AssetTransfer + ?Sized> AssetTransfer for Box<T> {
    fn transfer(&mut self, receiver: &Account, amount: u64) -> Result<(), TransferRejection> {
        (**self).transfer(receiver, amount)
    }
}

/// In-memory collaborator that records accepted instructions.
///
/// Receivers on the block list, and any instruction while
/// [`RecordingTransfer::reject_all`] is set, are refused.
#[derive(Debug, Default)]
pub struct RecordingTransfer {
    accepted: Vec<TransferInstruction>,
    blocked: Vec<Account>,
    reject_all: Option<String>,
}

impl RecordingTransfer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse every future instruction to `receiver`.
    pub fn block(&mut self, receiver: Account) {
        self.blocked.push(receiver);
    }

    /// Refuse every future instruction with `reason` (`None` to resume).
    pub fn reject_all(&mut self, reason: Option<String>) {
        self.reject_all = reason;
    }

    /// Instructions accepted so far, in order.
    #[must_use]
    pub fn accepted(&self) -> &[TransferInstruction] {
        &self.accepted
    }

    /// Sum of accepted amounts. Saturates at `u64::MAX`.
    #[must_use]
    pub fn total_sent(&self) -> u64 {
        self.accepted
            .iter()
            .fold(0u64, |acc, i| acc.saturating_add(i.amount))
    }
}

impl AssetTransfer for RecordingTransfer {
    fn transfer(&mut self, receiver: &Account, amount: u64) -> Result<(), TransferRejection> {
        if let Some(reason) = &self.reject_all {
            return Err(TransferRejection::new(reason.clone()));
        }
        if self.blocked.contains(receiver) {
            return Err(TransferRejection::new(format!("receiver {receiver} is blocked")));
        }
        self.accepted.push(TransferInstruction {
            receiver: receiver.clone(),
            amount,
        });
        Ok(())
    }
}
