//! Ledger events: the append-only audit trail.
//!
//! Every committed operation appends one event. Events are chained: each
//! digest is SHA-256 over the domain tag, the sequence number, the
//! previous digest, and the canonical JSON of the event kind. Altering or
//! dropping any event breaks every digest after it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{constants, Account, CheckpointId, CheckpointRoot, OrderId, Result, TxId};

/// What happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// Funds credited to an account by an explicit deposit.
    Deposited {
        account: Account,
        amount: u64,
        balance: u64,
    },
    /// Funds removed from an account by the owner.
    Debited {
        account: Account,
        amount: u64,
        balance: u64,
    },
    /// An order was stored and its value credited to the owner.
    OrderPlaced {
        order_id: OrderId,
        owner: Account,
        price: u64,
        amount: u64,
        value: u64,
        balance: u64,
    },
    /// A checkpoint commitment was registered.
    CheckpointRecorded { id: CheckpointId, root: CheckpointRoot },
    /// Funds left the ledger through the asset-transfer collaborator.
    Withdrawn { receiver: Account, amount: u64 },
    /// The administrative principal changed.
    OwnershipTransferred { previous: Account, new: Account },
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Deposited { .. } => write!(f, "DEPOSITED"),
            Self::Debited { .. } => write!(f, "DEBITED"),
            Self::OrderPlaced { .. } => write!(f, "ORDER_PLACED"),
            Self::CheckpointRecorded { .. } => write!(f, "CHECKPOINT_RECORDED"),
            Self::Withdrawn { .. } => write!(f, "WITHDRAWN"),
            Self::OwnershipTransferred { .. } => write!(f, "OWNERSHIP_TRANSFERRED"),
        }
    }
}

/// One entry of the audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEvent {
    /// Position in the trail, starting at 0.
    pub seq: u64,
    /// Transaction that produced the event.
    pub tx_id: TxId,
    pub kind: EventKind,
    /// Digest of the preceding event ([`constants::GENESIS_DIGEST`] for the first).
    pub prev_digest: [u8; 32],
    pub digest: [u8; 32],
    pub recorded_at: DateTime<Utc>,
}

impl LedgerEvent {
    /// Build the event that follows `prev_digest` at position `seq`.
    pub fn chained(
        seq: u64,
        tx_id: TxId,
        kind: EventKind,
        prev_digest: [u8; 32],
    ) -> Result<Self> {
        let digest = Self::compute_digest(seq, &prev_digest, &kind)?;
        Ok(Self {
            seq,
            tx_id,
            kind,
            prev_digest,
            digest,
            recorded_at: Utc::now(),
        })
    }

    /// Chain digest for an event.
    pub fn compute_digest(seq: u64, prev_digest: &[u8; 32], kind: &EventKind) -> Result<[u8; 32]> {
        let payload = serde_json::to_vec(kind)?;
        let mut hasher = Sha256::new();
        hasher.update(constants::EVENT_DIGEST_DOMAIN);
        hasher.update(seq.to_le_bytes());
        hasher.update(prev_digest);
        hasher.update(&payload);
        Ok(hasher.finalize().into())
    }

    /// Whether `digest` matches the event's contents.
    pub fn is_intact(&self) -> Result<bool> {
        Ok(Self::compute_digest(self.seq, &self.prev_digest, &self.kind)? == self.digest)
    }

    #[must_use]
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deposit(amount: u64) -> EventKind {
        EventKind::Deposited {
            account: Account::new("alice"),
            amount,
            balance: amount,
        }
    }

    #[test]
    fn digest_is_deterministic() {
        let a = LedgerEvent::compute_digest(0, &constants::GENESIS_DIGEST, &deposit(5)).unwrap();
        let b = LedgerEvent::compute_digest(0, &constants::GENESIS_DIGEST, &deposit(5)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn digest_depends_on_every_input() {
        let base = LedgerEvent::compute_digest(0, &constants::GENESIS_DIGEST, &deposit(5)).unwrap();
        let other_seq =
            LedgerEvent::compute_digest(1, &constants::GENESIS_DIGEST, &deposit(5)).unwrap();
        let other_prev = LedgerEvent::compute_digest(0, &[1u8; 32], &deposit(5)).unwrap();
        let other_kind =
            LedgerEvent::compute_digest(0, &constants::GENESIS_DIGEST, &deposit(6)).unwrap();
        assert_ne!(base, other_seq);
        assert_ne!(base, other_prev);
        assert_ne!(base, other_kind);
    }

    #[test]
    fn tampered_event_is_detected() {
        let mut event =
            LedgerEvent::chained(0, TxId::new(), deposit(5), constants::GENESIS_DIGEST).unwrap();
        assert!(event.is_intact().unwrap());
        event.kind = deposit(500);
        assert!(!event.is_intact().unwrap());
    }

    #[test]
    fn kind_display() {
        assert_eq!(format!("{}", deposit(1)), "DEPOSITED");
        let kind = EventKind::Withdrawn {
            receiver: Account::new("bob"),
            amount: 1,
        };
        assert_eq!(format!("{kind}"), "WITHDRAWN");
    }

    #[test]
    fn kind_serializes_with_type_tag() {
        let json = serde_json::to_string(&deposit(7)).unwrap();
        assert!(json.contains(r#""type":"deposited""#), "{json}");
    }
}
