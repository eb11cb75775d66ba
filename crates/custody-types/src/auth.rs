//! Authorization model: which principal each mutating operation needs.
//!
//! Every mutating operation declares one [`AuthPolicy`]. The engine's
//! gate resolves the policy to a concrete principal and compares it
//! with the caller established by the signature layer.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Who must have signed a request for it to proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthPolicy {
    /// Only the ledger's administrative principal.
    OwnerOnly,
    /// Only the account named inside the request payload.
    SelfAttested,
}

impl fmt::Display for AuthPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OwnerOnly => write!(f, "OWNER_ONLY"),
            Self::SelfAttested => write!(f, "SELF_ATTESTED"),
        }
    }
}

/// Mutating operations exposed by the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    Deposit,
    Debit,
    PlaceOrder,
    RecordCheckpoint,
    Withdraw,
    TransferOwnership,
}

impl Operation {
    /// The policy this operation is declared with.
    #[must_use]
    pub const fn policy(self) -> AuthPolicy {
        match self {
            Self::Deposit | Self::PlaceOrder => AuthPolicy::SelfAttested,
            Self::Debit | Self::RecordCheckpoint | Self::Withdraw | Self::TransferOwnership => {
                AuthPolicy::OwnerOnly
            }
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deposit => write!(f, "DEPOSIT"),
            Self::Debit => write!(f, "DEBIT"),
            Self::PlaceOrder => write!(f, "PLACE_ORDER"),
            Self::RecordCheckpoint => write!(f, "RECORD_CHECKPOINT"),
            Self::Withdraw => write!(f, "WITHDRAW"),
            Self::TransferOwnership => write!(f, "TRANSFER_OWNERSHIP"),
        }
    }
}
