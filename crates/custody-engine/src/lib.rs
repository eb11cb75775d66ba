//! # custody-engine
//!
//! Transactional ledger engine for a custodial exchange: per-account
//! deposit balances, an append-only order table, and a registry of
//! deduplicated checkpoint commitments.
//!
//! ## Components
//!
//! 1. **AuthorizationGate**: resolves each operation's policy (owner-only or
//!    self-attested) and issues an [`Authorized`] capability
//! 2. **DepositLedger**: checked credit / debit over account balances
//! 3. **OrderLedger**: credits the order value and appends the order
//! 4. **CheckpointRegistry**: index-backed unique commitment registry
//! 5. **WithdrawalGate**: debits the owner and instructs the external
//!    [`AssetTransfer`] collaborator
//!
//! ## Request Flow
//!
//! ```text
//! caller → Ledger::op → LedgerTx::begin → AuthorizationGate::admit
//!        → component(s) stage writes → commit (apply ChangeSet) | rollback (drop)
//! ```
//!
//! A failed operation leaves every table, id counter, and the audit trail
//! exactly as it was.

pub mod audit;
pub mod auth;
pub mod checkpoints;
pub mod deposits;
pub mod ledger;
pub mod orders;
pub mod shared;
pub mod telemetry;
pub mod transfer;
pub mod tx;
pub mod withdrawal;

pub use auth::{AuthorizationGate, Authorized};
pub use checkpoints::CheckpointRegistry;
pub use deposits::DepositLedger;
pub use ledger::Ledger;
pub use orders::OrderLedger;
pub use shared::SharedLedger;
pub use transfer::{AssetTransfer, RecordingTransfer, TransferInstruction, TransferRejection};
pub use tx::{ChangeSet, LedgerState, LedgerTx};
pub use withdrawal::WithdrawalGate;
