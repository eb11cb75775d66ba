//! Error types for the custody ledger.
//!
//! All errors use the `LG_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Authorization errors
//! - 2xx: Balance errors
//! - 3xx: unassigned (orders fail through 2xx and 4xx)
//! - 4xx: Table / index errors: duplicate root, duplicate key, id space
//! - 5xx: External collaborator errors
//! - 9xx: General / internal errors
//!
//! Every failure aborts the whole enclosing operation. [`LedgerError::kind`]
//! gives callers a payload-free classification to branch on.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Account, Operation};

/// Central error enum for all ledger operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    // =================================================================
    // Authorization Errors (1xx)
    // =================================================================
    /// The caller does not carry the authority the operation requires.
    #[error("LG_ERR_100: {operation} requires authority of {required}, caller is {caller}")]
    Unauthorized {
        operation: Operation,
        caller: Account,
        required: Account,
    },

    // =================================================================
    // Balance Errors (2xx)
    // =================================================================
    /// A debit asked for more than the stored balance.
    #[error("LG_ERR_200: Insufficient funds for {account}: requested {requested}, available {available}")]
    InsufficientFunds {
        account: Account,
        requested: u64,
        available: u64,
    },

    /// A credit would exceed the representable balance range.
    #[error("LG_ERR_201: Balance overflow for {account}: {current} + {amount}")]
    BalanceOverflow {
        account: Account,
        current: u64,
        amount: u64,
    },

    // =================================================================
    // Table / Index Errors (4xx)
    // =================================================================
    /// A unique index already holds this key.
    #[error("LG_ERR_400: Duplicate entry in {index}: {key}")]
    DuplicateEntry { index: &'static str, key: String },

    /// A primary key already holds a row and the table is insert-only.
    #[error("LG_ERR_401: Primary key already present in {table}: {key}")]
    DuplicateKey { table: &'static str, key: String },

    /// The table can no longer allocate a fresh primary key.
    #[error("LG_ERR_402: Id space exhausted for {table}")]
    IdSpaceExhausted { table: &'static str },

    // =================================================================
    // External Collaborator Errors (5xx)
    // =================================================================
    /// The asset-transfer collaborator refused the outbound instruction.
    #[error("LG_ERR_500: Transfer of {amount} to {receiver} rejected: {reason}")]
    TransferRejected {
        receiver: Account,
        amount: u64,
        reason: String,
    },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Structurally invalid request input.
    #[error("LG_ERR_900: Malformed input: {reason}")]
    MalformedInput { reason: String },

    /// Configuration error (invalid config file, missing fields, etc.).
    #[error("LG_ERR_901: Configuration error: {0}")]
    Configuration(String),

    /// Serialization / deserialization error.
    #[error("LG_ERR_902: Serialization error: {0}")]
    Serialization(String),

    /// I/O error.
    #[error("LG_ERR_903: I/O error: {0}")]
    Io(String),

    /// Unrecoverable internal error.
    #[error("LG_ERR_904: Internal error: {0}")]
    Internal(String),

    /// The audit trail no longer hashes to itself.
    #[error("LG_ERR_905: Event chain broken at seq {seq}: {reason}")]
    EventChainBroken { seq: u64, reason: String },
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, LedgerError>;

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Payload-free classification of a [`LedgerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Authorization,
    DuplicateEntry,
    InsufficientFunds,
    Overflow,
    MalformedInput,
    ExternalCollaborator,
    Configuration,
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authorization => write!(f, "AUTHORIZATION"),
            Self::DuplicateEntry => write!(f, "DUPLICATE_ENTRY"),
            Self::InsufficientFunds => write!(f, "INSUFFICIENT_FUNDS"),
            Self::Overflow => write!(f, "OVERFLOW"),
            Self::MalformedInput => write!(f, "MALFORMED_INPUT"),
            Self::ExternalCollaborator => write!(f, "EXTERNAL_COLLABORATOR"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

impl LedgerError {
    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized { .. } => ErrorKind::Authorization,
            Self::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            Self::BalanceOverflow { .. } | Self::IdSpaceExhausted { .. } => ErrorKind::Overflow,
            Self::DuplicateEntry { .. } | Self::DuplicateKey { .. } => ErrorKind::DuplicateEntry,
            Self::TransferRejected { .. } => ErrorKind::ExternalCollaborator,
            Self::MalformedInput { .. } => ErrorKind::MalformedInput,
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Serialization(_)
            | Self::Io(_)
            | Self::Internal(_)
            | Self::EventChainBroken { .. } => ErrorKind::Internal,
        }
    }

    /// Shorthand for [`LedgerError::MalformedInput`].
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            reason: reason.into(),
        }
    }
}
