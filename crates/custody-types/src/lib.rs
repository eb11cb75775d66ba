//! # custody-types
//!
//! Shared types, errors, and configuration for the **custody ledger**.
//!
//! This crate is the leaf dependency of the workspace. It defines:
//!
//! - **Identifiers**: [`Account`], [`OrderId`], [`CheckpointId`], [`TxId`]
//! - **Entities**: [`DepositBalance`], [`Order`], [`NewOrder`], [`Checkpoint`], [`CheckpointRoot`]
//! - **Authorization model**: [`Operation`], [`AuthPolicy`]
//! - **Audit trail**: [`LedgerEvent`], [`EventKind`]
//! - **Configuration**: [`LedgerConfig`], [`LoggingConfig`]
//! - **Errors**: [`LedgerError`] with `LG_ERR_` prefix codes, classified by [`ErrorKind`]
//! - **Constants**: system-wide limits and defaults

pub mod auth;
pub mod balance;
pub mod checkpoint;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod ids;
pub mod order;

pub use auth::*;
pub use balance::*;
pub use checkpoint::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use order::*;

// Constants are accessed via `custody_types::constants::FOO`.
