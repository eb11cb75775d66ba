//! # custody-store
//!
//! In-memory keyed tables for the custody ledger, with the write
//! discipline the engine's transaction boundary is built on.
//!
//! ## Model
//!
//! - [`Table`]: committed rows in primary-key order, plus an optional
//!   unique secondary index (hash map from index key to primary key)
//! - [`TableTx`]: a staging overlay that reads through to its table and
//!   buffers writes and sequence allocations
//! - [`Staged`]: the owned write set of a finished overlay, folded in with
//!   [`Table::apply`]
//!
//! ```text
//! TableTx::begin(&table) → get / find_unique / insert / upsert / allocate_seq
//!     → into_staged() → table.apply(staged)     (commit)
//!     → drop                                     (rollback)
//! ```

pub mod rows;
pub mod staging;
pub mod table;

pub use rows::{checkpoint_table, deposit_table, event_table, order_table};
pub use staging::TableTx;
pub use table::{IndexFn, Row, Staged, Table};
