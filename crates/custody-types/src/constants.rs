//! System-wide constants for the custody ledger.

/// Default upper bound on the length of a checkpoint commitment, in bytes.
pub const DEFAULT_MAX_ROOT_BYTES: usize = 128;

/// Default tracing filter directive when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// `prev_digest` of the first event in the audit trail.
pub const GENESIS_DIGEST: [u8; 32] = [0u8; 32];

/// Domain separation tag for event chain digests.
pub const EVENT_DIGEST_DOMAIN: &[u8] = b"custody:event:v1:";

/// Table names, used in errors and logs.
pub const DEPOSIT_TABLE: &str = "deposit";
pub const ORDER_TABLE: &str = "order";
pub const CHECKPOINT_TABLE: &str = "checkpoint";
pub const EVENT_TABLE: &str = "event";

/// Name of the unique secondary index on checkpoint roots.
pub const CHECKPOINT_ROOT_INDEX: &str = "checkpoint.root";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
