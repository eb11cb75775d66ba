//! Checkpoint commitments.
//!
//! A checkpoint stores an opaque commitment (typically a block-hash root).
//! Roots are unique across the registry; the engine enforces this through
//! a secondary index keyed on the root bytes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{CheckpointId, LedgerError, Result};

/// Opaque commitment bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CheckpointRoot(#[serde(with = "hex_bytes")] Vec<u8>);

impl CheckpointRoot {
    #[must_use]
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Decode a hex-encoded commitment (either case).
    ///
    /// Either case decodes to the same bytes, so `"AB12"` and `"ab12"` name
    /// one commitment.
    ///
    /// # Errors
    /// Returns `MalformedInput` on odd length or a non-hex character.
    pub fn from_hex(encoded: &str) -> Result<Self> {
        if encoded.len() % 2 != 0 {
            return Err(LedgerError::malformed(format!(
                "commitment hex has odd length {}",
                encoded.len()
            )));
        }
        hex::decode(encoded)
            .map(Self)
            .map_err(|e| LedgerError::malformed(format!("commitment is not hex: {e}")))
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl fmt::Display for CheckpointRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// A stored checkpoint row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub id: CheckpointId,
    pub root: CheckpointRoot,
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(d)?;
        hex::decode(encoded).map_err(serde::de::Error::custom)
    }
}
