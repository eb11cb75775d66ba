//! Staging overlay over a committed [`Table`].
//!
//! A `TableTx` reads through to its base table but buffers every write
//! locally. Nothing reaches the base until the owner calls
//! [`TableTx::into_staged`] and then [`Table::apply`]. Dropping the
//! overlay instead discards all of its writes, including the sequence
//! values it allocated.

use std::collections::{BTreeMap, HashMap};

use custody_types::{LedgerError, Result};

use crate::table::{Row, Staged, Table};

/// Buffered writes against one table.
pub struct TableTx<'a, R: Row> {
    base: &'a Table<R>,
    writes: BTreeMap<R::Key, R>,
    /// Index entries introduced by staged writes.
    staged_index: HashMap<Vec<u8>, R::Key>,
    next_seq: u64,
}

impl<'a, R: Row> TableTx<'a, R> {
    /// Open an overlay over `base`.
    #[must_use]
    pub fn begin(base: &'a Table<R>) -> Self {
        Self {
            base,
            writes: BTreeMap::new(),
            staged_index: HashMap::new(),
            next_seq: base.next_seq(),
        }
    }

    /// Current view of a row: staged write if any, else committed row.
    #[must_use]
    pub fn get(&self, key: &R::Key) -> Option<&R> {
        self.writes.get(key).or_else(|| self.base.get(key))
    }

    /// Keyed lookup through the unique index, seeing staged writes.
    #[must_use]
    pub fn find_unique(&self, index_key: &[u8]) -> Option<&R> {
        let base = self.base;
        let index = base.index()?;
        let key = self
            .staged_index
            .get(index_key)
            .or_else(|| index.entries.get(index_key))?;
        // A staged update may have moved the row off this index key.
        self.get(key)
            .filter(|row| (index.extract)(row).as_slice() == index_key)
    }

    /// Hand out the next sequence value. Only committed if the overlay is.
    ///
    /// # Errors
    /// Returns `IdSpaceExhausted` once the counter cannot advance.
    pub fn allocate_seq(&mut self) -> Result<u64> {
        let seq = self.next_seq;
        self.next_seq = seq
            .checked_add(1)
            .ok_or(LedgerError::IdSpaceExhausted {
                table: self.base.name(),
            })?;
        Ok(seq)
    }

    /// Stage a new row.
    ///
    /// # Errors
    /// - `DuplicateKey` if the primary key already holds a row
    /// - `DuplicateEntry` if the unique index already holds the row's index key
    pub fn insert(&mut self, row: R) -> Result<()> {
        let key = row.key();
        if self.get(&key).is_some() {
            return Err(LedgerError::DuplicateKey {
                table: self.base.name(),
                key: format!("{key:?}"),
            });
        }
        self.stage(key, row)
    }

    /// Stage a new row or a replacement for an existing one.
    ///
    /// # Errors
    /// Returns `DuplicateEntry` if another row already holds the index key.
    pub fn upsert(&mut self, row: R) -> Result<()> {
        let key = row.key();
        self.stage(key, row)
    }

    fn stage(&mut self, key: R::Key, row: R) -> Result<()> {
        let base = self.base;
        if let Some(index) = base.index() {
            let index_key = (index.extract)(&row);
            if let Some(holder) = self.find_unique(&index_key) {
                if holder.key() != key {
                    return Err(LedgerError::DuplicateEntry {
                        index: index.name,
                        key: hex_preview(&index_key),
                    });
                }
            }
            self.staged_index.insert(index_key, key.clone());
        }
        self.writes.insert(key, row);
        Ok(())
    }

    /// Release the overlay's borrow, keeping its write set.
    #[must_use]
    pub fn into_staged(self) -> Staged<R> {
        Staged {
            writes: self.writes,
            next_seq: self.next_seq,
        }
    }
}

fn hex_preview(bytes: &[u8]) -> String {
    const MAX: usize = 32;
    if bytes.len() > MAX {
        format!("{}...", hex::encode(&bytes[..MAX]))
    } else {
        hex::encode(bytes)
    }
}
