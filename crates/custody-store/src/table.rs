//! Keyed tables with an optional unique secondary index.
//!
//! A [`Table`] owns committed rows in primary-key order. Writes never go to
//! a table directly: they are staged in a [`TableTx`](crate::TableTx) and
//! folded in by [`Table::apply`] once the whole transaction has succeeded.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// A row that can be stored in a [`Table`].
pub trait Row: Clone {
    type Key: Ord + Clone + fmt::Debug;

    /// Primary key of this row.
    fn key(&self) -> Self::Key;
}

/// Extracts the secondary index key of a row.
pub type IndexFn<R> = fn(&R) -> Vec<u8>;

/// Unique secondary index: index key bytes → primary key.
pub(crate) struct UniqueIndex<R: Row> {
    pub(crate) name: &'static str,
    pub(crate) extract: IndexFn<R>,
    pub(crate) entries: HashMap<Vec<u8>, R::Key>,
}

/// Committed rows of one table.
pub struct Table<R: Row> {
    name: &'static str,
    rows: BTreeMap<R::Key, R>,
    index: Option<UniqueIndex<R>>,
    /// Next value handed out by `TableTx::allocate_seq`.
    next_seq: u64,
}

impl<R: Row> Table<R> {
    /// Create an empty table without a secondary index.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            rows: BTreeMap::new(),
            index: None,
            next_seq: 0,
        }
    }

    /// Create an empty table with a unique secondary index named `index_name`.
    #[must_use]
    pub fn with_unique_index(
        name: &'static str,
        index_name: &'static str,
        extract: IndexFn<R>,
    ) -> Self {
        Self {
            name,
            rows: BTreeMap::new(),
            index: Some(UniqueIndex {
                name: index_name,
                extract,
                entries: HashMap::new(),
            }),
            next_seq: 0,
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn get(&self, key: &R::Key) -> Option<&R> {
        self.rows.get(key)
    }

    /// Look up a row through the unique index. `None` if the table has no index.
    #[must_use]
    pub fn find_unique(&self, index_key: &[u8]) -> Option<&R> {
        let index = self.index.as_ref()?;
        index.entries.get(index_key).and_then(|k| self.rows.get(k))
    }

    /// Rows in primary-key order.
    pub fn iter(&self) -> impl Iterator<Item = &R> + '_ {
        self.rows.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The sequence value the next allocation would return.
    #[must_use]
    pub fn next_seq(&self) -> u64 {
        self.next_seq
    }

    pub(crate) fn index(&self) -> Option<&UniqueIndex<R>> {
        self.index.as_ref()
    }

    /// Fold a staged write set into the committed rows.
    ///
    /// Uniqueness was checked while staging, so this cannot fail.
    pub fn apply(&mut self, staged: Staged<R>) {
        let written = staged.writes.len();
        if let Some(index) = self.index.as_mut() {
            // Release every stale entry before claiming new ones: a row in
            // this set may take over a key another row in it gives up.
            for key in staged.writes.keys() {
                if let Some(old) = self.rows.get(key) {
                    let old_entry = (index.extract)(old);
                    if index.entries.get(&old_entry) == Some(key) {
                        index.entries.remove(&old_entry);
                    }
                }
            }
            for (key, row) in &staged.writes {
                index.entries.insert((index.extract)(row), key.clone());
            }
        }
        for (key, row) in staged.writes {
            self.rows.insert(key, row);
        }
        self.next_seq = staged.next_seq;
        tracing::trace!(
            table = self.name,
            rows = written,
            next_seq = self.next_seq,
            "Staged writes applied"
        );
    }
}

/// Owned write set produced by a finished [`TableTx`](crate::TableTx).
pub struct Staged<R: Row> {
    pub(crate) writes: BTreeMap<R::Key, R>,
    pub(crate) next_seq: u64,
}

impl<R: Row> Staged<R> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TableTx;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: u64,
        tag: String,
    }

    impl Row for Item {
        type Key = u64;
        fn key(&self) -> u64 {
            self.id
        }
    }

    fn by_tag(item: &Item) -> Vec<u8> {
        item.tag.as_bytes().to_vec()
    }

    fn item(id: u64, tag: &str) -> Item {
        Item {
            id,
            tag: tag.to_string(),
        }
    }

    #[test]
    fn empty_table() {
        let table: Table<Item> = Table::new("item");
        assert!(table.is_empty());
        assert_eq!(table.next_seq(), 0);
        assert!(table.get(&0).is_none());
        assert!(table.find_unique(b"x").is_none());
    }

    #[test]
    fn apply_inserts_rows_in_key_order() {
        let mut table = Table::with_unique_index("item", "item.tag", by_tag);
        let staged = {
            let mut tx = TableTx::begin(&table);
            tx.insert(item(2, "b")).unwrap();
            tx.insert(item(1, "a")).unwrap();
            tx.into_staged()
        };
        table.apply(staged);
        let ids: Vec<u64> = table.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(table.find_unique(b"b").unwrap().id, 2);
    }

    #[test]
    fn apply_replaces_stale_index_entry() {
        let mut table = Table::with_unique_index("item", "item.tag", by_tag);
        let staged = {
            let mut tx = TableTx::begin(&table);
            tx.insert(item(1, "old")).unwrap();
            tx.into_staged()
        };
        table.apply(staged);
        let staged = {
            let mut tx = TableTx::begin(&table);
            tx.upsert(item(1, "new")).unwrap();
            tx.into_staged()
        };
        table.apply(staged);
        assert!(table.find_unique(b"old").is_none());
        assert_eq!(table.find_unique(b"new").unwrap().id, 1);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn index_key_handed_between_rows_in_one_commit() {
        let mut table = Table::with_unique_index("item", "item.tag", by_tag);
        let staged = {
            let mut tx = TableTx::begin(&table);
            tx.insert(item(0, "a")).unwrap();
            tx.insert(item(1, "b")).unwrap();
            tx.into_staged()
        };
        table.apply(staged);

        // Row 1 gives up "b" and row 0 takes it; row 0 is applied first.
        let staged = {
            let mut tx = TableTx::begin(&table);
            tx.upsert(item(1, "c")).unwrap();
            tx.upsert(item(0, "b")).unwrap();
            tx.into_staged()
        };
        table.apply(staged);

        assert_eq!(table.find_unique(b"b").unwrap().id, 0);
        assert_eq!(table.find_unique(b"c").unwrap().id, 1);
        assert!(table.find_unique(b"a").is_none());

        let mut tx = TableTx::begin(&table);
        assert!(tx.insert(item(2, "b")).is_err());
        assert_eq!(table.iter().filter(|i| i.tag == "b").count(), 1);
    }
}
