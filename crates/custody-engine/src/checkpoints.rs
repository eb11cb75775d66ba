//! Checkpoint registry: deduplicated commitments.
//!
//! Roots are unique. The duplicate check is a keyed lookup through the
//! table's `checkpoint.root` hash index, never a scan, so recording `n`
//! checkpoints costs O(n) overall.

use custody_store::Table;
use custody_types::{
    constants, Checkpoint, CheckpointId, CheckpointRoot, EventKind, LedgerError, Operation, Result,
};

use crate::auth::Authorized;
use crate::tx::LedgerTx;

pub struct CheckpointRegistry;

impl CheckpointRegistry {
    /// Register `root` under a fresh id.
    ///
    /// # Errors
    /// - `MalformedInput` if `root` is empty or longer than `max_root_bytes`
    /// - `DuplicateEntry` if `root` is already registered
    /// - `IdSpaceExhausted` if no checkpoint id is left
    pub fn record(
        tx: &mut LedgerTx<'_>,
        auth: &Authorized,
        root: CheckpointRoot,
        max_root_bytes: usize,
    ) -> Result<CheckpointId> {
        auth.ensure(Operation::RecordCheckpoint, tx.owner())?;
        Self::validate(&root, max_root_bytes)?;

        if let Some(existing) = tx.checkpoints.find_unique(root.as_bytes()) {
            tracing::debug!(
                tx = %tx.id(),
                root = %root,
                existing = %existing.id,
                "Duplicate checkpoint root"
            );
            return Err(LedgerError::DuplicateEntry {
                index: constants::CHECKPOINT_ROOT_INDEX,
                key: root.to_hex(),
            });
        }

        let id = CheckpointId(tx.checkpoints.allocate_seq()?);
        tx.emit(EventKind::CheckpointRecorded {
            id,
            root: root.clone(),
        })?;
        tx.checkpoints.insert(Checkpoint { id, root })?;
        Ok(id)
    }

    fn validate(root: &CheckpointRoot, max_root_bytes: usize) -> Result<()> {
        if root.is_empty() {
            return Err(LedgerError::malformed("checkpoint root is empty"));
        }
        if root.len() > max_root_bytes {
            return Err(LedgerError::malformed(format!(
                "checkpoint root is {} bytes, limit is {max_root_bytes}",
                root.len()
            )));
        }
        Ok(())
    }

    /// Committed checkpoints in id (insertion) order.
    pub fn list(table: &Table<Checkpoint>) -> impl Iterator<Item = &Checkpoint> + '_ {
        table.iter()
    }

    /// Committed checkpoint holding `root`, if any.
    #[must_use]
    pub fn find<'t>(table: &'t Table<Checkpoint>, root: &CheckpointRoot) -> Option<&'t Checkpoint> {
        table.find_unique(root.as_bytes())
    }

    /// Id the next successful recording will receive.
    #[must_use]
    pub fn next_id(table: &Table<Checkpoint>) -> CheckpointId {
        CheckpointId(table.next_seq())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tx::LedgerState;
    use custody_types::{Account, ErrorKind, TxId};

    fn record(state: &mut LedgerState, root: &str) -> Result<CheckpointId> {
        let auth = Authorized::for_test(Operation::RecordCheckpoint, state.owner().clone());
        let root = CheckpointRoot::from_hex(root)?;
        let (id, changes) = {
            let mut tx = LedgerTx::begin(TxId::new(), state, true);
            let id = CheckpointRegistry::record(&mut tx, &auth, root, 4)?;
            (id, tx.into_changes())
        };
        state.apply(changes);
        Ok(id)
    }

    #[test]
    fn duplicate_root_rejected_and_table_unchanged() {
        let mut state = LedgerState::new(Account::new("exchange"));
        assert_eq!(record(&mut state, "ab12").unwrap(), CheckpointId(0));
        let err = record(&mut state, "ab12").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateEntry);
        assert!(format!("{err}").contains("ab12"));
        assert_eq!(CheckpointRegistry::list(state.checkpoints()).count(), 1);
        assert_eq!(CheckpointRegistry::next_id(state.checkpoints()), CheckpointId(1));
    }

    #[test]
    fn find_by_root() {
        let mut state = LedgerState::new(Account::new("exchange"));
        record(&mut state, "01").unwrap();
        record(&mut state, "02").unwrap();
        let root = CheckpointRoot::from_hex("02").unwrap();
        let found = CheckpointRegistry::find(state.checkpoints(), &root).unwrap();
        assert_eq!(found.id, CheckpointId(1));
    }

    #[test]
    fn empty_and_oversized_roots_are_malformed() {
        let mut state = LedgerState::new(Account::new("exchange"));
        assert_eq!(record(&mut state, "").unwrap_err().kind(), ErrorKind::MalformedInput);
        assert_eq!(
            record(&mut state, "0102030405").unwrap_err().kind(),
            ErrorKind::MalformedInput
        );
        assert!(state.checkpoints().is_empty());
    }

    #[test]
    fn same_root_twice_in_one_tx_is_duplicate() {
        let state = LedgerState::new(Account::new("exchange"));
        let auth = Authorized::for_test(Operation::RecordCheckpoint, state.owner().clone());
        let mut tx = LedgerTx::begin(TxId::new(), &state, true);
        let root = CheckpointRoot::from_bytes(vec![9]);
        CheckpointRegistry::record(&mut tx, &auth, root.clone(), 4).unwrap();
        let err = CheckpointRegistry::record(&mut tx, &auth, root, 4).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateEntry);
    }
}
