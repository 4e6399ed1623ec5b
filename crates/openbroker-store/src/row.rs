//! Rows with an exclusive latch and a committed value.
//!
//! A row's latch is the pessimistic lock a transaction holds from its first
//! read until commit or rollback. The committed value sits behind its own
//! `RwLock`, so read-only projections never wait on a latch holder.

use std::{hash::Hash, sync::Arc, time::Duration};

use dashmap::DashMap;
use parking_lot::{lock_api::ArcMutexGuard, Mutex, RawMutex, RwLock};

pub(crate) struct Row<T> {
    latch: Arc<Mutex<()>>,
    committed: RwLock<Option<T>>,
}

impl<T: Clone> Row<T> {
    fn vacant() -> Self {
        Self {
            latch: Arc::new(Mutex::new(())),
            committed: RwLock::new(None),
        }
    }

    fn occupied(value: T) -> Self {
        Self {
            latch: Arc::new(Mutex::new(())),
            committed: RwLock::new(Some(value)),
        }
    }

    pub(crate) fn read(&self) -> Option<T> {
        self.committed.read().clone()
    }
}

/// A row latched by one transaction, with its staged (uncommitted) value.
pub(crate) struct RowLock<T> {
    row: Arc<Row<T>>,
    staged: Option<T>,
    dirty: bool,
    _latch: ArcMutexGuard<RawMutex, ()>,
}

impl<T: Clone> RowLock<T> {
    /// Wait up to `timeout` for the row's latch. `None` on timeout.
    pub(crate) fn acquire(row: Arc<Row<T>>, timeout: Duration) -> Option<Self> {
        let latch = row.latch.try_lock_arc_for(timeout)?;
        // Read after latching: we observe every write committed before us.
        let staged = row.read();
        Some(Self {
            row,
            staged,
            dirty: false,
            _latch: latch,
        })
    }

    pub(crate) fn staged(&self) -> Option<&T> {
        self.staged.as_ref()
    }

    pub(crate) fn stage(&mut self, value: T) {
        self.staged = Some(value);
        self.dirty = true;
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Make the staged value visible to everyone. Returns whether anything
    /// was written.
    pub(crate) fn publish(&mut self) -> bool {
        if !self.dirty {
            return false;
        }
        *self.row.committed.write() = self.staged.clone();
        self.dirty = false;
        true
    }
}

/// Keyed collection of rows. Rows are created on first reference, so a
/// key's latch exists even before its value does. A row that never got a
/// committed value is dropped by [`prune_vacant`](Table::prune_vacant) once
/// nobody references it.
pub(crate) struct Table<K, T> {
    rows: DashMap<K, Arc<Row<T>>>,
}

impl<K: Eq + Hash + Clone, T: Clone> Table<K, T> {
    pub(crate) fn new() -> Self {
        Self {
            rows: DashMap::new(),
        }
    }

    /// The row for `key`, creating an empty one if needed.
    pub(crate) fn row_or_vacant(&self, key: &K) -> Arc<Row<T>> {
        Arc::clone(
            self.rows
                .entry(key.clone())
                .or_insert_with(|| Arc::new(Row::vacant()))
                .value(),
        )
    }

    /// Remove the row for `key` if it has no committed value and no one else
    /// holds it. Returns whether a row was removed.
    pub(crate) fn prune_vacant(&self, key: &K) -> bool {
        self.rows
            .remove_if(key, |_, row| Arc::strong_count(row) == 1 && row.read().is_none())
            .is_some()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }

    pub(crate) fn existing_row(&self, key: &K) -> Option<Arc<Row<T>>> {
        self.rows.get(key).map(|entry| Arc::clone(entry.value()))
    }

    pub(crate) fn read(&self, key: &K) -> Option<T> {
        self.existing_row(key)?.read()
    }

    /// Every committed value, in no particular order.
    pub(crate) fn committed(&self) -> Vec<T> {
        self.rows
            .iter()
            .filter_map(|entry| entry.value().read())
            .collect()
    }

    pub(crate) fn restore(&self, key: K, value: T) {
        self.rows.insert(key, Arc::new(Row::occupied(value)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vacant_row_reads_none() {
        let table: Table<u32, String> = Table::new();
        let row = table.row_or_vacant(&1);
        assert!(row.read().is_none());
        assert!(table.committed().is_empty());
        assert!(table.existing_row(&1).is_some());
        assert!(table.existing_row(&2).is_none());
    }

    #[test]
    fn staged_value_invisible_until_published() {
        let table: Table<u32, String> = Table::new();
        let mut lock = RowLock::acquire(table.row_or_vacant(&1), Duration::from_millis(10)).unwrap();
        lock.stage("hello".to_string());
        assert!(lock.is_dirty());
        assert_eq!(table.read(&1), None);

        assert!(lock.publish());
        assert_eq!(table.read(&1), Some("hello".to_string()));
        assert!(!lock.publish());
    }

    #[test]
    fn latch_is_exclusive() {
        let table: Table<u32, String> = Table::new();
        let held = RowLock::acquire(table.row_or_vacant(&1), Duration::from_millis(10)).unwrap();
        assert!(RowLock::acquire(table.row_or_vacant(&1), Duration::from_millis(10)).is_none());
        drop(held);
        assert!(RowLock::acquire(table.row_or_vacant(&1), Duration::from_millis(10)).is_some());
    }

    #[test]
    fn prune_keeps_held_and_committed_rows() {
        let table: Table<u32, String> = Table::new();
        let held = RowLock::acquire(table.row_or_vacant(&1), Duration::from_millis(10)).unwrap();
        assert!(!table.prune_vacant(&1));
        drop(held);
        assert!(table.prune_vacant(&1));
        assert_eq!(table.len(), 0);

        table.restore(2, "two".to_string());
        assert!(!table.prune_vacant(&2));
        assert!(!table.prune_vacant(&3));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn restore_overwrites_row() {
        let table: Table<u32, String> = Table::new();
        table.restore(3, "three".to_string());
        assert_eq!(table.read(&3), Some("three".to_string()));
        assert_eq!(table.committed(), vec!["three".to_string()]);
    }
}
