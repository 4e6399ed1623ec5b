//! Unit of work with pessimistic row locking.
//!
//! A [`Transaction`] latches every row it reads for update and keeps the
//! latch until it finishes. Writes are staged inside the transaction and
//! become visible to other readers only on [`commit`](Transaction::commit).
//! Dropping a transaction without committing rolls it back: staged writes
//! are discarded and all latches are released.
//!
//! Latches are re-entrant within one transaction: asking again for a row
//! already held returns the staged value without waiting.
//!
//! Latching a missing key creates an empty row for it. When the transaction
//! finishes, rows it created that still hold no committed value are removed
//! again, as is the row of a key whose latch timed out.

use std::{
    collections::{btree_map::Entry, BTreeMap},
    time::Duration,
};

use openbroker_types::{Balance, BalanceKey, NewOrder, OpenbrokerError, Order, OrderId, Result};

use crate::{row::RowLock, Store};

pub struct Transaction<'s> {
    store: &'s Store,
    balances: BTreeMap<BalanceKey, RowLock<Balance>>,
    orders: BTreeMap<OrderId, RowLock<Order>>,
    lock_timeout: Duration,
    finished: bool,
}

impl<'s> Transaction<'s> {
    pub(crate) fn begin(store: &'s Store, lock_timeout: Duration) -> Self {
        Self {
            store,
            balances: BTreeMap::new(),
            orders: BTreeMap::new(),
            lock_timeout,
            finished: false,
        }
    }

    #[must_use]
    pub fn lock_timeout(&self) -> Duration {
        self.lock_timeout
    }

    // ---------------------------------------------------------------
    // Balances
    // ---------------------------------------------------------------

    /// Exclusive read of a balance row (`SELECT ... FOR UPDATE`).
    ///
    /// The key is latched even when the row does not exist yet, so a
    /// concurrent creator of the same key has to wait for us.
    ///
    /// # Errors
    /// `LockTimeout` if the latch is not acquired within the lock timeout.
    pub fn balance_for_update(&mut self, key: &BalanceKey) -> Result<Option<Balance>> {
        let lock = match self.balances.entry(key.clone()) {
            Entry::Occupied(held) => held.into_mut(),
            Entry::Vacant(slot) => {
                let table = self.store.balance_store().table();
                let Some(lock) = RowLock::acquire(table.row_or_vacant(key), self.lock_timeout) else {
                    table.prune_vacant(key);
                    return Err(timeout_error(format!("balance {key}"), self.lock_timeout));
                };
                slot.insert(lock)
            }
        };
        Ok(lock.staged().cloned())
    }

    /// Stage a new value for a balance row this transaction has latched.
    /// Returns the staged row.
    ///
    /// # Errors
    /// `Internal` if the row was not read for update first.
    pub fn put_balance(&mut self, mut balance: Balance) -> Result<Balance> {
        let key = balance.key();
        let lock = self.balances.get_mut(&key).ok_or_else(|| {
            OpenbrokerError::Internal(format!("balance {key} written without holding its lock"))
        })?;
        balance.touch();
        lock.stage(balance.clone());
        Ok(balance)
    }

    #[must_use]
    pub fn holds_balance_lock(&self, key: &BalanceKey) -> bool {
        self.balances.contains_key(key)
    }

    // ---------------------------------------------------------------
    // Orders
    // ---------------------------------------------------------------

    /// Exclusive read of an order row. `None` if no such order exists.
    ///
    /// # Errors
    /// `LockTimeout` if the latch is not acquired within the lock timeout.
    pub fn order_for_update(&mut self, id: OrderId) -> Result<Option<Order>> {
        if let Some(held) = self.orders.get(&id) {
            return Ok(held.staged().cloned());
        }
        let Some(row) = self.store.order_store().table().existing_row(&id) else {
            return Ok(None);
        };
        let lock = RowLock::acquire(row, self.lock_timeout)
            .ok_or_else(|| timeout_error(format!("{id}"), self.lock_timeout))?;
        let current = lock.staged().cloned();
        self.orders.insert(id, lock);
        Ok(current)
    }

    /// Insert a new `Pending` order. The id is allocated immediately; the row
    /// becomes visible on commit.
    ///
    /// # Errors
    /// `LockTimeout` if the fresh row is somehow contended.
    pub fn insert_order(&mut self, request: NewOrder) -> Result<Order> {
        let orders = self.store.order_store();
        let id = orders.allocate_id();
        let mut lock = RowLock::acquire(orders.table().row_or_vacant(&id), self.lock_timeout)
            .ok_or_else(|| timeout_error(format!("{id}"), self.lock_timeout))?;
        let order = Order::pending(id, request);
        lock.stage(order.clone());
        self.orders.insert(id, lock);
        Ok(order)
    }

    /// Stage a new value for an order row this transaction has latched.
    ///
    /// # Errors
    /// `Internal` if the row was not read for update first.
    pub fn put_order(&mut self, mut order: Order) -> Result<Order> {
        let id = order.id;
        let lock = self.orders.get_mut(&id).ok_or_else(|| {
            OpenbrokerError::Internal(format!("{id} written without holding its lock"))
        })?;
        order.touch();
        lock.stage(order.clone());
        Ok(order)
    }

    // ---------------------------------------------------------------
    // Completion
    // ---------------------------------------------------------------

    /// Whether any write has been staged.
    #[must_use]
    pub fn has_writes(&self) -> bool {
        self.balances.values().any(RowLock::is_dirty) || self.orders.values().any(RowLock::is_dirty)
    }

    /// Publish every staged write, then release all latches.
    ///
    /// All writes of one transaction become visible together: readers that
    /// go through [`Store`] never observe half of a commit.
    pub fn commit(mut self) {
        let (balances, orders) = {
            let _gate = self.store.publish_gate().write();
            let balances = self.balances.values_mut().map(RowLock::publish).filter(|w| *w).count();
            let orders = self.orders.values_mut().map(RowLock::publish).filter(|w| *w).count();
            (balances, orders)
        };
        self.finished = true;
        tracing::debug!(balances, orders, "Transaction committed");
    }

    /// Discard every staged write and release all latches.
    pub fn rollback(mut self) {
        self.finished = true;
        if self.has_writes() {
            tracing::debug!("Transaction rolled back");
        }
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if !self.finished && self.has_writes() {
            tracing::debug!("Transaction dropped without commit, staged writes discarded");
        }
        // Latches are released here, before the rows are checked for pruning.
        let balance_keys: Vec<BalanceKey> = std::mem::take(&mut self.balances).into_keys().collect();
        let order_ids: Vec<OrderId> = std::mem::take(&mut self.orders).into_keys().collect();

        let balances = self.store.balance_store().table();
        let pruned = balance_keys.iter().filter(|key| balances.prune_vacant(key)).count();
        let orders = self.store.order_store().table();
        let pruned = pruned + order_ids.iter().filter(|id| orders.prune_vacant(id)).count();
        if pruned > 0 {
            tracing::trace!(pruned, "Vacant rows removed");
        }
    }
}

fn timeout_error(resource: String, waited: Duration) -> OpenbrokerError {
    let waited_ms = u64::try_from(waited.as_millis()).unwrap_or(u64::MAX);
    tracing::warn!(resource = %resource, waited_ms, "Row lock timeout");
    OpenbrokerError::LockTimeout {
        resource,
        waited_ms,
    }
}
