//! The store: balance and order tables behind one commit gate.

use std::time::Duration;

use openbroker_types::{
    Balance, BalanceFilter, BalanceKey, BrokerConfig, OpenbrokerError, Order, OrderFilter,
    OrderId, Result,
};
use parking_lot::RwLock;

use crate::{BalanceStore, OrderStore, StoreSnapshot, Transaction};

pub struct Store {
    balances: BalanceStore,
    orders: OrderStore,
    lock_timeout: Duration,
    /// Held for write while a commit publishes, for read by projections.
    publish_gate: RwLock<()>,
}

impl Store {
    #[must_use]
    pub fn new(config: &BrokerConfig) -> Self {
        Self::with_lock_timeout(config.lock_timeout())
    }

    #[must_use]
    pub fn with_lock_timeout(lock_timeout: Duration) -> Self {
        Self {
            balances: BalanceStore::new(),
            orders: OrderStore::new(),
            lock_timeout,
            publish_gate: RwLock::new(()),
        }
    }

    #[must_use]
    pub fn lock_timeout(&self) -> Duration {
        self.lock_timeout
    }

    /// Open a transaction using the store's lock timeout.
    #[must_use]
    pub fn begin(&self) -> Transaction<'_> {
        Transaction::begin(self, self.lock_timeout)
    }

    #[must_use]
    pub fn begin_with_timeout(&self, lock_timeout: Duration) -> Transaction<'_> {
        Transaction::begin(self, lock_timeout)
    }

    pub(crate) fn balance_store(&self) -> &BalanceStore {
        &self.balances
    }

    pub(crate) fn order_store(&self) -> &OrderStore {
        &self.orders
    }

    pub(crate) fn publish_gate(&self) -> &RwLock<()> {
        &self.publish_gate
    }

    // ---------------------------------------------------------------
    // Committed reads
    // ---------------------------------------------------------------

    #[must_use]
    pub fn balance(&self, key: &BalanceKey) -> Option<Balance> {
        let _gate = self.publish_gate.read();
        self.balances.get(key)
    }

    #[must_use]
    pub fn balances(&self, filter: &BalanceFilter) -> Vec<Balance> {
        let _gate = self.publish_gate.read();
        self.balances.find(filter)
    }

    #[must_use]
    pub fn all_balances(&self) -> Vec<Balance> {
        let _gate = self.publish_gate.read();
        self.balances.all()
    }

    #[must_use]
    pub fn order(&self, id: OrderId) -> Option<Order> {
        let _gate = self.publish_gate.read();
        self.orders.get(id)
    }

    #[must_use]
    pub fn orders(&self, filter: &OrderFilter) -> Vec<Order> {
        let _gate = self.publish_gate.read();
        self.orders.find(filter)
    }

    #[must_use]
    pub fn all_orders(&self) -> Vec<Order> {
        let _gate = self.publish_gate.read();
        self.orders.all()
    }

    // ---------------------------------------------------------------
    // Snapshot / restore
    // ---------------------------------------------------------------

    /// Consistent copy of everything committed so far.
    #[must_use]
    pub fn snapshot(&self) -> StoreSnapshot {
        let _gate = self.publish_gate.read();
        StoreSnapshot {
            balances: self.balances.all(),
            orders: self.orders.all(),
            next_order_id: self.orders.peek_next_id(),
        }
    }

    /// Rebuild a store from a snapshot.
    ///
    /// # Errors
    /// `BalanceInvariantViolation` if a balance breaks `0 <= usable <= total`,
    /// `Internal` if the id sequence would hand out an existing id.
    pub fn restore(config: &BrokerConfig, snapshot: StoreSnapshot) -> Result<Self> {
        if let Some(bad) = snapshot.balances.iter().find(|b| !b.is_consistent()) {
            return Err(OpenbrokerError::BalanceInvariantViolation {
                reason: format!(
                    "{}: usable {} outside 0..={}",
                    bad.key(),
                    bad.usable_size,
                    bad.total_size
                ),
            });
        }
        if let Some(max) = snapshot.max_order_id() {
            if snapshot.next_order_id <= max {
                return Err(OpenbrokerError::Internal(format!(
                    "next order id {} does not follow highest id {max}",
                    snapshot.next_order_id
                )));
            }
        }

        let store = Self {
            balances: BalanceStore::new(),
            orders: OrderStore::starting_at(snapshot.next_order_id),
            lock_timeout: config.lock_timeout(),
            publish_gate: RwLock::new(()),
        };
        let (balances, orders) = (snapshot.balances.len(), snapshot.orders.len());
        for balance in snapshot.balances {
            store.balances.restore(balance);
        }
        for order in snapshot.orders {
            store.orders.restore(order);
        }
        tracing::info!(balances, orders, next_order_id = %store.orders.peek_next_id(), "Store restored");
        Ok(store)
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(&BrokerConfig::default())
    }
}
