//! Balance store: one row per (customer, asset).
//!
//! Writes only happen through a [`Transaction`](crate::Transaction); this
//! type exposes the committed, read-only side.

use openbroker_types::{Balance, BalanceFilter, BalanceKey};

use crate::row::Table;

pub struct BalanceStore {
    table: Table<BalanceKey, Balance>,
}

impl BalanceStore {
    pub(crate) fn new() -> Self {
        Self {
            table: Table::new(),
        }
    }

    pub(crate) fn table(&self) -> &Table<BalanceKey, Balance> {
        &self.table
    }

    /// Committed balance for a key, if the row exists.
    #[must_use]
    pub fn get(&self, key: &BalanceKey) -> Option<Balance> {
        self.table.read(key)
    }

    /// Committed balances matching `filter`, ordered by asset name.
    #[must_use]
    pub fn find(&self, filter: &BalanceFilter) -> Vec<Balance> {
        let mut found: Vec<Balance> = self
            .table
            .committed()
            .into_iter()
            .filter(|b| filter.matches(b))
            .collect();
        found.sort_by(|a, b| a.asset_name.cmp(&b.asset_name));
        found
    }

    /// Every committed balance, ordered by key.
    #[must_use]
    pub fn all(&self) -> Vec<Balance> {
        let mut all = self.table.committed();
        all.sort_by(|a, b| {
            (a.customer_id, &a.asset_name).cmp(&(b.customer_id, &b.asset_name))
        });
        all
    }

    pub(crate) fn restore(&self, balance: Balance) {
        self.table.restore(balance.key(), balance);
    }
}
