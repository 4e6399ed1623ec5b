//! Order store: orders keyed by a sequential surrogate id.

use std::sync::atomic::{AtomicU64, Ordering};

use openbroker_types::{constants, Order, OrderFilter, OrderId};

use crate::row::Table;

pub struct OrderStore {
    table: Table<OrderId, Order>,
    /// Next id to hand out. Ids of rolled-back inserts are not reused.
    next_id: AtomicU64,
}

impl OrderStore {
    pub(crate) fn new() -> Self {
        Self::starting_at(OrderId(constants::FIRST_ORDER_ID))
    }

    pub(crate) fn starting_at(next_id: OrderId) -> Self {
        Self {
            table: Table::new(),
            next_id: AtomicU64::new(next_id.0),
        }
    }

    pub(crate) fn table(&self) -> &Table<OrderId, Order> {
        &self.table
    }

    pub(crate) fn allocate_id(&self) -> OrderId {
        OrderId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// The id the next insert will receive.
    #[must_use]
    pub fn peek_next_id(&self) -> OrderId {
        OrderId(self.next_id.load(Ordering::Relaxed))
    }

    #[must_use]
    pub fn get(&self, id: OrderId) -> Option<Order> {
        self.table.read(&id)
    }

    /// Committed orders matching `filter`, ordered by id.
    #[must_use]
    pub fn find(&self, filter: &OrderFilter) -> Vec<Order> {
        let mut found: Vec<Order> = self
            .table
            .committed()
            .into_iter()
            .filter(|o| filter.matches(o))
            .collect();
        found.sort_by_key(|o| o.id);
        found
    }

    #[must_use]
    pub fn all(&self) -> Vec<Order> {
        let mut all = self.table.committed();
        all.sort_by_key(|o| o.id);
        all
    }

    pub(crate) fn restore(&self, order: Order) {
        self.table.restore(order.id, order);
    }
}
