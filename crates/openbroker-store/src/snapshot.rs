//! Point-in-time export of the committed store state.

use openbroker_types::{Balance, Order, OrderId, Result};
use serde::{Deserialize, Serialize};

/// Every committed balance and order, plus the id sequence position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub balances: Vec<Balance>,
    pub orders: Vec<Order>,
    pub next_order_id: OrderId,
}

impl StoreSnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Highest order id in the snapshot, if any orders exist.
    #[must_use]
    pub fn max_order_id(&self) -> Option<OrderId> {
        self.orders.iter().map(|o| o.id).max()
    }
}
