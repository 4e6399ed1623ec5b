//! Identifiers used throughout OpenBroker.
//!
//! Customers are identified by UUIDv7 (assigned by the customer directory).
//! Orders carry a sequential surrogate id handed out by the order store.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// CustomerId
// ---------------------------------------------------------------------------

/// Opaque, stable identifier for a customer account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CustomerId(pub Uuid);

impl CustomerId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for CustomerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// OrderId
// ---------------------------------------------------------------------------

/// Sequential order identifier. Immutable once assigned by the order store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct OrderId(pub u64);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "order:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// BalanceKey
// ---------------------------------------------------------------------------

/// Unique key of a balance row: one row per (customer, asset name).
///
/// This is also the granularity of the ledger's exclusive row lock.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct BalanceKey {
    pub customer_id: CustomerId,
    pub asset_name: String,
}

impl BalanceKey {
    #[must_use]
    pub fn new(customer_id: CustomerId, asset_name: impl Into<String>) -> Self {
        Self {
            customer_id,
            asset_name: asset_name.into(),
        }
    }
}

impl fmt::Display for BalanceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.customer_id, self.asset_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn customer_id_uniqueness() {
        let a = CustomerId::new();
        let b = CustomerId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn order_id_display() {
        assert_eq!(format!("{}", OrderId(42)), "order:42");
        assert!(OrderId(41) < OrderId(42));
    }

    #[test]
    fn balance_key_orders_by_customer_then_asset() {
        let c = CustomerId(Uuid::from_bytes([7u8; 16]));
        let aapl = BalanceKey::new(c, "AAPL");
        let cash = BalanceKey::new(c, "TRY");
        assert!(aapl < cash);
        assert!(format!("{cash}").ends_with("/TRY"));
    }

    #[test]
    fn serde_roundtrips() {
        let key = BalanceKey::new(CustomerId::new(), "AAPL");
        let json = serde_json::to_string(&key).unwrap();
        let back: BalanceKey = serde_json::from_str(&json).unwrap();
        assert_eq!(key, back);
    }
}
