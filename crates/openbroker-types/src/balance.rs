//! Balance types for the OpenBroker ledger.
//!
//! Every (customer, asset) pair has a `total_size` (quantity owned) and a
//! `usable_size` (quantity not reserved by a pending order). The ledger
//! keeps `0 <= usable_size <= total_size` for every committed row.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{BalanceKey, CustomerId};

/// A single balance row for a (customer, asset) pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Balance {
    pub customer_id: CustomerId,
    pub asset_name: String,
    /// Total quantity owned.
    pub total_size: Decimal,
    /// Quantity not currently reserved by a pending order.
    pub usable_size: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Balance {
    /// A freshly acquired balance: everything received is usable.
    #[must_use]
    pub fn acquired(key: &BalanceKey, amount: Decimal) -> Self {
        let now = Utc::now();
        Self {
            customer_id: key.customer_id,
            asset_name: key.asset_name.clone(),
            total_size: amount,
            usable_size: amount,
            created_at: now,
            updated_at: now,
        }
    }

    /// An unpersisted zero balance, used to report a key that has no row.
    #[must_use]
    pub fn empty(key: &BalanceKey) -> Self {
        Self::acquired(key, Decimal::ZERO)
    }

    #[must_use]
    pub fn key(&self) -> BalanceKey {
        BalanceKey::new(self.customer_id, self.asset_name.clone())
    }

    /// Quantity currently held by pending orders (`total - usable`).
    #[must_use]
    pub fn reserved_size(&self) -> Decimal {
        self.total_size - self.usable_size
    }

    /// Whether `0 <= usable <= total` holds.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.usable_size >= Decimal::ZERO && self.usable_size <= self.total_size
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Read-only projection criteria for listing balances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceFilter {
    pub customer_id: CustomerId,
    pub asset_name: Option<String>,
}

impl BalanceFilter {
    #[must_use]
    pub fn customer(customer_id: CustomerId) -> Self {
        Self {
            customer_id,
            asset_name: None,
        }
    }

    #[must_use]
    pub fn with_asset(mut self, asset_name: impl Into<String>) -> Self {
        self.asset_name = Some(asset_name.into());
        self
    }

    #[must_use]
    pub fn matches(&self, balance: &Balance) -> bool {
        balance.customer_id == self.customer_id
            && self
                .asset_name
                .as_deref()
                .is_none_or(|asset| balance.asset_name == asset)
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Balance {
    pub fn dummy(customer_id: CustomerId, asset_name: &str, total: Decimal, usable: Decimal) -> Self {
        let mut balance = Self::acquired(&BalanceKey::new(customer_id, asset_name), total);
        balance.usable_size = usable;
        balance
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn acquired_balance_is_fully_usable() {
        let key = BalanceKey::new(CustomerId::new(), "AAPL");
        let bal = Balance::acquired(&key, dec!(10));
        assert_eq!(bal.total_size, dec!(10));
        assert_eq!(bal.usable_size, dec!(10));
        assert_eq!(bal.reserved_size(), Decimal::ZERO);
        assert_eq!(bal.key(), key);
    }

    #[test]
    fn consistency_check() {
        let c = CustomerId::new();
        assert!(Balance::dummy(c, "TRY", dec!(10000), dec!(8500)).is_consistent());
        assert!(!Balance::dummy(c, "TRY", dec!(100), dec!(101)).is_consistent());
        assert!(!Balance::dummy(c, "TRY", dec!(100), dec!(-1)).is_consistent());
    }

    #[test]
    fn filter_by_customer_and_asset() {
        let c = CustomerId::new();
        let other = CustomerId::new();
        let bal = Balance::dummy(c, "AAPL", dec!(5), dec!(5));

        assert!(BalanceFilter::customer(c).matches(&bal));
        assert!(BalanceFilter::customer(c).with_asset("AAPL").matches(&bal));
        assert!(!BalanceFilter::customer(c).with_asset("TRY").matches(&bal));
        assert!(!BalanceFilter::customer(other).matches(&bal));
    }

    #[test]
    fn balance_serde_roundtrip() {
        let bal = Balance::dummy(CustomerId::new(), "TRY", dec!(123.45), dec!(67.8));
        let json = serde_json::to_string(&bal).unwrap();
        let back: Balance = serde_json::from_str(&json).unwrap();
        assert_eq!(bal, back);
    }
}
