//! Order types for the OpenBroker lifecycle service.
//!
//! ## State Machine
//!
//! ```text
//!   ┌─────────┐  match   ┌─────────┐
//!   │ PENDING ├─────────▶│ MATCHED │
//!   └────┬────┘          └─────────┘
//!        │ cancel
//!        ▼
//!   ┌───────────┐
//!   │ CANCELLED │
//!   └───────────┘
//! ```
//!
//! Both terminal states are final.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{CustomerId, OpenbrokerError, OrderId, Result};

/// Which way the customer trades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Matched,
    Cancelled,
}

impl OrderStatus {
    /// Only `Pending → Matched` and `Pending → Cancelled` are valid.
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        matches!((self, target), (Self::Pending, Self::Matched | Self::Cancelled))
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Matched => write!(f, "MATCHED"),
            Self::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// A request to place an order. The store assigns the id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    pub customer_id: CustomerId,
    pub asset_name: String,
    pub side: OrderSide,
    pub size: Decimal,
    pub price: Decimal,
}

impl NewOrder {
    #[must_use]
    pub fn new(
        customer_id: CustomerId,
        asset_name: impl Into<String>,
        side: OrderSide,
        size: Decimal,
        price: Decimal,
    ) -> Self {
        Self {
            customer_id,
            asset_name: asset_name.into(),
            side,
            size,
            price,
        }
    }

    /// `price * size`, the cash value of the order.
    ///
    /// # Errors
    /// `AmountOverflow` if the product leaves the decimal range.
    pub fn notional(&self) -> Result<Decimal> {
        notional(&self.asset_name, self.price, self.size)
    }
}

/// A persisted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub asset_name: String,
    pub side: OrderSide,
    pub size: Decimal,
    pub price: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Materialize a request as a `Pending` order with the given id.
    #[must_use]
    pub fn pending(id: OrderId, request: NewOrder) -> Self {
        let now = Utc::now();
        Self {
            id,
            customer_id: request.customer_id,
            asset_name: request.asset_name,
            side: request.side,
            size: request.size,
            price: request.price,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// # Errors
    /// `AmountOverflow` if `price * size` leaves the decimal range.
    pub fn notional(&self) -> Result<Decimal> {
        notional(&self.asset_name, self.price, self.size)
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == OrderStatus::Pending
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Checked `price * size`.
///
/// # Errors
/// `AmountOverflow` if the product leaves the decimal range.
pub fn notional(asset_name: &str, price: Decimal, size: Decimal) -> Result<Decimal> {
    price
        .checked_mul(size)
        .ok_or_else(|| OpenbrokerError::AmountOverflow {
            asset: asset_name.to_string(),
            operation: "notional",
        })
}

/// An inclusive window of calendar days, measured in UTC. Always at least
/// one day long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WindowBounds")]
pub struct DateWindow {
    start_date: NaiveDate,
    days: u32,
}

#[derive(Deserialize)]
struct WindowBounds {
    start_date: NaiveDate,
    days: u32,
}

impl DateWindow {
    /// # Errors
    /// `InvalidFilter` if `days` is zero.
    pub fn new(start_date: NaiveDate, days: u32) -> Result<Self> {
        if days == 0 {
            return Err(OpenbrokerError::InvalidFilter {
                reason: "date range must be at least one day".to_string(),
            });
        }
        Ok(Self { start_date, days })
    }

    #[must_use]
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    #[must_use]
    pub fn days(&self) -> u32 {
        self.days
    }

    /// A window reaching past the last representable instant is open-ended.
    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        let start = self.start_date.and_time(NaiveTime::MIN).and_utc();
        if at < start {
            return false;
        }
        start
            .checked_add_days(Days::new(u64::from(self.days)))
            .is_none_or(|end| at <= end)
    }
}

impl TryFrom<WindowBounds> for DateWindow {
    type Error = OpenbrokerError;

    fn try_from(bounds: WindowBounds) -> Result<Self> {
        Self::new(bounds.start_date, bounds.days)
    }
}

/// Read-only projection criteria for listing orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderFilter {
    pub customer_id: CustomerId,
    pub asset_name: Option<String>,
    pub side: Option<OrderSide>,
    pub status: Option<OrderStatus>,
    pub created: Option<DateWindow>,
}

impl OrderFilter {
    #[must_use]
    pub fn customer(customer_id: CustomerId) -> Self {
        Self {
            customer_id,
            asset_name: None,
            side: None,
            status: None,
            created: None,
        }
    }

    #[must_use]
    pub fn with_asset(mut self, asset_name: impl Into<String>) -> Self {
        self.asset_name = Some(asset_name.into());
        self
    }

    #[must_use]
    pub fn with_side(mut self, side: OrderSide) -> Self {
        self.side = Some(side);
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn created_within(mut self, window: DateWindow) -> Self {
        self.created = Some(window);
        self
    }

    #[must_use]
    pub fn matches(&self, order: &Order) -> bool {
        order.customer_id == self.customer_id
            && self
                .asset_name
                .as_deref()
                .is_none_or(|asset| order.asset_name == asset)
            && self.side.is_none_or(|side| order.side == side)
            && self.status.is_none_or(|status| order.status == status)
            && self.created.is_none_or(|window| window.contains(order.created_at))
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Order {
    pub fn dummy(id: u64, customer_id: CustomerId, side: OrderSide, size: Decimal, price: Decimal) -> Self {
        Self::pending(
            OrderId(id),
            NewOrder::new(customer_id, "AAPL", side, size, price),
        )
    }
}
