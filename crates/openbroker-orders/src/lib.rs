//! # openbroker-orders
//!
//! Order lifecycle for the **OpenBroker** ledger: create, match and cancel
//! customer orders, each in a single transaction with its balance effects.
//!
//! ## State Machine
//!
//! ```text
//!   create ──▶ PENDING ──match──▶ MATCHED
//!                 │
//!                 └────cancel──▶ CANCELLED
//! ```
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//!
//! use openbroker_ledger::AssetLedger;
//! use openbroker_orders::{InMemoryCustomerDirectory, OrderLifecycle};
//! use openbroker_store::Store;
//! use openbroker_types::{BrokerConfig, NewOrder, OrderSide, OrderStatus};
//! use rust_decimal::Decimal;
//!
//! let config = BrokerConfig::default();
//! let ledger = Arc::new(AssetLedger::new(Arc::new(Store::new(&config)), &config));
//! let customers = Arc::new(InMemoryCustomerDirectory::new());
//! let alice = customers.register();
//! let orders = OrderLifecycle::new(Arc::clone(&ledger), customers, config);
//!
//! ledger.deposit(alice, "TRY", Decimal::ONE_THOUSAND)?;
//! let placed = orders.create_order(NewOrder::new(
//!     alice,
//!     "AAPL",
//!     OrderSide::Buy,
//!     Decimal::TEN,
//!     Decimal::TEN,
//! ))?;
//! let matched = orders.match_order(placed.order.id)?;
//! assert_eq!(matched.order.status, OrderStatus::Matched);
//! assert_eq!(ledger.balance(alice, "AAPL").total_size, Decimal::TEN);
//! # Ok::<(), openbroker_types::OpenbrokerError>(())
//! ```

pub mod customer;
pub mod lifecycle;

pub use customer::{CustomerDirectory, InMemoryCustomerDirectory};
pub use lifecycle::{OrderLifecycle, OrderReceipt};
