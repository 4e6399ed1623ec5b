//! # openbroker-types
//!
//! Shared types, errors, and configuration for the **OpenBroker** asset
//! ledger and order lifecycle engine.
//!
//! This crate is the leaf dependency of the workspace: every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`CustomerId`], [`OrderId`], [`BalanceKey`]
//! - **Balance model**: [`Balance`], [`BalanceFilter`]
//! - **Order model**: [`Order`], [`NewOrder`], [`OrderSide`], [`OrderStatus`], [`OrderFilter`]
//! - **Pagination**: [`PageRequest`], [`Page`]
//! - **Configuration**: [`BrokerConfig`]
//! - **Errors**: [`OpenbrokerError`] with `OB_ERR_` prefix codes
//! - **Constants**: system-wide limits and defaults

pub mod balance;
pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod order;
pub mod page;

// Re-export all primary types at crate root for ergonomic imports:
//   use openbroker_types::{Balance, Order, OrderSide, ...};

pub use balance::*;
pub use config::*;
pub use error::*;
pub use ids::*;
pub use order::*;
pub use page::*;

// Constants are accessed via `openbroker_types::constants::FOO`
// (not re-exported to avoid name collisions).
