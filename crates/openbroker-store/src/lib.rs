//! # openbroker-store
//!
//! Persistent state of the **OpenBroker** ledger: one balance row per
//! (customer, asset) and one row per order.
//!
//! All mutation goes through a [`Transaction`], which takes an exclusive
//! row latch on every row it reads for update and holds it until commit
//! or rollback. Two transactions touching the same row are serialized;
//! transactions on disjoint rows run in parallel.
//!
//! ## Usage
//!
//! ```
//! use openbroker_store::Store;
//! use openbroker_types::{Balance, BalanceKey, BrokerConfig, CustomerId};
//! use rust_decimal::Decimal;
//!
//! let store = Store::new(&BrokerConfig::default());
//! let key = BalanceKey::new(CustomerId::new(), "TRY");
//!
//! let mut tx = store.begin();
//! tx.balance_for_update(&key)?;
//! tx.put_balance(Balance::acquired(&key, Decimal::ONE_HUNDRED))?;
//! tx.commit();
//!
//! assert_eq!(store.balance(&key).unwrap().usable_size, Decimal::ONE_HUNDRED);
//! # Ok::<(), openbroker_types::OpenbrokerError>(())
//! ```

pub mod balance_store;
pub mod order_store;
mod row;
pub mod snapshot;
pub mod store;
pub mod transaction;

pub use balance_store::BalanceStore;
pub use order_store::OrderStore;
pub use snapshot::StoreSnapshot;
pub use store::Store;
pub use transaction::Transaction;
