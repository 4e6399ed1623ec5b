//! # openbroker-ledger
//!
//! The asset ledger of **OpenBroker**: reserves, releases, credits and
//! settles customer balances. Every mutation runs under the exclusive row
//! lock of its `(customer, asset)` key inside a store
//! [`Transaction`](openbroker_store::Transaction).
//!
//! ## Reservation Model
//!
//! ```text
//!   create order ──lock──▶ usable ↓          (reservation)
//!   cancel order ──unlock─▶ usable ↑          (release)
//!   match order ──settle─▶ debit reserved leg, credit received leg
//! ```
//!
//! Settlement always latches the cash row before the traded-asset row, so
//! concurrent BUY and SELL settlements for one customer cannot deadlock.

pub mod asset_ledger;
pub mod audit;

pub use asset_ledger::{AssetLedger, Funding};
pub use audit::{audit, AssetSupply, AuditReport};
