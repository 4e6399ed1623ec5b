//! System-wide constants for the OpenBroker ledger.

/// Asset code of the base settlement currency. Always priced at 1.
pub const DEFAULT_CASH_ASSET: &str = "TRY";

/// How long a transaction waits for a row lock before giving up.
pub const DEFAULT_LOCK_TIMEOUT_MS: u64 = 5_000;

/// Shortest accepted asset code.
pub const MIN_ASSET_NAME_LEN: usize = 2;

/// Longest accepted asset code.
pub const MAX_ASSET_NAME_LEN: usize = 4;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Upper bound on the page size of any listing.
pub const MAX_PAGE_SIZE: usize = 500;

/// First id handed out by a fresh order store.
pub const FIRST_ORDER_ID: u64 = 1;
