//! Error types for the OpenBroker ledger.
//!
//! All errors use the `OB_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Order / customer errors
//! - 2xx: Balance errors
//! - 3xx: Concurrency errors
//! - 9xx: General / internal errors

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{CustomerId, OrderId, OrderStatus};

/// Central error enum for all OpenBroker operations.
///
/// Every variant is a distinct failure kind; adapters map [`code`](Self::code)
/// to their own status codes.
#[derive(Debug, Error)]
pub enum OpenbrokerError {
    // =================================================================
    // Order Errors (1xx)
    // =================================================================
    /// The requested order does not exist.
    #[error("OB_ERR_100: Order not found: {0}")]
    OrderNotFound(OrderId),

    /// A transition was attempted from a terminal state.
    #[error("OB_ERR_101: Order {id} is {status}, not PENDING")]
    OrderNotPending { id: OrderId, status: OrderStatus },

    /// An order on the cash asset was priced off par.
    #[error("OB_ERR_102: Cash asset {asset} must be priced at 1, got {price}")]
    InvalidCashOrderPrice { asset: String, price: Decimal },

    /// The order request failed validation.
    #[error("OB_ERR_103: Invalid order: {reason}")]
    InvalidOrder { reason: String },

    /// A search filter failed validation.
    #[error("OB_ERR_104: Invalid filter: {reason}")]
    InvalidFilter { reason: String },

    /// The referenced customer does not exist.
    #[error("OB_ERR_150: Customer not found: {0}")]
    CustomerNotFound(CustomerId),

    // =================================================================
    // Balance Errors (2xx)
    // =================================================================
    /// Not enough quantity to lock, debit or settle.
    #[error("OB_ERR_200: Insufficient {asset} balance: need {needed}, have {available}")]
    InsufficientBalance {
        asset: String,
        needed: Decimal,
        available: Decimal,
    },

    /// Unlock requested on a balance row that does not exist.
    #[error("OB_ERR_201: No {asset} balance to release")]
    NoBalanceToRelease { asset: String },

    /// A ledger amount was negative.
    #[error("OB_ERR_202: Invalid amount: {amount}")]
    InvalidAmount { amount: Decimal },

    /// `0 <= usable <= total` does not hold. Critical.
    #[error("OB_ERR_203: Balance invariant violation: {reason}")]
    BalanceInvariantViolation { reason: String },

    /// An amount or balance left the representable decimal range.
    #[error("OB_ERR_204: {asset} amount out of range in {operation}")]
    AmountOverflow {
        asset: String,
        operation: &'static str,
    },

    // =================================================================
    // Concurrency Errors (3xx)
    // =================================================================
    /// A row lock could not be acquired in time. Safe to retry.
    #[error("OB_ERR_300: Lock timeout on {resource} after {waited_ms}ms")]
    LockTimeout { resource: String, waited_ms: u64 },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("OB_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("OB_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid config document, bad bounds, etc.).
    #[error("OB_ERR_902: Configuration error: {0}")]
    Configuration(String),
}

impl OpenbrokerError {
    /// Stable error code, e.g. `"OB_ERR_200"`.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::OrderNotFound(_) => "OB_ERR_100",
            Self::OrderNotPending { .. } => "OB_ERR_101",
            Self::InvalidCashOrderPrice { .. } => "OB_ERR_102",
            Self::InvalidOrder { .. } => "OB_ERR_103",
            Self::InvalidFilter { .. } => "OB_ERR_104",
            Self::CustomerNotFound(_) => "OB_ERR_150",
            Self::InsufficientBalance { .. } => "OB_ERR_200",
            Self::NoBalanceToRelease { .. } => "OB_ERR_201",
            Self::InvalidAmount { .. } => "OB_ERR_202",
            Self::BalanceInvariantViolation { .. } => "OB_ERR_203",
            Self::AmountOverflow { .. } => "OB_ERR_204",
            Self::LockTimeout { .. } => "OB_ERR_300",
            Self::Internal(_) => "OB_ERR_900",
            Self::Serialization(_) => "OB_ERR_901",
            Self::Configuration(_) => "OB_ERR_902",
        }
    }

    /// Only lock timeouts may be retried by the caller.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::LockTimeout { .. })
    }

    /// Whether the error refers to an entity that does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::OrderNotFound(_) | Self::CustomerNotFound(_))
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, OpenbrokerError>;

impl From<serde_json::Error> for OpenbrokerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_contains_prefix() {
        let err = OpenbrokerError::OrderNotFound(OrderId(9));
        let msg = format!("{err}");
        assert!(msg.starts_with("OB_ERR_100"), "Got: {msg}");
    }

    #[test]
    fn insufficient_balance_display() {
        let err = OpenbrokerError::InsufficientBalance {
            asset: "TRY".to_string(),
            needed: Decimal::new(100, 0),
            available: Decimal::new(50, 0),
        };
        let msg = format!("{err}");
        assert!(msg.contains("OB_ERR_200"));
        assert!(msg.contains("TRY"));
        assert!(msg.contains("100"));
        assert!(msg.contains("50"));
    }

    #[test]
    fn display_prefix_matches_code() {
        let errors = vec![
            OpenbrokerError::OrderNotPending {
                id: OrderId(1),
                status: OrderStatus::Matched,
            },
            OpenbrokerError::InvalidCashOrderPrice {
                asset: "TRY".into(),
                price: Decimal::TWO,
            },
            OpenbrokerError::CustomerNotFound(CustomerId::new()),
            OpenbrokerError::NoBalanceToRelease { asset: "AAPL".into() },
            OpenbrokerError::InvalidFilter {
                reason: "days".into(),
            },
            OpenbrokerError::AmountOverflow {
                asset: "AAPL".into(),
                operation: "credit",
            },
            OpenbrokerError::LockTimeout {
                resource: "balance".into(),
                waited_ms: 10,
            },
            OpenbrokerError::Internal("test".into()),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(msg.starts_with(err.code()), "{msg} vs {}", err.code());
        }
    }

    #[test]
    fn only_lock_timeout_is_retryable() {
        assert!(
            OpenbrokerError::LockTimeout {
                resource: "x".into(),
                waited_ms: 1
            }
            .is_retryable()
        );
        assert!(!OpenbrokerError::OrderNotFound(OrderId(1)).is_retryable());
        assert!(OpenbrokerError::OrderNotFound(OrderId(1)).is_not_found());
    }
}
