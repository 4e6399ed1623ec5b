//! Balance invariant audit.
//!
//! ```text
//! ∀ row: 0 <= usable_size <= total_size
//! ```
//!
//! Runs over the committed state only. A violation means a ledger path
//! wrote an inconsistent row and is reported as a critical error.

use std::collections::BTreeMap;

use openbroker_store::Store;
use openbroker_types::{Balance, OpenbrokerError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Outcome of a clean audit: how many rows were checked and the summed
/// holdings per asset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditReport {
    pub balances_checked: usize,
    pub supply: BTreeMap<String, AssetSupply>,
}

/// Summed holdings of one asset across all customers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetSupply {
    pub total: Decimal,
    pub usable: Decimal,
}

impl AssetSupply {
    #[must_use]
    pub fn reserved(&self) -> Decimal {
        self.total - self.usable
    }
}

impl AuditReport {
    /// Summed `total_size` of an asset, zero if nobody holds it.
    #[must_use]
    pub fn total_supply(&self, asset_name: &str) -> Decimal {
        self.supply
            .get(asset_name)
            .map_or(Decimal::ZERO, |s| s.total)
    }

    /// Compare an asset's summed total against what deposits and
    /// withdrawals say it should be.
    ///
    /// # Errors
    /// `BalanceInvariantViolation` if they differ.
    pub fn verify_supply(&self, asset_name: &str, expected: Decimal) -> Result<()> {
        let actual = self.total_supply(asset_name);
        if actual != expected {
            return Err(OpenbrokerError::BalanceInvariantViolation {
                reason: format!("Asset {asset_name}: supply {actual} != expected {expected}"),
            });
        }
        Ok(())
    }
}

/// Check every committed balance row.
///
/// # Errors
/// `BalanceInvariantViolation` naming the first inconsistent row.
pub fn audit(store: &Store) -> Result<AuditReport> {
    audit_balances(&store.all_balances())
}

pub(crate) fn audit_balances(balances: &[Balance]) -> Result<AuditReport> {
    let mut report = AuditReport::default();
    for balance in balances {
        if !balance.is_consistent() {
            tracing::error!(
                key = %balance.key(),
                total = %balance.total_size,
                usable = %balance.usable_size,
                "Balance invariant violated"
            );
            return Err(OpenbrokerError::BalanceInvariantViolation {
                reason: format!(
                    "{}: usable {} outside 0..={}",
                    balance.key(),
                    balance.usable_size,
                    balance.total_size
                ),
            });
        }
        let supply = report.supply.entry(balance.asset_name.clone()).or_default();
        supply.total += balance.total_size;
        supply.usable += balance.usable_size;
        report.balances_checked += 1;
    }
    Ok(report)
}
