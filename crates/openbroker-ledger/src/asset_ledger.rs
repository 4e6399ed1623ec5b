//! Asset ledger: the only writer of balance rows.
//!
//! The transactional operations ([`lock`](AssetLedger::lock),
//! [`unlock`](AssetLedger::unlock), [`credit`](AssetLedger::credit),
//! [`debit`](AssetLedger::debit), [`withdraw`](AssetLedger::withdraw),
//! [`settle`](AssetLedger::settle)) run inside a caller's [`Transaction`] and
//! latch the balance row before reading it. A failure leaves nothing staged
//! by the failing call; dropping the transaction discards earlier legs too.
//!
//! | operation | total | usable |
//! |-----------|-------|--------|
//! | lock      |   =   |  −a    |
//! | unlock    |   =   |  +a    |
//! | credit    |  +a   |  +a    |
//! | debit     |  −a   |   =    |
//! | withdraw  |  −a   |  −a    |

use std::sync::Arc;

use openbroker_store::{Store, Transaction};
use openbroker_types::{
    notional, Balance, BalanceFilter, BalanceKey, BrokerConfig, CustomerId, OpenbrokerError,
    OrderSide, Page, PageRequest, Result,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::audit::{self, AuditReport};

/// How the paying leg of a settlement is funded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Funding {
    /// Reserved by a `lock` at order creation; the leg consumes the
    /// reservation with [`AssetLedger::debit`].
    Reserved,
    /// Nothing was reserved; the leg draws usable and total together with
    /// [`AssetLedger::withdraw`].
    Unreserved,
}

pub struct AssetLedger {
    store: Arc<Store>,
    cash_asset: String,
    max_page_size: usize,
}

impl AssetLedger {
    #[must_use]
    pub fn new(store: Arc<Store>, config: &BrokerConfig) -> Self {
        Self {
            store,
            cash_asset: config.cash_asset.clone(),
            max_page_size: config.max_page_size,
        }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    #[must_use]
    pub fn cash_asset(&self) -> &str {
        &self.cash_asset
    }

    #[must_use]
    pub fn is_cash(&self, asset_name: &str) -> bool {
        self.cash_asset == asset_name
    }

    // =================================================================
    // Transactional operations
    // =================================================================

    /// Reserve `amount`: `usable -= amount`.
    ///
    /// # Errors
    /// `InsufficientBalance` if the row is missing or `usable < amount`.
    pub fn lock(
        &self,
        tx: &mut Transaction<'_>,
        customer_id: CustomerId,
        asset_name: &str,
        amount: Decimal,
    ) -> Result<Balance> {
        ensure_non_negative(amount)?;
        let key = BalanceKey::new(customer_id, asset_name);
        let mut balance = tx
            .balance_for_update(&key)?
            .ok_or_else(|| insufficient(asset_name, amount, Decimal::ZERO))?;
        if balance.usable_size < amount {
            return Err(insufficient(asset_name, amount, balance.usable_size));
        }
        balance.usable_size = checked(asset_name, "lock", balance.usable_size.checked_sub(amount))?;
        let balance = tx.put_balance(balance)?;
        debug!(key = %key, amount = %amount, usable = %balance.usable_size, "Locked");
        Ok(balance)
    }

    /// Release a reservation: `usable += amount`.
    ///
    /// # Errors
    /// `NoBalanceToRelease` if the row is missing, `AmountOverflow` if usable
    /// leaves the decimal range.
    pub fn unlock(
        &self,
        tx: &mut Transaction<'_>,
        customer_id: CustomerId,
        asset_name: &str,
        amount: Decimal,
    ) -> Result<Balance> {
        ensure_non_negative(amount)?;
        let key = BalanceKey::new(customer_id, asset_name);
        let mut balance =
            tx.balance_for_update(&key)?
                .ok_or_else(|| OpenbrokerError::NoBalanceToRelease {
                    asset: asset_name.to_string(),
                })?;
        balance.usable_size = checked(asset_name, "unlock", balance.usable_size.checked_add(amount))?;
        let balance = tx.put_balance(balance)?;
        debug!(key = %key, amount = %amount, usable = %balance.usable_size, "Unlocked");
        Ok(balance)
    }

    /// Receive `amount`: `total += amount`, `usable += amount`, creating the
    /// row on first credit. A zero credit to a missing row creates nothing.
    ///
    /// # Errors
    /// `InvalidAmount` on a negative amount, `AmountOverflow` if the row
    /// leaves the decimal range.
    pub fn credit(
        &self,
        tx: &mut Transaction<'_>,
        customer_id: CustomerId,
        asset_name: &str,
        amount: Decimal,
    ) -> Result<Balance> {
        ensure_non_negative(amount)?;
        let key = BalanceKey::new(customer_id, asset_name);
        let balance = match tx.balance_for_update(&key)? {
            Some(mut existing) => {
                let total = checked(asset_name, "credit", existing.total_size.checked_add(amount))?;
                let usable = checked(asset_name, "credit", existing.usable_size.checked_add(amount))?;
                existing.total_size = total;
                existing.usable_size = usable;
                existing
            }
            None if amount.is_zero() => return Ok(Balance::empty(&key)),
            None => Balance::acquired(&key, amount),
        };
        let balance = tx.put_balance(balance)?;
        debug!(key = %key, amount = %amount, total = %balance.total_size, "Credited");
        Ok(balance)
    }

    /// Consume a reservation made by [`lock`](Self::lock): `total -= amount`.
    ///
    /// The guard is on the reserved quantity (`total - usable`), not on
    /// `usable`. A holding locked in full has `usable == 0` and still debits.
    ///
    /// # Errors
    /// `InsufficientBalance` if the row is missing or less than `amount` is
    /// reserved.
    pub fn debit(
        &self,
        tx: &mut Transaction<'_>,
        customer_id: CustomerId,
        asset_name: &str,
        amount: Decimal,
    ) -> Result<Balance> {
        ensure_non_negative(amount)?;
        let key = BalanceKey::new(customer_id, asset_name);
        let mut balance = tx
            .balance_for_update(&key)?
            .ok_or_else(|| insufficient(asset_name, amount, Decimal::ZERO))?;
        let reserved = balance.reserved_size();
        if reserved < amount {
            return Err(insufficient(asset_name, amount, reserved));
        }
        balance.total_size = checked(asset_name, "debit", balance.total_size.checked_sub(amount))?;
        let balance = tx.put_balance(balance)?;
        debug!(key = %key, amount = %amount, total = %balance.total_size, "Debited reservation");
        Ok(balance)
    }

    /// Pay out of unreserved quantity: `total -= amount`, `usable -= amount`.
    ///
    /// # Errors
    /// `InsufficientBalance` if the row is missing or `usable < amount`.
    pub fn withdraw(
        &self,
        tx: &mut Transaction<'_>,
        customer_id: CustomerId,
        asset_name: &str,
        amount: Decimal,
    ) -> Result<Balance> {
        ensure_non_negative(amount)?;
        let key = BalanceKey::new(customer_id, asset_name);
        let mut balance = tx
            .balance_for_update(&key)?
            .ok_or_else(|| insufficient(asset_name, amount, Decimal::ZERO))?;
        if balance.usable_size < amount {
            return Err(insufficient(asset_name, amount, balance.usable_size));
        }
        let total = checked(asset_name, "withdraw", balance.total_size.checked_sub(amount))?;
        let usable = checked(asset_name, "withdraw", balance.usable_size.checked_sub(amount))?;
        balance.total_size = total;
        balance.usable_size = usable;
        let balance = tx.put_balance(balance)?;
        debug!(key = %key, amount = %amount, total = %balance.total_size, "Withdrawn");
        Ok(balance)
    }

    /// Settle a trade of `size` units of `asset_name` at `price`.
    ///
    /// ```text
    ///   BUY  asset   pay  price*size cash   receive size asset
    ///   SELL asset   pay  size asset        receive price*size cash
    ///   BUY  cash    receive price*size cash
    ///   SELL cash    pay  price*size cash
    /// ```
    ///
    /// The cash row is always latched before the traded-asset row. Returns
    /// the traded asset's balance. `AmountOverflow` if `price * size` or a
    /// resulting balance leaves the decimal range.
    #[allow(clippy::too_many_arguments)]
    pub fn settle(
        &self,
        tx: &mut Transaction<'_>,
        customer_id: CustomerId,
        asset_name: &str,
        price: Decimal,
        size: Decimal,
        side: OrderSide,
        funding: Funding,
    ) -> Result<Balance> {
        ensure_non_negative(price)?;
        ensure_non_negative(size)?;
        let notional = notional(asset_name, price, size)?;
        let cash = self.cash_asset.as_str();

        if self.is_cash(asset_name) {
            return match side {
                OrderSide::Buy => self.credit(tx, customer_id, cash, notional),
                OrderSide::Sell => self.pay(tx, customer_id, cash, notional, funding),
            };
        }

        match side {
            OrderSide::Buy => {
                self.pay(tx, customer_id, cash, notional, funding)?;
                self.credit(tx, customer_id, asset_name, size)
            }
            OrderSide::Sell => {
                tx.balance_for_update(&BalanceKey::new(customer_id, cash))?;
                let sold = self.pay(tx, customer_id, asset_name, size, funding)?;
                self.credit(tx, customer_id, cash, notional)?;
                Ok(sold)
            }
        }
    }

    fn pay(
        &self,
        tx: &mut Transaction<'_>,
        customer_id: CustomerId,
        asset_name: &str,
        amount: Decimal,
        funding: Funding,
    ) -> Result<Balance> {
        match funding {
            Funding::Reserved => self.debit(tx, customer_id, asset_name, amount),
            Funding::Unreserved => self.withdraw(tx, customer_id, asset_name, amount),
        }
    }

    // =================================================================
    // Self-committing surfaces
    // =================================================================

    /// [`lock`](Self::lock) in its own transaction.
    pub fn lock_asset(&self, customer_id: CustomerId, asset_name: &str, amount: Decimal) -> Result<Balance> {
        let mut tx = self.store.begin();
        let balance = self.lock(&mut tx, customer_id, asset_name, amount)?;
        tx.commit();
        Ok(balance)
    }

    /// [`unlock`](Self::unlock) in its own transaction.
    pub fn unlock_asset(&self, customer_id: CustomerId, asset_name: &str, amount: Decimal) -> Result<Balance> {
        let mut tx = self.store.begin();
        let balance = self.unlock(&mut tx, customer_id, asset_name, amount)?;
        tx.commit();
        Ok(balance)
    }

    /// [`credit`](Self::credit) in its own transaction.
    pub fn deposit(&self, customer_id: CustomerId, asset_name: &str, amount: Decimal) -> Result<Balance> {
        let mut tx = self.store.begin();
        let balance = self.credit(&mut tx, customer_id, asset_name, amount)?;
        tx.commit();
        Ok(balance)
    }

    /// Direct trade with no prior reservation; both legs commit together.
    pub fn match_trading_asset(
        &self,
        customer_id: CustomerId,
        asset_name: &str,
        price: Decimal,
        size: Decimal,
        side: OrderSide,
    ) -> Result<Balance> {
        let mut tx = self.store.begin();
        let balance = self.settle(
            &mut tx,
            customer_id,
            asset_name,
            price,
            size,
            side,
            Funding::Unreserved,
        )?;
        tx.commit();
        Ok(balance)
    }

    // =================================================================
    // Read-only projections
    // =================================================================

    /// Committed balance, or a zero balance if the row does not exist.
    #[must_use]
    pub fn balance(&self, customer_id: CustomerId, asset_name: &str) -> Balance {
        let key = BalanceKey::new(customer_id, asset_name);
        self.store
            .balance(&key)
            .unwrap_or_else(|| Balance::empty(&key))
    }

    /// A customer's balances, optionally for one asset, ordered by asset.
    #[must_use]
    pub fn list_balances(&self, filter: &BalanceFilter, page: PageRequest) -> Page<Balance> {
        Page::from_sorted(self.store.balances(filter), page.clamped(self.max_page_size))
    }

    /// Check `0 <= usable <= total` on every committed balance.
    pub fn audit(&self) -> Result<AuditReport> {
        audit::audit(&self.store)
    }
}

fn ensure_non_negative(amount: Decimal) -> Result<()> {
    if amount < Decimal::ZERO {
        return Err(OpenbrokerError::InvalidAmount { amount });
    }
    Ok(())
}

fn checked(asset_name: &str, operation: &'static str, value: Option<Decimal>) -> Result<Decimal> {
    value.ok_or_else(|| OpenbrokerError::AmountOverflow {
        asset: asset_name.to_string(),
        operation,
    })
}

fn insufficient(asset_name: &str, needed: Decimal, available: Decimal) -> OpenbrokerError {
    OpenbrokerError::InsufficientBalance {
        asset: asset_name.to_string(),
        needed,
        available,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rust_decimal_macros::dec;

    use super::*;

    fn ledger() -> AssetLedger {
        let config = BrokerConfig::default().with_lock_timeout_ms(50);
        AssetLedger::new(Arc::new(Store::new(&config)), &config)
    }

    fn funded(ledger: &AssetLedger, asset: &str, amount: Decimal) -> CustomerId {
        let customer = CustomerId::new();
        ledger.deposit(customer, asset, amount).unwrap();
        customer
    }

    #[test]
    fn lock_reduces_usable_only() {
        let ledger = ledger();
        let u1 = funded(&ledger, "TRY", dec!(10000));

        let balance = ledger.lock_asset(u1, "TRY", dec!(1500)).unwrap();
        assert_eq!(balance.usable_size, dec!(8500));
        assert_eq!(balance.total_size, dec!(10000));
        assert_eq!(ledger.balance(u1, "TRY"), balance);
    }

    #[test]
    fn lock_without_row_is_insufficient() {
        let ledger = ledger();
        let u2 = CustomerId::new();
        let err = ledger.lock_asset(u2, "AAPL", dec!(50)).unwrap_err();
        assert!(matches!(
            err,
            OpenbrokerError::InsufficientBalance { ref asset, available, .. }
                if asset == "AAPL" && available == Decimal::ZERO
        ));
        assert!(ledger.store().balance(&BalanceKey::new(u2, "AAPL")).is_none());
    }

    #[test]
    fn lock_more_than_usable_fails_and_leaves_row() {
        let ledger = ledger();
        let u1 = funded(&ledger, "AAPL", dec!(100));
        ledger.lock_asset(u1, "AAPL", dec!(60)).unwrap();

        let err = ledger.lock_asset(u1, "AAPL", dec!(60)).unwrap_err();
        assert!(matches!(err, OpenbrokerError::InsufficientBalance { available, .. } if available == dec!(40)));
        assert_eq!(ledger.balance(u1, "AAPL").usable_size, dec!(40));
    }

    #[test]
    fn lock_unlock_round_trip() {
        let ledger = ledger();
        let u1 = funded(&ledger, "TRY", dec!(250.75));
        ledger.lock_asset(u1, "TRY", dec!(100.25)).unwrap();
        let balance = ledger.unlock_asset(u1, "TRY", dec!(100.25)).unwrap();
        assert_eq!(balance.usable_size, dec!(250.75));
        assert_eq!(balance.total_size, dec!(250.75));
    }

    #[test]
    fn unlock_without_row_fails() {
        let ledger = ledger();
        let err = ledger.unlock_asset(CustomerId::new(), "AAPL", dec!(1)).unwrap_err();
        assert!(matches!(err, OpenbrokerError::NoBalanceToRelease { .. }));
    }

    #[test]
    fn credit_creates_row_then_accumulates() {
        let ledger = ledger();
        let u1 = CustomerId::new();
        let created = ledger.deposit(u1, "AAPL", dec!(10)).unwrap();
        assert_eq!((created.total_size, created.usable_size), (dec!(10), dec!(10)));
        let grown = ledger.deposit(u1, "AAPL", dec!(5)).unwrap();
        assert_eq!((grown.total_size, grown.usable_size), (dec!(15), dec!(15)));
        assert_eq!(grown.created_at, created.created_at);
    }

    #[test]
    fn zero_credit_creates_nothing() {
        let ledger = ledger();
        let u1 = CustomerId::new();
        let balance = ledger.deposit(u1, "AAPL", Decimal::ZERO).unwrap();
        assert!(balance.total_size.is_zero());
        assert!(ledger.store().all_balances().is_empty());
    }

    #[test]
    fn negative_amount_rejected() {
        let ledger = ledger();
        let u1 = funded(&ledger, "TRY", dec!(10));
        for err in [
            ledger.deposit(u1, "TRY", dec!(-1)).unwrap_err(),
            ledger.lock_asset(u1, "TRY", dec!(-1)).unwrap_err(),
            ledger.unlock_asset(u1, "TRY", dec!(-1)).unwrap_err(),
        ] {
            assert!(matches!(err, OpenbrokerError::InvalidAmount { .. }));
        }
        assert_eq!(ledger.balance(u1, "TRY").usable_size, dec!(10));
    }

    #[test]
    fn debit_consumes_reservation_only() {
        let ledger = ledger();
        let u1 = funded(&ledger, "TRY", dec!(100));
        ledger.lock_asset(u1, "TRY", dec!(30)).unwrap();

        let mut tx = ledger.store().begin();
        let balance = ledger.debit(&mut tx, u1, "TRY", dec!(30)).unwrap();
        tx.commit();
        assert_eq!((balance.total_size, balance.usable_size), (dec!(70), dec!(70)));
    }

    #[test]
    fn debit_beyond_reservation_fails() {
        let ledger = ledger();
        let u1 = funded(&ledger, "TRY", dec!(100));
        ledger.lock_asset(u1, "TRY", dec!(10)).unwrap();

        let mut tx = ledger.store().begin();
        let err = ledger.debit(&mut tx, u1, "TRY", dec!(20)).unwrap_err();
        assert!(matches!(err, OpenbrokerError::InsufficientBalance { available, .. } if available == dec!(10)));
    }

    #[test]
    fn withdraw_draws_usable_and_total() {
        let ledger = ledger();
        let u1 = funded(&ledger, "TRY", dec!(100));
        let mut tx = ledger.store().begin();
        let balance = ledger.withdraw(&mut tx, u1, "TRY", dec!(40)).unwrap();
        tx.commit();
        assert_eq!((balance.total_size, balance.usable_size), (dec!(60), dec!(60)));
    }

    #[test]
    fn reserved_buy_settlement_conserves_cash() {
        let ledger = ledger();
        let u1 = funded(&ledger, "TRY", dec!(10000));
        ledger.lock_asset(u1, "TRY", dec!(1500)).unwrap();

        let mut tx = ledger.store().begin();
        let aapl = ledger
            .settle(&mut tx, u1, "AAPL", dec!(150), dec!(10), OrderSide::Buy, Funding::Reserved)
            .unwrap();
        tx.commit();

        assert_eq!((aapl.total_size, aapl.usable_size), (dec!(10), dec!(10)));
        let cash = ledger.balance(u1, "TRY");
        assert_eq!((cash.total_size, cash.usable_size), (dec!(8500), dec!(8500)));
    }

    #[test]
    fn reserved_sell_settlement_credits_cash() {
        let ledger = ledger();
        let u1 = funded(&ledger, "AAPL", dec!(100));
        ledger.lock_asset(u1, "AAPL", dec!(60)).unwrap();

        let mut tx = ledger.store().begin();
        let aapl = ledger
            .settle(&mut tx, u1, "AAPL", dec!(2.5), dec!(60), OrderSide::Sell, Funding::Reserved)
            .unwrap();
        assert!(tx.holds_balance_lock(&BalanceKey::new(u1, "TRY")));
        tx.commit();

        assert_eq!((aapl.total_size, aapl.usable_size), (dec!(40), dec!(40)));
        let cash = ledger.balance(u1, "TRY");
        assert_eq!((cash.total_size, cash.usable_size), (dec!(150), dec!(150)));
    }

    #[test]
    fn cash_asset_settlement_is_single_leg() {
        let ledger = ledger();
        let u1 = CustomerId::new();
        let bought = ledger
            .match_trading_asset(u1, "TRY", Decimal::ONE, dec!(500), OrderSide::Buy)
            .unwrap();
        assert_eq!(bought.total_size, dec!(500));

        let sold = ledger
            .match_trading_asset(u1, "TRY", Decimal::ONE, dec!(200), OrderSide::Sell)
            .unwrap();
        assert_eq!((sold.total_size, sold.usable_size), (dec!(300), dec!(300)));
    }

    #[test]
    fn failed_second_leg_rolls_back_first() {
        let ledger = ledger();
        let u1 = funded(&ledger, "TRY", dec!(10));
        // Unreserved SELL of an asset the customer does not hold: the cash
        // row is latched first, the asset leg fails, nothing commits.
        let err = ledger
            .match_trading_asset(u1, "AAPL", dec!(5), dec!(1), OrderSide::Sell)
            .unwrap_err();
        assert!(matches!(err, OpenbrokerError::InsufficientBalance { .. }));
        assert_eq!(ledger.balance(u1, "TRY").total_size, dec!(10));

        let err = ledger
            .match_trading_asset(u1, "AAPL", dec!(5), dec!(3), OrderSide::Buy)
            .unwrap_err();
        assert!(matches!(err, OpenbrokerError::InsufficientBalance { .. }));
        assert_eq!(ledger.balance(u1, "TRY").usable_size, dec!(10));
        assert!(ledger.store().balance(&BalanceKey::new(u1, "AAPL")).is_none());
    }

    #[test]
    fn held_row_times_out() {
        let ledger = ledger();
        let u1 = funded(&ledger, "TRY", dec!(10));
        let mut holder = ledger.store().begin();
        ledger.lock(&mut holder, u1, "TRY", dec!(1)).unwrap();

        let mut waiter = ledger.store().begin_with_timeout(Duration::from_millis(5));
        let err = ledger.lock(&mut waiter, u1, "TRY", dec!(1)).unwrap_err();
        assert!(matches!(err, OpenbrokerError::LockTimeout { .. }));
        drop(holder);
        assert_eq!(ledger.balance(u1, "TRY").usable_size, dec!(10));
    }

    #[test]
    fn credit_past_decimal_range_is_rejected() {
        let ledger = ledger();
        let u1 = funded(&ledger, "TRY", Decimal::MAX);

        let err = ledger.deposit(u1, "TRY", Decimal::ONE).unwrap_err();
        assert!(matches!(
            err,
            OpenbrokerError::AmountOverflow { ref asset, operation: "credit" } if asset == "TRY"
        ));
        let row = ledger.balance(u1, "TRY");
        assert_eq!((row.total_size, row.usable_size), (Decimal::MAX, Decimal::MAX));
    }

    #[test]
    fn unlock_past_decimal_range_is_rejected() {
        let ledger = ledger();
        let u1 = funded(&ledger, "AAPL", Decimal::MAX);
        ledger.lock_asset(u1, "AAPL", Decimal::ONE).unwrap();

        let err = ledger.unlock_asset(u1, "AAPL", Decimal::TWO).unwrap_err();
        assert!(matches!(err, OpenbrokerError::AmountOverflow { operation: "unlock", .. }));
        assert_eq!(ledger.balance(u1, "AAPL").usable_size, Decimal::MAX - Decimal::ONE);
    }

    #[test]
    fn settlement_notional_overflow_changes_nothing() {
        let ledger = ledger();
        let u1 = funded(&ledger, "TRY", dec!(100));

        let err = ledger
            .match_trading_asset(u1, "AAPL", Decimal::MAX, Decimal::TWO, OrderSide::Buy)
            .unwrap_err();
        assert!(matches!(err, OpenbrokerError::AmountOverflow { operation: "notional", .. }));
        assert_eq!(ledger.balance(u1, "TRY").total_size, dec!(100));
        assert!(ledger.store().balance(&BalanceKey::new(u1, "AAPL")).is_none());
    }

    #[test]
    fn sell_proceeds_overflow_rolls_back_asset_leg() {
        let ledger = ledger();
        let u1 = funded(&ledger, "TRY", Decimal::MAX);
        ledger.deposit(u1, "AAPL", dec!(10)).unwrap();

        let err = ledger
            .match_trading_asset(u1, "AAPL", dec!(1), dec!(5), OrderSide::Sell)
            .unwrap_err();
        assert!(matches!(err, OpenbrokerError::AmountOverflow { operation: "credit", .. }));
        assert_eq!(ledger.balance(u1, "AAPL").total_size, dec!(10));
        assert_eq!(ledger.balance(u1, "TRY").total_size, Decimal::MAX);
    }

    #[test]
    fn list_balances_filters_and_pages() {
        let ledger = ledger();
        let u1 = CustomerId::new();
        for asset in ["TRY", "AAPL", "MSFT", "GOOG"] {
            ledger.deposit(u1, asset, dec!(1)).unwrap();
        }
        ledger.deposit(CustomerId::new(), "AAPL", dec!(7)).unwrap();

        let page = ledger.list_balances(&BalanceFilter::customer(u1), PageRequest::new(0, 3));
        assert_eq!(page.total, 4);
        let names: Vec<_> = page.items.iter().map(|b| b.asset_name.as_str()).collect();
        assert_eq!(names, ["AAPL", "GOOG", "MSFT"]);

        let only = ledger.list_balances(
            &BalanceFilter::customer(u1).with_asset("AAPL"),
            PageRequest::default(),
        );
        assert_eq!(only.total, 1);
        assert_eq!(only.items[0].total_size, dec!(1));
    }
}
