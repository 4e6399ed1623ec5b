//! Order lifecycle service.
//!
//! Drives every order through `Pending → Matched | Cancelled`. Each command
//! runs in one store transaction: the order row and every balance leg it
//! touches commit together or not at all.
//!
//! | command | ledger effect (non-cash asset)              |
//! |---------|---------------------------------------------|
//! | create  | BUY locks `price*size` cash, SELL locks `size` |
//! | match   | settle against the reservation              |
//! | cancel  | unlock whatever create locked               |
//!
//! Orders on the cash asset reserve nothing at creation, settle from usable
//! quantity at match time, and release nothing on cancel.

use std::sync::Arc;

use openbroker_ledger::{AssetLedger, Funding};
use openbroker_store::Transaction;
use openbroker_types::{
    Balance, BrokerConfig, NewOrder, OpenbrokerError, Order, OrderFilter, OrderId, OrderSide,
    OrderStatus, Page, PageRequest, Result,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::CustomerDirectory;

/// An order together with the balance the command last touched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReceipt {
    pub order: Order,
    /// `None` when the command moved no balance (cash-asset create/cancel).
    pub balance: Option<Balance>,
}

pub struct OrderLifecycle {
    ledger: Arc<AssetLedger>,
    customers: Arc<dyn CustomerDirectory>,
    config: BrokerConfig,
}

impl OrderLifecycle {
    #[must_use]
    pub fn new(
        ledger: Arc<AssetLedger>,
        customers: Arc<dyn CustomerDirectory>,
        config: BrokerConfig,
    ) -> Self {
        Self {
            ledger,
            customers,
            config,
        }
    }

    #[must_use]
    pub fn ledger(&self) -> &Arc<AssetLedger> {
        &self.ledger
    }

    #[must_use]
    pub fn config(&self) -> &BrokerConfig {
        &self.config
    }

    // =================================================================
    // Commands
    // =================================================================

    /// Place a new order and reserve what it will pay with.
    ///
    /// Checks run in order: request shape (`InvalidOrder`), cash price
    /// (`InvalidCashOrderPrice`), customer (`CustomerNotFound`), notional
    /// (`AmountOverflow`), then the reservation (`InsufficientBalance`).
    /// Nothing is persisted on failure.
    pub fn create_order(&self, request: NewOrder) -> Result<OrderReceipt> {
        self.try_create(request)
            .inspect_err(|e| warn!(code = e.code(), error = %e, "Order rejected"))
    }

    fn try_create(&self, request: NewOrder) -> Result<OrderReceipt> {
        self.validate(&request)?;
        if self.config.is_cash(&request.asset_name) && request.price != BrokerConfig::cash_price() {
            return Err(OpenbrokerError::InvalidCashOrderPrice {
                asset: request.asset_name,
                price: request.price,
            });
        }
        if !self.customers.exists(request.customer_id) {
            return Err(OpenbrokerError::CustomerNotFound(request.customer_id));
        }

        let notional = request.notional()?;

        let mut tx = self.ledger.store().begin();
        let balance = self.reserve(&mut tx, &request, notional)?;
        let order = tx.insert_order(request)?;
        tx.commit();

        info!(
            order_id = %order.id,
            customer = %order.customer_id,
            asset = %order.asset_name,
            side = %order.side,
            size = %order.size,
            price = %order.price,
            "Order created"
        );
        Ok(OrderReceipt { order, balance })
    }

    /// Settle a pending order in full and mark it `Matched`.
    pub fn match_order(&self, id: OrderId) -> Result<OrderReceipt> {
        self.try_match(id)
            .inspect_err(|e| warn!(order_id = %id, code = e.code(), error = %e, "Match rejected"))
    }

    fn try_match(&self, id: OrderId) -> Result<OrderReceipt> {
        let mut tx = self.ledger.store().begin();
        let mut order = Self::pending_for_update(&mut tx, id, OrderStatus::Matched)?;

        let funding = if self.config.is_cash(&order.asset_name) {
            Funding::Unreserved
        } else {
            Funding::Reserved
        };
        let balance = self.ledger.settle(
            &mut tx,
            order.customer_id,
            &order.asset_name,
            order.price,
            order.size,
            order.side,
            funding,
        )?;
        order.status = OrderStatus::Matched;
        let order = tx.put_order(order)?;
        tx.commit();

        info!(order_id = %order.id, asset = %order.asset_name, side = %order.side, "Order matched");
        Ok(OrderReceipt {
            order,
            balance: Some(balance),
        })
    }

    /// Release a pending order's reservation and mark it `Cancelled`.
    pub fn cancel_order(&self, id: OrderId) -> Result<OrderReceipt> {
        self.try_cancel(id)
            .inspect_err(|e| warn!(order_id = %id, code = e.code(), error = %e, "Cancel rejected"))
    }

    fn try_cancel(&self, id: OrderId) -> Result<OrderReceipt> {
        let mut tx = self.ledger.store().begin();
        let mut order = Self::pending_for_update(&mut tx, id, OrderStatus::Cancelled)?;

        let notional = order.notional()?;
        let balance = match self.reservation(&order.asset_name, order.side, order.size, notional) {
            Some((asset, amount)) => Some(self.ledger.unlock(&mut tx, order.customer_id, asset, amount)?),
            None => None,
        };
        order.status = OrderStatus::Cancelled;
        let order = tx.put_order(order)?;
        tx.commit();

        info!(order_id = %order.id, asset = %order.asset_name, side = %order.side, "Order cancelled");
        Ok(OrderReceipt { order, balance })
    }

    // =================================================================
    // Queries
    // =================================================================

    /// Committed state of one order.
    pub fn get_order(&self, id: OrderId) -> Result<Order> {
        self.ledger
            .store()
            .order(id)
            .ok_or(OpenbrokerError::OrderNotFound(id))
    }

    /// A customer's orders matching `filter`, ordered by id.
    #[must_use]
    pub fn list_orders(&self, filter: &OrderFilter, page: PageRequest) -> Page<Order> {
        Page::from_sorted(
            self.ledger.store().orders(filter),
            page.clamped(self.config.max_page_size),
        )
    }

    // =================================================================
    // Internals
    // =================================================================

    fn validate(&self, request: &NewOrder) -> Result<()> {
        let name_len = request.asset_name.chars().count();
        let (min, max) = (self.config.min_asset_name_len, self.config.max_asset_name_len);
        if !(min..=max).contains(&name_len) || request.asset_name.trim() != request.asset_name {
            return Err(invalid(format!(
                "asset name {:?} must be {min} to {max} characters",
                request.asset_name
            )));
        }
        if request.size < Decimal::ZERO {
            return Err(invalid(format!("size {} must not be negative", request.size)));
        }
        if request.price <= Decimal::ZERO {
            return Err(invalid(format!("price {} must be positive", request.price)));
        }
        Ok(())
    }

    /// Which balance an order reserves, and how much. `None` for the cash
    /// asset.
    fn reservation<'a>(
        &'a self,
        asset_name: &'a str,
        side: OrderSide,
        size: Decimal,
        notional: Decimal,
    ) -> Option<(&'a str, Decimal)> {
        if self.config.is_cash(asset_name) {
            return None;
        }
        Some(match side {
            OrderSide::Buy => (self.ledger.cash_asset(), notional),
            OrderSide::Sell => (asset_name, size),
        })
    }

    fn reserve(&self, tx: &mut Transaction<'_>, request: &NewOrder, notional: Decimal) -> Result<Option<Balance>> {
        self.reservation(&request.asset_name, request.side, request.size, notional)
            .map(|(asset, amount)| self.ledger.lock(tx, request.customer_id, asset, amount))
            .transpose()
    }

    /// Latch an order row and check it may move to `target`.
    fn pending_for_update(tx: &mut Transaction<'_>, id: OrderId, target: OrderStatus) -> Result<Order> {
        let order = tx
            .order_for_update(id)?
            .ok_or(OpenbrokerError::OrderNotFound(id))?;
        if !order.status.can_transition_to(target) {
            return Err(OpenbrokerError::OrderNotPending {
                id,
                status: order.status,
            });
        }
        Ok(order)
    }
}

fn invalid(reason: String) -> OpenbrokerError {
    OpenbrokerError::InvalidOrder { reason }
}
