//! CLOB order entry and tracking.

use crate::error::{ExecutionError, Result};
use hybrid_dex_domain::entities::{Order, OrderId, Token};
use hybrid_dex_domain::enums::{OrderSide, OrderStatus, OrderType};
use hybrid_dex_domain::math::units;
use hybrid_dex_domain::value_objects::TokenAmount;
use hybrid_dex_protocols::addresses::ContractAddresses;
use hybrid_dex_protocols::client::{TransactionSigner, submit};
use hybrid_dex_protocols::payload::TransactionRequest;
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Tracks the orders placed from this client.
///
/// Each order is recorded as `PendingSubmission` before it is sent and is
/// moved to `Open` or `Failed` by the submission outcome.
pub struct OrderTracker {
    addresses: ContractAddresses,
    orders: RwLock<Arc<Vec<Order>>>,
}

impl OrderTracker {
    pub fn new(addresses: ContractAddresses) -> Self {
        Self {
            addresses,
            orders: RwLock::new(Arc::new(Vec::new())),
        }
    }

    /// All tracked orders, newest first.
    pub async fn snapshot(&self) -> Arc<Vec<Order>> {
        Arc::clone(&*self.orders.read().await)
    }

    pub async fn get(&self, id: &OrderId) -> Option<Order> {
        self.orders.read().await.iter().find(|o| o.matches(id)).cloned()
    }

    pub async fn open_orders(&self) -> Vec<Order> {
        self.orders
            .read()
            .await
            .iter()
            .filter(|o| !o.status().is_terminal())
            .cloned()
            .collect()
    }

    /// Filled, cancelled and failed orders.
    pub async fn history(&self) -> Vec<Order> {
        self.orders
            .read()
            .await
            .iter()
            .filter(|o| o.status().is_terminal())
            .cloned()
            .collect()
    }

    async fn store(&self, order: &Order) {
        let mut guard = self.orders.write().await;
        let mut next = Vec::with_capacity(guard.len() + 1);
        next.push(order.clone());
        next.extend(guard.iter().filter(|o| o.local_id != order.local_id).cloned());
        *guard = Arc::new(next);
    }

    async fn update<F>(&self, id: &OrderId, f: F) -> Result<Order>
    where
        F: FnOnce(&mut Order) -> Result<()>,
    {
        let mut guard = self.orders.write().await;
        let mut next: Vec<Order> = guard.as_ref().clone();
        let order = next
            .iter_mut()
            .find(|o| o.matches(id))
            .ok_or_else(|| ExecutionError::OrderNotFound(id.to_string()))?;
        f(order)?;
        let updated = order.clone();
        *guard = Arc::new(next);
        Ok(updated)
    }

    /// Raw base units for `size`; zero after flooring is refused.
    fn raw_size(size: Decimal, base: &Token) -> Result<TokenAmount> {
        if size <= Decimal::ZERO {
            return Err(ExecutionError::InvalidInput(format!("order size must be positive: {size}")));
        }
        let raw = units::to_raw_units(size, base.decimals)?;
        if raw.is_zero() {
            return Err(ExecutionError::InvalidInput(format!(
                "order size {size} is below one unit of {}",
                base.symbol
            )));
        }
        Ok(raw)
    }

    async fn place(&self, signer: &dyn TransactionSigner, mut order: Order, request: TransactionRequest) -> Result<Order> {
        self.store(&order).await;
        match submit(signer, &request).await {
            Ok(receipt) => {
                order.tx_hash = Some(receipt.hash);
                order.transition(OrderStatus::Open)?;
                info!(
                    order = %order.local_id,
                    market = %format!("{}/{}", order.base.symbol, order.quote.symbol),
                    side = ?order.side,
                    size = %order.size,
                    "Order opened"
                );
            }
            Err(e) => {
                order.failure_reason = Some(e.to_string());
                order.transition(OrderStatus::Failed)?;
                error!(order = %order.local_id, error = %e, "Order submission failed");
            }
        }
        self.store(&order).await;
        Ok(order)
    }

    /// Places a limit order. Price is quote per base, size is in base units.
    ///
    /// The returned order is `Open` or, if submission failed, `Failed`.
    ///
    /// # Errors
    /// Non-positive price or size and scaling errors, all before submission.
    pub async fn place_limit_order(
        &self,
        signer: &dyn TransactionSigner,
        base: &Token,
        quote: &Token,
        side: OrderSide,
        price: Decimal,
        size: Decimal,
    ) -> Result<Order> {
        if price <= Decimal::ZERO {
            return Err(ExecutionError::InvalidInput(format!("limit price must be positive: {price}")));
        }
        let size_raw = Self::raw_size(size, base)?;
        let price_scaled = units::scale_price(price)?;
        if price_scaled == 0 {
            return Err(ExecutionError::InvalidInput(format!("limit price {price} is below the price tick")));
        }
        let request = self
            .addresses
            .clob()
            .place_limit_order(base, quote, side, price_scaled, size_raw);
        let order = Order::new(base.clone(), quote.clone(), side, OrderType::Limit, Some(price), size);
        self.place(signer, order, request).await
    }

    /// # Errors
    /// Non-positive size and scaling errors, before submission.
    pub async fn place_market_order(
        &self,
        signer: &dyn TransactionSigner,
        base: &Token,
        quote: &Token,
        side: OrderSide,
        size: Decimal,
    ) -> Result<Order> {
        let size_raw = Self::raw_size(size, base)?;
        let request = self.addresses.clob().place_market_order(base, quote, side, size_raw);
        let order = Order::new(base.clone(), quote.clone(), side, OrderType::Market, None, size);
        self.place(signer, order, request).await
    }

    /// Attaches the id the venue assigned to a locally placed order.
    ///
    /// # Errors
    /// [`ExecutionError::OrderNotFound`].
    pub async fn confirm_venue_id(&self, local_id: Uuid, venue_id: impl Into<String>) -> Result<Order> {
        let venue_id = venue_id.into();
        self.update(&OrderId::Local(local_id), |order| {
            order.venue_id = Some(venue_id);
            Ok(())
        })
        .await
    }

    /// Records the cumulative filled size reported by the venue.
    ///
    /// # Errors
    /// Unknown order, a fill going backwards, or an order that is not open.
    pub async fn apply_fill(&self, id: &OrderId, filled_size: Decimal) -> Result<Order> {
        let order = self
            .update(id, |order| order.apply_fill(filled_size).map_err(Into::into))
            .await?;
        if order.status() == OrderStatus::Filled {
            info!(order = %order.local_id, size = %order.size, "Order filled");
        }
        Ok(order)
    }

    /// Cancels an open order.
    ///
    /// A rejected or failed cancel leaves the order `Open` and returns the
    /// error.
    ///
    /// # Errors
    /// Unknown order, order not open, no venue id yet, or submission failure.
    pub async fn cancel_order(&self, signer: &dyn TransactionSigner, id: &OrderId) -> Result<Order> {
        let order = self
            .get(id)
            .await
            .ok_or_else(|| ExecutionError::OrderNotFound(id.to_string()))?;
        if order.status() != OrderStatus::Open {
            return Err(ExecutionError::OrderState {
                id: id.to_string(),
                status: order.status(),
            });
        }
        let venue_id = order.venue_id.clone().ok_or_else(|| {
            ExecutionError::InvalidInput(format!("order {id} has no venue id yet"))
        })?;

        let request = self.addresses.clob().cancel_order(&order.base, &order.quote, &venue_id);
        if let Err(e) = submit(signer, &request).await {
            warn!(order = %order.local_id, error = %e, "Cancel rejected; order stays open");
            return Err(e.into());
        }
        let order = self
            .update(id, |order| order.transition(OrderStatus::Cancelled).map_err(Into::into))
            .await?;
        info!(order = %order.local_id, venue_id = %venue_id, "Order cancelled");
        Ok(order)
    }
}
