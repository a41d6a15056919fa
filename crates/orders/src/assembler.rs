//! Checkout workflow: validate, reserve, price, snapshot, persist.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::instrument;

use freshcart_core::{Money, OrderId, ProductId, UserId};
use freshcart_inventory::{InventoryLedger, Reservation, ReserveOutcome};

use crate::error::PlaceOrderError;
use crate::order::{Order, OrderLineItem};
use crate::pricing::OrderTotals;
use crate::repository::OrderRepository;
use crate::request::{CartLine, PlaceOrder, ValidatedCart};

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Turns a submitted cart into a persisted, `Pending` order.
///
/// ## Stock
///
/// Each cart line takes its units through [`InventoryLedger::reserve`], one line
/// at a time in cart order. If a later line fails, or the order cannot be
/// written, every reservation already taken for this attempt is released (most
/// recent first) before the error is returned. A failed checkout therefore
/// leaves stock where it started.
///
/// ## Pricing
///
/// Line items snapshot the product's name, price and unit as read during the
/// attempt; `total = Σ price × quantity + DELIVERY_FEE`.
pub struct OrderAssembler<L, R> {
    ledger: L,
    orders: R,
    clock: Clock,
}

impl<L, R> OrderAssembler<L, R>
where
    L: InventoryLedger,
    R: OrderRepository,
{
    pub fn new(ledger: L, orders: R) -> Self {
        Self {
            ledger,
            orders,
            clock: Arc::new(Utc::now),
        }
    }

    /// Replace the wall clock used for `created_at`/`updated_at`.
    pub fn with_clock(
        mut self,
        clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static,
    ) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn orders(&self) -> &R {
        &self.orders
    }

    /// Place an order for `acting_user` (or a guest when `None`).
    ///
    /// Validation happens before any store is touched.
    #[instrument(
        skip(self, request),
        fields(
            items = request.items.len(),
            acting_user = ?acting_user
        ),
        err(level = "warn")
    )]
    pub async fn place_order(
        &self,
        request: PlaceOrder,
        acting_user: Option<UserId>,
    ) -> Result<Order, PlaceOrderError> {
        let cart = request.validate()?;

        let mut held: Vec<Reservation> = Vec::with_capacity(cart.lines.len());
        let result = self.reserve_and_persist(cart, acting_user, &mut held).await;

        match result {
            Ok(order) => {
                tracing::info!(
                    order_id = %order.id_typed(),
                    total = %order.total(),
                    "order placed"
                );
                Ok(order)
            }
            Err(err) => {
                self.release_all(held).await;
                Err(err)
            }
        }
    }

    async fn reserve_and_persist(
        &self,
        cart: ValidatedCart,
        acting_user: Option<UserId>,
        held: &mut Vec<Reservation>,
    ) -> Result<Order, PlaceOrderError> {
        let mut items = Vec::with_capacity(cart.lines.len());
        let mut subtotal = Money::ZERO;

        for line in &cart.lines {
            let (item, reservation) = self.reserve_line(line).await?;
            held.push(reservation);

            let line_total = item
                .line_total()
                .ok_or_else(|| PlaceOrderError::validation("order total is too large"))?;
            subtotal = subtotal
                .checked_add(line_total)
                .ok_or_else(|| PlaceOrderError::validation("order total is too large"))?;
            items.push(item);
        }

        let totals = OrderTotals::from_subtotal(subtotal)
            .ok_or_else(|| PlaceOrderError::validation("order total is too large"))?;

        let order = Order::place(
            OrderId::new(),
            acting_user,
            cart.customer,
            cart.delivery_address,
            items,
            totals,
            cart.order_notes,
            (self.clock)(),
        )?;

        self.orders.create(&order).await?;
        Ok(order)
    }

    /// Look up, stock-check and reserve a single cart line.
    async fn reserve_line(
        &self,
        line: &CartLine,
    ) -> Result<(OrderLineItem, Reservation), PlaceOrderError> {
        let product_id: ProductId = line
            .product_id
            .parse()
            .map_err(|_| PlaceOrderError::product_not_found(&line.product_id))?;

        let product = self
            .ledger
            .get_product(product_id)
            .await?
            .ok_or_else(|| PlaceOrderError::product_not_found(&line.product_id))?;

        let insufficient = |available: u32| PlaceOrderError::InsufficientStock {
            product_id,
            product_name: product.name.clone(),
            requested: line.quantity,
            available,
        };

        if !product.has_stock_for(line.quantity) {
            return Err(insufficient(product.stock));
        }

        match self.ledger.reserve(product_id, line.quantity).await? {
            ReserveOutcome::Reserved(reservation) => {
                Ok((OrderLineItem::snapshot(&product, line.quantity), reservation))
            }
            // Lost a race with another checkout between the read and the reserve.
            ReserveOutcome::InsufficientStock { available } => Err(insufficient(available)),
            ReserveOutcome::NotFound => Err(PlaceOrderError::product_not_found(&line.product_id)),
        }
    }

    async fn release_all(&self, held: Vec<Reservation>) {
        for reservation in held.into_iter().rev() {
            if let Err(err) = self.ledger.release(reservation).await {
                tracing::error!(
                    product_id = %reservation.product_id,
                    quantity = reservation.quantity,
                    "failed to release reservation: {err}"
                );
            }
        }
    }
}
