use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use freshcart_core::{DomainError, Entity, Money, OrderId, ProductId, UserId, ValueObject};
use freshcart_inventory::Product;

use crate::pricing::{DELIVERY_FEE, OrderTotals, subtotal_of};

/// Order status lifecycle.
///
/// Orders are always created `Pending`; later transitions belong to fulfilment
/// tooling outside the checkout path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(DomainError::validation(format!("unknown order status '{other}'"))),
        }
    }
}

/// Contact details captured at checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Snapshot of a product at the moment of ordering.
///
/// Never re-read from the catalog afterwards: later price or name changes do not
/// affect placed orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineItem {
    pub product_id: ProductId,
    pub product_name: String,
    /// Unit price at order time.
    pub price: Money,
    pub quantity: u32,
    pub unit: String,
}

impl OrderLineItem {
    pub fn snapshot(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id,
            product_name: product.name.clone(),
            price: product.price,
            quantity,
            unit: product.unit.clone(),
        }
    }

    /// `price × quantity`, or `None` on overflow.
    pub fn line_total(&self) -> Option<Money> {
        self.price.checked_mul(self.quantity)
    }
}

impl ValueObject for OrderLineItem {}

/// Everything needed to rebuild an [`Order`] from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderParts {
    pub id: OrderId,
    pub user_id: Option<UserId>,
    pub customer: CustomerInfo,
    pub delivery_address: String,
    pub items: Vec<OrderLineItem>,
    pub totals: OrderTotals,
    pub order_notes: Option<String>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A placed order.
///
/// Holds at least one line item and always satisfies
/// `total == subtotal + delivery_fee` with `subtotal == Σ price × quantity`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    id: OrderId,
    user_id: Option<UserId>,
    customer: CustomerInfo,
    delivery_address: String,
    items: Vec<OrderLineItem>,
    subtotal: Money,
    delivery_fee: Money,
    total: Money,
    order_notes: Option<String>,
    status: OrderStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Order {
    /// Build a new `Pending` order.
    ///
    /// `totals` must match the items and carry the current [`DELIVERY_FEE`];
    /// anything else is an invariant violation.
    #[allow(clippy::too_many_arguments)]
    pub fn place(
        id: OrderId,
        user_id: Option<UserId>,
        customer: CustomerInfo,
        delivery_address: String,
        items: Vec<OrderLineItem>,
        totals: OrderTotals,
        order_notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if totals.delivery_fee != DELIVERY_FEE {
            return Err(DomainError::invariant(
                "new orders must carry the current delivery fee",
            ));
        }
        Self::from_parts(OrderParts {
            id,
            user_id,
            customer,
            delivery_address,
            items,
            totals,
            order_notes,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuild an order (e.g. from a database row), re-checking its invariants.
    ///
    /// The stored delivery fee is trusted as recorded; only the arithmetic
    /// relating it to the line items is checked.
    pub fn from_parts(parts: OrderParts) -> Result<Self, DomainError> {
        if parts.items.is_empty() {
            return Err(DomainError::invariant("order must contain at least one item"));
        }
        if parts.items.iter().any(|item| item.quantity == 0) {
            return Err(DomainError::invariant("line item quantity must be positive"));
        }

        let subtotal = subtotal_of(&parts.items)
            .ok_or_else(|| DomainError::invariant("order total overflows"))?;
        let expected = OrderTotals::with_fee(subtotal, parts.totals.delivery_fee)
            .ok_or_else(|| DomainError::invariant("order total overflows"))?;
        if expected != parts.totals {
            return Err(DomainError::invariant(
                "order totals do not match its line items",
            ));
        }

        Ok(Self {
            id: parts.id,
            user_id: parts.user_id,
            customer: parts.customer,
            delivery_address: parts.delivery_address,
            items: parts.items,
            subtotal: parts.totals.subtotal,
            delivery_fee: parts.totals.delivery_fee,
            total: parts.totals.total,
            order_notes: parts.order_notes,
            status: parts.status,
            created_at: parts.created_at,
            updated_at: parts.updated_at,
        })
    }

    pub fn id_typed(&self) -> OrderId {
        self.id
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    pub fn customer(&self) -> &CustomerInfo {
        &self.customer
    }

    pub fn delivery_address(&self) -> &str {
        &self.delivery_address
    }

    pub fn items(&self) -> &[OrderLineItem] {
        &self.items
    }

    pub fn subtotal(&self) -> Money {
        self.subtotal
    }

    pub fn delivery_fee(&self) -> Money {
        self.delivery_fee
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn totals(&self) -> OrderTotals {
        OrderTotals {
            subtotal: self.subtotal,
            delivery_fee: self.delivery_fee,
            total: self.total,
        }
    }

    pub fn order_notes(&self) -> Option<&str> {
        self.order_notes.as_deref()
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Move to `status`. Line items and totals are never touched.
    pub fn set_status(&mut self, status: OrderStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now;
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_customer() -> CustomerInfo {
        CustomerInfo {
            name: "Ann".to_string(),
            email: "ann@example.com".to_string(),
            phone: "555-0100".to_string(),
        }
    }

    fn test_item(price: u64, quantity: u32) -> OrderLineItem {
        OrderLineItem {
            product_id: ProductId::new(),
            product_name: "Fresh Apples".to_string(),
            price: Money::from_cents(price),
            quantity,
            unit: "per lb".to_string(),
        }
    }

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn placed_order_is_pending_with_matching_totals() {
        let items = vec![test_item(499, 2)];
        let totals = OrderTotals::from_items(&items).unwrap();

        let order = Order::place(
            OrderId::new(),
            None,
            test_customer(),
            "1 Main St".to_string(),
            items,
            totals,
            None,
            test_time(),
        )
        .unwrap();

        assert_eq!(order.status(), OrderStatus::Pending);
        assert_eq!(order.subtotal(), Money::from_cents(998));
        assert_eq!(order.delivery_fee(), DELIVERY_FEE);
        assert_eq!(order.total(), Money::from_cents(1597));
        assert_eq!(order.created_at(), order.updated_at());
    }

    #[test]
    fn place_rejects_empty_item_list() {
        let totals = OrderTotals::from_subtotal(Money::ZERO).unwrap();
        let err = Order::place(
            OrderId::new(),
            None,
            test_customer(),
            "1 Main St".to_string(),
            Vec::new(),
            totals,
            None,
            test_time(),
        )
        .unwrap_err();

        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn from_parts_rejects_tampered_totals() {
        let items = vec![test_item(250, 4)];
        let mut totals = OrderTotals::from_items(&items).unwrap();
        totals.total = Money::from_cents(1);

        let err = Order::from_parts(OrderParts {
            id: OrderId::new(),
            user_id: Some(UserId::new()),
            customer: test_customer(),
            delivery_address: "1 Main St".to_string(),
            items,
            totals,
            order_notes: None,
            status: OrderStatus::Pending,
            created_at: test_time(),
            updated_at: test_time(),
        })
        .unwrap_err();

        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn from_parts_keeps_the_fee_the_order_was_placed_with() {
        let items = vec![test_item(499, 2)];
        let totals =
            OrderTotals::with_fee(Money::from_cents(998), Money::from_cents(499)).unwrap();

        let order = Order::from_parts(OrderParts {
            id: OrderId::new(),
            user_id: None,
            customer: test_customer(),
            delivery_address: "1 Main St".to_string(),
            items,
            totals,
            order_notes: None,
            status: OrderStatus::Delivered,
            created_at: test_time(),
            updated_at: test_time(),
        })
        .unwrap();

        assert_eq!(order.delivery_fee(), Money::from_cents(499));
        assert_eq!(order.total(), Money::from_cents(1497));
    }

    #[test]
    fn place_rejects_a_stale_delivery_fee() {
        let items = vec![test_item(499, 2)];
        let totals =
            OrderTotals::with_fee(Money::from_cents(998), Money::from_cents(499)).unwrap();

        let err = Order::place(
            OrderId::new(),
            None,
            test_customer(),
            "1 Main St".to_string(),
            items,
            totals,
            None,
            test_time(),
        )
        .unwrap_err();

        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn set_status_keeps_totals() {
        let items = vec![test_item(100, 1)];
        let totals = OrderTotals::from_items(&items).unwrap();
        let mut order = Order::place(
            OrderId::new(),
            None,
            test_customer(),
            "1 Main St".to_string(),
            items,
            totals,
            Some("ring twice".to_string()),
            test_time(),
        )
        .unwrap();

        order.set_status(OrderStatus::Confirmed, test_time());

        assert_eq!(order.status(), OrderStatus::Confirmed);
        assert_eq!(order.totals(), totals);
        assert_eq!(order.order_notes(), Some("ring twice"));
    }

    #[test]
    fn status_round_trips_through_its_text_form() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
        assert!("shipped".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&OrderStatus::Pending).unwrap();
        assert_eq!(json, "\"pending\"");
    }
}
