use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use freshcart_core::Money;
use freshcart_orders::{CartItem, Order, OrderLineItem, OrderStatus, PlaceOrder};

#[derive(Debug, Deserialize)]
pub struct CartItemRequest {
    pub product_id: String,
    pub quantity: i64,
}

/// `POST /orders` body. Absent fields decode as empty so that validation can
/// name the missing one.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PlaceOrderRequest {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub delivery_address: String,
    pub items: Vec<CartItemRequest>,
    pub order_notes: Option<String>,
}

impl From<PlaceOrderRequest> for PlaceOrder {
    fn from(req: PlaceOrderRequest) -> Self {
        PlaceOrder {
            customer_name: req.customer_name,
            customer_email: req.customer_email,
            customer_phone: req.customer_phone,
            delivery_address: req.delivery_address,
            items: req
                .items
                .into_iter()
                .map(|item| CartItem {
                    product_id: item.product_id,
                    quantity: item.quantity,
                })
                .collect(),
            order_notes: req.order_notes,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PlacedOrderSummary {
    pub id: String,
    pub total: Money,
    pub status: OrderStatus,
}

#[derive(Debug, Serialize)]
pub struct OrderPlacedResponse {
    pub message: &'static str,
    pub order: PlacedOrderSummary,
}

impl From<&Order> for OrderPlacedResponse {
    fn from(order: &Order) -> Self {
        Self {
            message: "Order placed successfully",
            order: PlacedOrderSummary {
                id: order.id_typed().to_string(),
                total: order.total(),
                status: order.status(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub user_id: Option<String>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub delivery_address: String,
    pub items: Vec<OrderLineItem>,
    pub subtotal: Money,
    pub delivery_fee: Money,
    pub total: Money,
    pub order_notes: Option<String>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Order> for OrderResponse {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id_typed().to_string(),
            user_id: order.user_id().map(|id| id.to_string()),
            customer_name: order.customer().name.clone(),
            customer_email: order.customer().email.clone(),
            customer_phone: order.customer().phone.clone(),
            delivery_address: order.delivery_address().to_string(),
            items: order.items().to_vec(),
            subtotal: order.subtotal(),
            delivery_fee: order.delivery_fee(),
            total: order.total(),
            order_notes: order.order_notes().map(str::to_string),
            status: order.status(),
            created_at: order.created_at(),
            updated_at: order.updated_at(),
        }
    }
}
