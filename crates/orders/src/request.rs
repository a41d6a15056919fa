//! Checkout input and its validation.

use crate::error::PlaceOrderError;
use crate::order::CustomerInfo;

/// One cart entry as submitted by the client.
///
/// `product_id` stays a raw string so that an unknown or malformed id can be
/// echoed back in a "not found" error. `quantity` is signed so that zero and
/// negative values reach validation instead of failing to decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub product_id: String,
    pub quantity: i64,
}

/// A checkout submission.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlaceOrder {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub delivery_address: String,
    pub items: Vec<CartItem>,
    pub order_notes: Option<String>,
}

/// A cart entry whose quantity has been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub product_id: String,
    pub quantity: u32,
}

/// A checkout submission that passed validation; safe to start reserving stock for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCart {
    pub customer: CustomerInfo,
    pub delivery_address: String,
    pub lines: Vec<CartLine>,
    pub order_notes: Option<String>,
}

fn required(field: &str, value: String) -> Result<String, PlaceOrderError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PlaceOrderError::validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

impl PlaceOrder {
    /// Check presence of every customer field and a non-empty cart of positive
    /// quantities. Touches no store.
    pub fn validate(self) -> Result<ValidatedCart, PlaceOrderError> {
        let customer = CustomerInfo {
            name: required("customer_name", self.customer_name)?,
            email: required("customer_email", self.customer_email)?,
            phone: required("customer_phone", self.customer_phone)?,
        };
        let delivery_address = required("delivery_address", self.delivery_address)?;

        if self.items.is_empty() {
            return Err(PlaceOrderError::validation("cart must not be empty"));
        }

        let lines = self
            .items
            .into_iter()
            .enumerate()
            .map(|(idx, item)| {
                let quantity = u32::try_from(item.quantity)
                    .ok()
                    .filter(|q| *q > 0)
                    .ok_or_else(|| {
                        PlaceOrderError::validation(format!(
                            "items[{idx}].quantity must be a positive integer"
                        ))
                    })?;
                Ok(CartLine {
                    product_id: item.product_id,
                    quantity,
                })
            })
            .collect::<Result<Vec<_>, PlaceOrderError>>()?;

        let order_notes = self
            .order_notes
            .map(|notes| notes.trim().to_string())
            .filter(|notes| !notes.is_empty());

        Ok(ValidatedCart {
            customer,
            delivery_address,
            lines,
            order_notes,
        })
    }
}
