//! Order pricing rules.

use freshcart_core::Money;

use crate::order::OrderLineItem;

/// Flat delivery charge added to every order (5.99).
pub const DELIVERY_FEE: Money = Money::from_cents(599);

/// Subtotal, delivery fee and grand total of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    pub subtotal: Money,
    pub delivery_fee: Money,
    pub total: Money,
}

impl OrderTotals {
    /// Apply the delivery fee to an already-summed subtotal.
    ///
    /// Returns `None` only if the grand total overflows.
    pub fn from_subtotal(subtotal: Money) -> Option<Self> {
        Self::with_fee(subtotal, DELIVERY_FEE)
    }

    /// Totals for an explicit fee, e.g. the one recorded on a stored order.
    pub fn with_fee(subtotal: Money, delivery_fee: Money) -> Option<Self> {
        let total = subtotal.checked_add(delivery_fee)?;
        Some(Self {
            subtotal,
            delivery_fee,
            total,
        })
    }

    /// Price a list of line items: `Σ price × quantity`, plus delivery.
    pub fn from_items(items: &[OrderLineItem]) -> Option<Self> {
        Self::from_subtotal(subtotal_of(items)?)
    }
}

/// `Σ price × quantity`, or `None` on overflow.
pub fn subtotal_of(items: &[OrderLineItem]) -> Option<Money> {
    items
        .iter()
        .try_fold(Money::ZERO, |acc, item| acc.checked_add(item.line_total()?))
}
