//! Order persistence contract.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use freshcart_core::{OrderId, UserId};
use freshcart_inventory::StoreError;

use crate::order::{Order, OrderStatus};

/// Durable storage for placed orders.
///
/// Orders are written once by checkout; afterwards only `status` (and
/// `updated_at`) may change.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persist a newly placed order. A duplicate id is a [`StoreError::Conflict`].
    async fn create(&self, order: &Order) -> Result<(), StoreError>;

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, StoreError>;

    /// Orders placed by `user_id`, newest first.
    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Order>, StoreError>;

    /// Orders placed with `email` as the customer address, newest first.
    async fn find_by_email(&self, email: &str) -> Result<Vec<Order>, StoreError>;

    /// Returns `false` when no order has that id.
    async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError>;
}

#[async_trait]
impl<R> OrderRepository for Arc<R>
where
    R: OrderRepository + ?Sized,
{
    async fn create(&self, order: &Order) -> Result<(), StoreError> {
        (**self).create(order).await
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        (**self).find_by_id(id).await
    }

    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Order>, StoreError> {
        (**self).find_by_user(user_id).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Vec<Order>, StoreError> {
        (**self).find_by_email(email).await
    }

    async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        (**self).update_status(id, status, now).await
    }
}
