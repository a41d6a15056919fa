use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use freshcart_core::{OrderId, UserId};
use freshcart_inventory::StoreError;
use freshcart_orders::{Order, OrderRepository, OrderStatus};

/// In-memory order store.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryOrderRepository {
    orders: RwLock<HashMap<OrderId, Order>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn matching(&self, pred: impl Fn(&Order) -> bool) -> Result<Vec<Order>, StoreError> {
        let orders = self
            .orders
            .read()
            .map_err(|_| StoreError::backend("lock poisoned"))?;
        let mut found: Vec<Order> = orders.values().filter(|o| pred(o)).cloned().collect();
        // Newest first; UUIDv7 ids break ties in creation order.
        found.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id_typed().as_uuid().cmp(a.id_typed().as_uuid()))
        });
        Ok(found)
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn create(&self, order: &Order) -> Result<(), StoreError> {
        let mut orders = self
            .orders
            .write()
            .map_err(|_| StoreError::backend("lock poisoned"))?;
        if orders.contains_key(&order.id_typed()) {
            return Err(StoreError::conflict(format!(
                "order {} already exists",
                order.id_typed()
            )));
        }
        orders.insert(order.id_typed(), order.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        let orders = self
            .orders
            .read()
            .map_err(|_| StoreError::backend("lock poisoned"))?;
        Ok(orders.get(&id).cloned())
    }

    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Order>, StoreError> {
        self.matching(|o| o.user_id() == Some(user_id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Vec<Order>, StoreError> {
        self.matching(|o| o.customer().email == email)
    }

    async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let mut orders = self
            .orders
            .write()
            .map_err(|_| StoreError::backend("lock poisoned"))?;
        match orders.get_mut(&id) {
            Some(order) => {
                order.set_status(status, now);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
