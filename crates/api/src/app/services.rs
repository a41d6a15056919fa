//! Store selection and order-placement wiring.
//!
//! The API runs against one of two store families, chosen at startup:
//! in-memory (dev/tests) or Postgres (`USE_PERSISTENT_STORES=true`).

use std::sync::Arc;

use freshcart_core::{OrderId, UserId};
use freshcart_infra::{
    config::{AppConfig, DatabaseConfig},
    db,
    ledger::{InMemoryInventoryLedger, PostgresInventoryLedger, ProductCatalog},
    orders::{InMemoryOrderRepository, PostgresOrderRepository},
    seed,
};
use freshcart_inventory::StoreError;
use freshcart_orders::{Order, OrderAssembler, OrderRepository, PlaceOrder, PlaceOrderError};

pub type InMemoryAssembler =
    OrderAssembler<Arc<InMemoryInventoryLedger>, Arc<InMemoryOrderRepository>>;
pub type PostgresAssembler =
    OrderAssembler<Arc<PostgresInventoryLedger>, Arc<PostgresOrderRepository>>;

pub enum AppServices {
    InMemory { assembler: InMemoryAssembler },
    Persistent { assembler: PostgresAssembler },
}

impl AppServices {
    pub fn in_memory() -> Self {
        Self::with_in_memory_stores(
            Arc::new(InMemoryInventoryLedger::new()),
            Arc::new(InMemoryOrderRepository::new()),
        )
    }

    /// Wire the assembler over caller-owned in-memory stores.
    pub fn with_in_memory_stores(
        ledger: Arc<InMemoryInventoryLedger>,
        orders: Arc<InMemoryOrderRepository>,
    ) -> Self {
        Self::InMemory {
            assembler: OrderAssembler::new(ledger, orders),
        }
    }

    pub async fn persistent(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = db::connect(&config.url, config.max_connections).await?;
        db::ensure_schema(&pool).await?;

        let ledger = Arc::new(PostgresInventoryLedger::new(pool.clone()));
        let orders = Arc::new(PostgresOrderRepository::new(pool));
        Ok(Self::Persistent {
            assembler: OrderAssembler::new(ledger, orders),
        })
    }

    /// Build the configured store family and seed the demo catalog if asked to.
    pub async fn from_config(config: &AppConfig) -> Result<Self, StoreError> {
        let services = match &config.database {
            Some(database) => {
                tracing::info!("using Postgres stores");
                Self::persistent(database).await?
            }
            None => {
                tracing::info!("using in-memory stores");
                Self::in_memory()
            }
        };

        if config.seed_demo_catalog {
            seed::seed_demo_catalog(services.catalog()).await?;
        }
        Ok(services)
    }

    pub fn catalog(&self) -> &dyn ProductCatalog {
        match self {
            Self::InMemory { assembler } => &**assembler.ledger(),
            Self::Persistent { assembler } => &**assembler.ledger(),
        }
    }

    fn orders(&self) -> &dyn OrderRepository {
        match self {
            Self::InMemory { assembler } => &**assembler.orders(),
            Self::Persistent { assembler } => &**assembler.orders(),
        }
    }

    pub async fn place_order(
        &self,
        request: PlaceOrder,
        acting_user: Option<UserId>,
    ) -> Result<Order, PlaceOrderError> {
        match self {
            Self::InMemory { assembler } => assembler.place_order(request, acting_user).await,
            Self::Persistent { assembler } => assembler.place_order(request, acting_user).await,
        }
    }

    pub async fn find_order(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        self.orders().find_by_id(id).await
    }

    /// The user's orders, newest first.
    pub async fn orders_for_user(&self, user_id: UserId) -> Result<Vec<Order>, StoreError> {
        self.orders().find_by_user(user_id).await
    }
}
