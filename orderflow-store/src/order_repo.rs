use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::PgPool;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};
use orderflow_core::{CoreError, CoreResult, LineItem, Order, OrderRepository, PaymentTag};
use orderflow_shared::Money;

/// Process-local repository, mostly for demos and tests.
/// `find_all` returns orders in the order they were first saved.
#[derive(Default)]
pub struct InMemoryOrderRepository {
    orders: RwLock<Vec<Order>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn save(&self, order: &Order) -> CoreResult<()> {
        let mut orders = self.orders.write().await;
        match orders.iter_mut().find(|o| o.id == order.id) {
            Some(existing) => *existing = order.clone(),
            None => orders.push(order.clone()),
        }
        debug!(order_id = %order.id, "Order stored in memory");
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> CoreResult<Option<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.iter().find(|o| o.id == id).cloned())
    }

    async fn find_all(&self) -> CoreResult<Vec<Order>> {
        Ok(self.orders.read().await.clone())
    }
}

/// Postgres-backed repository; line items live in a JSONB column
pub struct PgOrderRepository {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: String,
    customer_contact: String,
    payment_method: String,
    total_minor: Option<i64>,
    items: Json<Vec<LineItem>>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Order {
            id: row.id,
            customer_contact: row.customer_contact,
            items: row.items.0,
            payment_method: PaymentTag::from(row.payment_method),
            total: row.total_minor.map(Money::from_minor),
        }
    }
}

fn persistence(err: sqlx::Error) -> CoreError {
    CoreError::PersistenceFailure(err.to_string())
}

impl PgOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(connection_string: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(connection_string)
            .await?;

        Ok(Self::new(pool))
    }

    /// Create or upgrade the `orders` table
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        info!("Running order store migrations");
        sqlx::migrate!("../migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn save(&self, order: &Order) -> CoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO orders (id, customer_contact, payment_method, total_minor, items)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE SET
                customer_contact = EXCLUDED.customer_contact,
                payment_method = EXCLUDED.payment_method,
                total_minor = EXCLUDED.total_minor,
                items = EXCLUDED.items,
                updated_at = NOW()
            "#,
        )
        .bind(&order.id)
        .bind(&order.customer_contact)
        .bind(order.payment_method.as_str())
        .bind(order.total.map(Money::minor))
        .bind(Json(&order.items))
        .execute(&self.pool)
        .await
        .map_err(persistence)?;

        debug!(order_id = %order.id, "Order stored in Postgres");
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> CoreResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(
            "SELECT id, customer_contact, payment_method, total_minor, items FROM orders WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(persistence)?;

        Ok(row.map(Order::from))
    }

    async fn find_all(&self) -> CoreResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(
            "SELECT id, customer_contact, payment_method, total_minor, items FROM orders ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(persistence)?;

        Ok(rows.into_iter().map(Order::from).collect())
    }
}
