use async_trait::async_trait;
use crate::order::Order;
use crate::CoreResult;

/// Durable storage for processed orders
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Store the order, replacing any order already saved under the same id.
    /// Fails with `CoreError::PersistenceFailure`.
    async fn save(&self, order: &Order) -> CoreResult<()>;

    async fn find_by_id(&self, id: &str) -> CoreResult<Option<Order>>;

    async fn find_all(&self) -> CoreResult<Vec<Order>>;
}
