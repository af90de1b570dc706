pub mod app_config;
pub mod order_repo;

pub use order_repo::{InMemoryOrderRepository, PgOrderRepository};
