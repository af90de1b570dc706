pub mod order;
pub mod registry;
pub mod pricing;
pub mod payment;
pub mod notification;
pub mod repository;

pub use order::{LineItem, Order};
pub use registry::CapabilityRegistry;
pub use pricing::PricingStrategy;
pub use payment::{PaymentMethod, PaymentProcessor, PaymentRegistry, PaymentTag};
pub use notification::{Channel, NotificationService, Notifier, NotifierRegistry};
pub use repository::OrderRepository;

pub use orderflow_shared::Money;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("No {kind} registered for tag: {tag}")]
    UnregisteredCapability { kind: &'static str, tag: String },
    #[error("Payment failed: {0}")]
    PaymentFailure(String),
    #[error("Persistence failed: {0}")]
    PersistenceFailure(String),
    #[error("Notification failed: {0}")]
    NotificationFailure(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
