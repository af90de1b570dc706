pub mod payments;
pub mod notifications;
pub mod orchestrator;

pub use payments::RegistryPaymentProcessor;
pub use notifications::RegistryNotificationService;
pub use orchestrator::{confirmation_message, OrderOrchestrator};
