use anyhow::Context;
use std::sync::Arc;
use tracing::info;
use orderflow_catalog::{PricingConfig, StandardPricing};
use orderflow_core::{
    Channel, NotificationService, NotifierRegistry, OrderRepository, PaymentRegistry, PaymentTag,
};
use orderflow_order::{notifications, payments, OrderOrchestrator};
use orderflow_order::{RegistryNotificationService, RegistryPaymentProcessor};
use orderflow_store::app_config::{Config, StorageBackend, StorageConfig};
use orderflow_store::{InMemoryOrderRepository, PgOrderRepository};

/// Everything the process needs once startup is done.
/// Registries are frozen at this point; only lookups remain.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<OrderOrchestrator>,
    pub repository: Arc<dyn OrderRepository>,
    pub notifications: Arc<dyn NotificationService>,
    pub payment_methods: Vec<PaymentTag>,
    pub channels: Vec<Channel>,
}

/// Wire the pipeline from configuration, connecting to storage as configured
pub async fn build_state(config: &Config) -> anyhow::Result<AppState> {
    let repository = connect_repository(&config.storage).await?;
    build_state_with_repository(config, repository)
}

/// Wire the pipeline from configuration around an existing repository
pub fn build_state_with_repository(
    config: &Config,
    repository: Arc<dyn OrderRepository>,
) -> anyhow::Result<AppState> {
    let pricing = PricingConfig::from_rates(
        config.pricing.tax_rate,
        config.pricing.shipping_fee,
        config.pricing.free_shipping_threshold,
    );
    let payment_registry = payments::registry_for(&config.payments.enabled)
        .context("Invalid [payments] configuration")?;
    let notifier_registry = notifications::registry_for(&config.notifications.enabled)
        .context("Invalid [notifications] configuration")?;

    Ok(assemble(pricing, payment_registry, notifier_registry, repository))
}

/// Compose the orchestrator from fully populated registries
pub fn assemble(
    pricing: PricingConfig,
    payment_registry: PaymentRegistry,
    notifier_registry: NotifierRegistry,
    repository: Arc<dyn OrderRepository>,
) -> AppState {
    info!(
        payment_methods = ?payment_registry.tags(),
        channels = ?notifier_registry.tags(),
        tax_rate_bps = pricing.tax_rate_bps,
        "Registries ready"
    );

    let payment_methods = payment_registry.tags();
    let channels = notifier_registry.tags();
    let notifications: Arc<dyn NotificationService> =
        Arc::new(RegistryNotificationService::new(Arc::new(notifier_registry)));

    let orchestrator = OrderOrchestrator::new(
        Arc::new(StandardPricing::new(pricing)),
        Arc::new(RegistryPaymentProcessor::new(Arc::new(payment_registry))),
        repository.clone(),
        notifications.clone(),
    );

    AppState {
        orchestrator: Arc::new(orchestrator),
        repository,
        notifications,
        payment_methods,
        channels,
    }
}

async fn connect_repository(storage: &StorageConfig) -> anyhow::Result<Arc<dyn OrderRepository>> {
    match storage.backend {
        StorageBackend::Memory => {
            info!("Using in-memory order store");
            Ok(Arc::new(InMemoryOrderRepository::new()))
        }
        StorageBackend::Postgres => {
            let url = storage
                .database_url
                .as_deref()
                .context("storage.database_url is required for the postgres backend")?;
            let repo = PgOrderRepository::connect(url, storage.max_connections)
                .await
                .context("Failed to connect to Postgres")?;
            repo.migrate().await.context("Failed to run migrations")?;
            info!("Using Postgres order store");
            Ok(Arc::new(repo))
        }
    }
}
