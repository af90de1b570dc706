use anyhow::Context;
use orderflow_app::{build_state, demo};
use orderflow_store::app_config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "orderflow_app=debug,orderflow_order=info,orderflow_store=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!(backend = ?config.storage.backend, "Starting orderflow");

    let state = build_state(&config).await?;

    match demo::run(&state).await {
        Ok(order) => {
            tracing::info!(order_id = %order.id, total = ?order.total, "Demo order processed");
            Ok(())
        }
        Err(err) => {
            tracing::error!("Demo failed: {:#}", err);
            Err(err)
        }
    }
}
