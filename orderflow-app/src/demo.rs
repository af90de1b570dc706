use anyhow::Context;
use tracing::info;
use uuid::Uuid;
use orderflow_core::{Channel, LineItem, Order, PaymentTag};
use orderflow_shared::Money;
use crate::state::AppState;

pub fn sample_order() -> Order {
    Order::new(
        format!("ORD-{}", Uuid::new_v4().simple()),
        "alice@example.com",
        vec![
            LineItem::new("AAA", 2, Money::from_minor(2500)),
            LineItem::new("BBB", 1, Money::from_minor(6000)),
        ],
        PaymentTag::Card,
    )
}

/// Process the sample order, list what the store holds, then greet a
/// customer directly over each registered channel.
pub async fn run(state: &AppState) -> anyhow::Result<Order> {
    let mut order = sample_order();
    state
        .orchestrator
        .process(&mut order)
        .await
        .with_context(|| format!("Processing {} failed", order.id))?;

    for stored in state.repository.find_all().await? {
        let json = serde_json::to_string(&stored)?;
        info!(order = %json, "Stored order");
    }

    for channel in &state.channels {
        let recipient = match channel {
            Channel::Email => "bob@example.com",
            Channel::Sms => "+1234567890",
            Channel::Custom(_) => continue,
        };
        state
            .notifications
            .send_notification(channel, recipient, "Hi Bob!")
            .await?;
    }

    Ok(order)
}
