use std::sync::Arc;
use tracing::{debug, info};
use orderflow_core::{
    Channel, CoreResult, NotificationService, Order, OrderRepository, PaymentProcessor,
    PricingStrategy,
};
use orderflow_shared::{Masked, Money};

/// Runs one order through pricing, payment, persistence and notification.
///
/// Steps run strictly in that order and the first failure is returned as-is.
/// Nothing is compensated: a payment taken before a failed save stays taken.
pub struct OrderOrchestrator {
    pricing: Arc<dyn PricingStrategy>,
    payments: Arc<dyn PaymentProcessor>,
    repository: Arc<dyn OrderRepository>,
    notifications: Arc<dyn NotificationService>,
}

impl OrderOrchestrator {
    pub fn new(
        pricing: Arc<dyn PricingStrategy>,
        payments: Arc<dyn PaymentProcessor>,
        repository: Arc<dyn OrderRepository>,
        notifications: Arc<dyn NotificationService>,
    ) -> Self {
        Self {
            pricing,
            payments,
            repository,
            notifications,
        }
    }

    /// Process an order end to end. The computed total is attached to `order`.
    ///
    /// Returns `Ok(true)` once all four steps have completed.
    pub async fn process(&self, order: &mut Order) -> CoreResult<bool> {
        info!(order_id = %order.id, items = order.items.len(), "Processing order");

        let total = self.pricing.calculate(order);
        order.total = Some(total);
        debug!(order_id = %order.id, %total, "Order priced");

        self.payments
            .process_payment(&order.payment_method, total)
            .await?;
        debug!(order_id = %order.id, method = %order.payment_method, "Payment taken");

        self.repository.save(order).await?;
        debug!(order_id = %order.id, "Order saved");

        let channel = Channel::for_recipient(&order.customer_contact);
        let message = confirmation_message(&order.id, total);
        self.notifications
            .send_notification(&channel, &order.customer_contact, &message)
            .await?;

        info!(
            order_id = %order.id,
            %total,
            %channel,
            customer = %Masked(&order.customer_contact),
            "Order processed"
        );
        Ok(true)
    }
}

pub fn confirmation_message(order_id: &str, total: Money) -> String {
    format!("Thanks for your order {}! Total: {}", order_id, total)
}
