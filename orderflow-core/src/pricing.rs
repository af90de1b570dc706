use orderflow_shared::Money;
use crate::order::Order;

/// Turns an order into the amount to charge.
///
/// Implementations are pure: no side effects and the order is left untouched.
pub trait PricingStrategy: Send + Sync {
    fn calculate(&self, order: &Order) -> Money;
}
