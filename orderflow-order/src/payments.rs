use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};
use orderflow_core::{CoreError, CoreResult, PaymentMethod, PaymentProcessor, PaymentRegistry, PaymentTag};
use orderflow_shared::Money;

/// Resolves the payment method for a tag and charges through it
pub struct RegistryPaymentProcessor {
    registry: Arc<PaymentRegistry>,
}

impl RegistryPaymentProcessor {
    pub fn new(registry: Arc<PaymentRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl PaymentProcessor for RegistryPaymentProcessor {
    async fn process_payment(&self, tag: &PaymentTag, amount: Money) -> CoreResult<()> {
        let method = self.registry.create(tag)?;
        debug!(method = %tag, %amount, "Resolved payment method");
        method.pay(amount).await
    }
}

fn ensure_chargeable(amount: Money) -> CoreResult<()> {
    if amount.is_negative() {
        return Err(CoreError::PaymentFailure(format!(
            "cannot charge negative amount {}",
            amount
        )));
    }
    Ok(())
}

/// Card charge through the Stripe gateway
pub struct CardPayment;

#[async_trait]
impl PaymentMethod for CardPayment {
    async fn pay(&self, amount: Money) -> CoreResult<()> {
        ensure_chargeable(amount)?;
        info!(gateway = "stripe", %amount, "Charging card");
        Ok(())
    }
}

pub struct PaypalPayment;

#[async_trait]
impl PaymentMethod for PaypalPayment {
    async fn pay(&self, amount: Money) -> CoreResult<()> {
        ensure_chargeable(amount)?;
        info!(gateway = "paypal", %amount, "Paying with PayPal");
        Ok(())
    }
}

pub struct CryptoPayment;

#[async_trait]
impl PaymentMethod for CryptoPayment {
    async fn pay(&self, amount: Money) -> CoreResult<()> {
        ensure_chargeable(amount)?;
        info!(gateway = "crypto", %amount, "Transferring crypto");
        Ok(())
    }
}

pub struct ApplePayPayment;

#[async_trait]
impl PaymentMethod for ApplePayPayment {
    async fn pay(&self, amount: Money) -> CoreResult<()> {
        ensure_chargeable(amount)?;
        info!(gateway = "applepay", %amount, "Touch ID payment");
        Ok(())
    }
}

/// Tags with a built-in payment method, in registration order
pub const BUILTIN_METHODS: [PaymentTag; 4] = [
    PaymentTag::Card,
    PaymentTag::Paypal,
    PaymentTag::Crypto,
    PaymentTag::ApplePay,
];

fn builtin_factory(tag: &PaymentTag) -> Option<fn() -> Box<dyn PaymentMethod>> {
    let factory: fn() -> Box<dyn PaymentMethod> = match tag {
        PaymentTag::Card => || Box::new(CardPayment),
        PaymentTag::Paypal => || Box::new(PaypalPayment),
        PaymentTag::Crypto => || Box::new(CryptoPayment),
        PaymentTag::ApplePay => || Box::new(ApplePayPayment),
        PaymentTag::Custom(_) => return None,
    };
    Some(factory)
}

/// Register the built-in implementation for `tag`.
/// Custom tags have no built-in and fail with `UnregisteredCapability`.
pub fn register_builtin(registry: &mut PaymentRegistry, tag: &PaymentTag) -> CoreResult<()> {
    let factory = builtin_factory(tag).ok_or_else(|| CoreError::UnregisteredCapability {
        kind: registry.kind(),
        tag: tag.to_string(),
    })?;
    registry.register(tag.clone(), factory);
    Ok(())
}

pub fn new_registry() -> PaymentRegistry {
    PaymentRegistry::new("payment method")
}

/// Registry holding every built-in payment method
pub fn builtin_registry() -> PaymentRegistry {
    let mut registry = new_registry();
    for tag in &BUILTIN_METHODS {
        if let Some(factory) = builtin_factory(tag) {
            registry.register(tag.clone(), factory);
        }
    }
    registry
}

/// Registry holding only the listed built-in methods
pub fn registry_for(tags: &[PaymentTag]) -> CoreResult<PaymentRegistry> {
    let mut registry = new_registry();
    for tag in tags {
        register_builtin(&mut registry, tag)?;
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Recording(Arc<Mutex<Vec<Money>>>);

    #[async_trait]
    impl PaymentMethod for Recording {
        async fn pay(&self, amount: Money) -> CoreResult<()> {
            self.0.lock().unwrap().push(amount);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_processor_charges_resolved_method() {
        let charges = Arc::new(Mutex::new(Vec::new()));
        let sink = charges.clone();
        let mut registry = new_registry();
        registry.register(PaymentTag::Custom("voucher".into()), move || {
            Box::new(Recording(sink.clone()))
        });

        let processor = RegistryPaymentProcessor::new(Arc::new(registry));
        processor
            .process_payment(&PaymentTag::Custom("voucher".into()), Money::from_minor(13_530))
            .await
            .unwrap();

        assert_eq!(*charges.lock().unwrap(), vec![Money::from_minor(13_530)]);
    }

    #[tokio::test]
    async fn test_processor_rejects_unregistered_tag() {
        let processor = RegistryPaymentProcessor::new(Arc::new(registry_for(&[PaymentTag::Card]).unwrap()));
        let result = processor.process_payment(&PaymentTag::Paypal, Money::from_minor(100)).await;
        assert!(matches!(result, Err(CoreError::UnregisteredCapability { .. })));
    }

    #[tokio::test]
    async fn test_builtin_methods_charge_and_refuse_negative() {
        let registry = builtin_registry();
        assert_eq!(registry.tags(), BUILTIN_METHODS.to_vec());
        assert_eq!(registry_for(&BUILTIN_METHODS).unwrap().tags(), registry.tags());

        for (tag, method) in registry.create_all() {
            assert!(method.pay(Money::from_minor(999)).await.is_ok(), "{tag} should charge");
            let refused = method.pay(Money::from_minor(-1)).await;
            assert!(matches!(refused, Err(CoreError::PaymentFailure(_))), "{tag} should refuse");
        }
    }

    #[test]
    fn test_registry_for_unknown_builtin() {
        let result = registry_for(&[PaymentTag::Card, PaymentTag::Custom("barter".into())]);
        match result {
            Err(CoreError::UnregisteredCapability { tag, .. }) => assert_eq!(tag, "barter"),
            other => panic!("unexpected result: {:?}", other.map(|r| r.tags())),
        }
    }
}
