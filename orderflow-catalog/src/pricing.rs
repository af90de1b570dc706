use serde::{Deserialize, Serialize};
use orderflow_core::{Order, PricingStrategy};
use orderflow_shared::Money;

/// Tax and shipping rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Tax rate in basis points (2300 = 23%)
    pub tax_rate_bps: u32,

    /// Flat shipping surcharge
    pub shipping_fee: Money,

    /// Subtotals strictly above this ship for free
    pub free_shipping_threshold: Money,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            tax_rate_bps: 2300,
            shipping_fee: Money::from_minor(999),
            free_shipping_threshold: Money::from_minor(10_000),
        }
    }
}

impl PricingConfig {
    /// Build from decimal settings as they appear in configuration files
    /// (`tax_rate = 0.23`, `shipping_fee = 9.99`).
    pub fn from_rates(tax_rate: f64, shipping_fee: f64, free_shipping_threshold: f64) -> Self {
        Self {
            tax_rate_bps: (tax_rate * 10_000.0).round().max(0.0) as u32,
            shipping_fee: Money::from_major(shipping_fee),
            free_shipping_threshold: Money::from_major(free_shipping_threshold),
        }
    }
}

/// Every component of a computed total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub subtotal: Money,
    pub tax: Money,
    pub shipping: Money,
    pub total: Money,
}

/// Subtotal plus tax plus shipping, with free shipping above a threshold
#[derive(Debug, Clone, Default)]
pub struct StandardPricing {
    config: PricingConfig,
}

impl StandardPricing {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    pub fn breakdown(&self, order: &Order) -> PriceBreakdown {
        let subtotal = order.subtotal();
        let tax = subtotal.apply_rate_bps(self.config.tax_rate_bps);
        let shipping = if subtotal > self.config.free_shipping_threshold {
            Money::ZERO
        } else {
            self.config.shipping_fee
        };

        PriceBreakdown {
            subtotal,
            tax,
            shipping,
            total: subtotal + tax + shipping,
        }
    }
}

impl PricingStrategy for StandardPricing {
    fn calculate(&self, order: &Order) -> Money {
        self.breakdown(order).total
    }
}
