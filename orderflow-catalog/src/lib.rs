pub mod pricing;

pub use pricing::{PriceBreakdown, PricingConfig, StandardPricing};
