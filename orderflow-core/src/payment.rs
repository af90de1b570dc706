use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use orderflow_shared::Money;
use crate::registry::CapabilityRegistry;
use crate::CoreResult;

/// Payment method chosen by the customer.
///
/// The known methods are named variants; anything else parses into `Custom`
/// and is resolved through the payment registry like the rest.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentTag {
    Card,
    Paypal,
    Crypto,
    ApplePay,
    Custom(String),
}

impl PaymentTag {
    pub fn as_str(&self) -> &str {
        match self {
            PaymentTag::Card => "card",
            PaymentTag::Paypal => "paypal",
            PaymentTag::Crypto => "crypto",
            PaymentTag::ApplePay => "applepay",
            PaymentTag::Custom(tag) => tag,
        }
    }
}

impl From<&str> for PaymentTag {
    fn from(tag: &str) -> Self {
        match tag {
            "card" => PaymentTag::Card,
            "paypal" => PaymentTag::Paypal,
            "crypto" => PaymentTag::Crypto,
            "applepay" => PaymentTag::ApplePay,
            other => PaymentTag::Custom(other.to_string()),
        }
    }
}

impl From<String> for PaymentTag {
    fn from(tag: String) -> Self {
        PaymentTag::from(tag.as_str())
    }
}

impl From<PaymentTag> for String {
    fn from(tag: PaymentTag) -> Self {
        tag.as_str().to_string()
    }
}

impl FromStr for PaymentTag {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(PaymentTag::from(s))
    }
}

impl fmt::Display for PaymentTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One way of moving money (card gateway, wallet, ...)
#[async_trait]
pub trait PaymentMethod: Send + Sync {
    /// Charge `amount`. Fails with `CoreError::PaymentFailure` when the charge is rejected.
    async fn pay(&self, amount: Money) -> CoreResult<()>;
}

/// Charges an amount through whichever method a tag selects
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    async fn process_payment(&self, tag: &PaymentTag, amount: Money) -> CoreResult<()>;
}

pub type PaymentRegistry = CapabilityRegistry<PaymentTag, dyn PaymentMethod>;
