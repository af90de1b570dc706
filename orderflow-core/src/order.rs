use serde::{Deserialize, Serialize};
use orderflow_shared::Money;
use crate::payment::PaymentTag;

/// A customer's purchase as handed to the pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    /// Email address or phone number; decides the confirmation channel
    pub customer_contact: String,
    pub items: Vec<LineItem>,
    pub payment_method: PaymentTag,
    /// Absent until pricing has run
    #[serde(default)]
    pub total: Option<Money>,
}

impl Order {
    pub fn new(
        id: impl Into<String>,
        customer_contact: impl Into<String>,
        items: Vec<LineItem>,
        payment_method: PaymentTag,
    ) -> Self {
        Self {
            id: id.into(),
            customer_contact: customer_contact.into(),
            items,
            payment_method,
            total: None,
        }
    }

    /// Sum of quantity x unit price over all items
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(LineItem::line_total).sum()
    }
}

/// One ordered SKU
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    sku: String,
    quantity: u32,
    unit_price: Money,
}

impl LineItem {
    pub fn new(sku: impl Into<String>, quantity: u32, unit_price: Money) -> Self {
        Self {
            sku: sku.into(),
            quantity,
            unit_price,
        }
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn line_total(&self) -> Money {
        self.unit_price.times(self.quantity)
    }
}
