use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use heladeria_core::{Category, DomainError, DomainResult, OrderId};

/// One historical order line (immutable once appended to the history).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: OrderId,
    pub date: DateTime<Utc>,
    pub flavor: String,
    pub container: String,
    /// Topping names, in the order they were picked.
    pub toppings: Vec<String>,
    pub quantity: u32,
    pub total: Decimal,
}

/// Source of unit prices for quoting an order.
pub trait PriceLookup {
    fn unit_price(&self, category: Category, key: &str) -> Option<Decimal>;
}

/// An order being composed, before it is priced and placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub flavor: String,
    pub container: String,
    pub toppings: Vec<String>,
    pub quantity: u32,
}

impl OrderDraft {
    pub fn new(flavor: impl Into<String>, container: impl Into<String>) -> Self {
        Self {
            flavor: flavor.into(),
            container: container.into(),
            toppings: Vec::new(),
            quantity: 1,
        }
    }

    pub fn with_topping(mut self, topping: impl Into<String>) -> Self {
        self.toppings.push(topping.into());
        self
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    fn validate(&self) -> DomainResult<()> {
        if self.flavor.trim().is_empty() || self.container.trim().is_empty() {
            return Err(DomainError::validation(
                "an order needs a flavor and a container",
            ));
        }
        if self.quantity == 0 {
            return Err(DomainError::validation("quantity must be at least 1"));
        }
        Ok(())
    }

    /// Price the draft: (flavor + container + toppings) × quantity, rounded
    /// to cents. A total outside `Decimal`'s range is a validation error.
    pub fn quote(&self, prices: &impl PriceLookup) -> DomainResult<Decimal> {
        self.validate()?;

        let price_of = |category: Category, key: &str| {
            prices
                .unit_price(category, key)
                .ok_or_else(|| DomainError::not_found(format!("{category}/{key}")))
        };
        let overflow = || DomainError::validation("order total is out of range");

        let mut unit = price_of(Category::Flavor, &self.flavor)?;
        unit = unit
            .checked_add(price_of(Category::Container, &self.container)?)
            .ok_or_else(overflow)?;
        for topping in &self.toppings {
            unit = unit
                .checked_add(price_of(Category::Topping, topping)?)
                .ok_or_else(overflow)?;
        }

        let total = unit
            .checked_mul(Decimal::from(self.quantity))
            .ok_or_else(overflow)?;
        Ok(total.round_dp(2))
    }

    /// Freeze the draft into a history record.
    pub fn into_record(self, total: Decimal, date: DateTime<Utc>) -> OrderRecord {
        OrderRecord {
            id: OrderId::new(),
            date,
            flavor: self.flavor,
            container: self.container,
            toppings: self.toppings,
            quantity: self.quantity,
            total,
        }
    }
}
