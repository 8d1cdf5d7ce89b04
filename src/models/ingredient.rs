use crate::error::{CateringError, Result};
use crate::models::{normalize_key, round_to, Unit};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of the price list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    /// Price per `unit`, two decimal places
    pub price: f64,
    pub unit: Unit,
    pub shop: String,
    pub last_update: NaiveDate,
}

impl Ingredient {
    /// Build a validated record with normalised name and shop
    pub fn new(
        name: &str,
        price: f64,
        unit: Unit,
        shop: &str,
        last_update: NaiveDate,
    ) -> Result<Self> {
        let ingredient = Self {
            name: normalize_key(name),
            price: round_to(price, 2),
            unit,
            shop: normalize_key(shop),
            last_update,
        };
        ingredient.validate()?;
        Ok(ingredient)
    }

    /// Check the record invariants: non-empty name and shop, positive finite price
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CateringError::Format("ingredient name cannot be empty".to_string()));
        }
        if !self.price.is_finite() || self.price <= 0.0 {
            return Err(CateringError::Format(format!(
                "price for '{}' must be positive, got {}",
                self.name, self.price
            )));
        }
        if self.shop.trim().is_empty() {
            return Err(CateringError::Format(format!(
                "shop for '{}' cannot be empty",
                self.name
            )));
        }
        Ok(())
    }

    /// Whole days between the last refresh and `today` (zero if refreshed in the future)
    pub fn age_days(&self, today: NaiveDate) -> i64 {
        (today - self.last_update).num_days().max(0)
    }
}

/// Price and unit reported by a price feed for one ingredient
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceQuote {
    pub price: f64,
    pub unit: Unit,
}

impl PriceQuote {
    /// Validated quote; the price is rounded to two decimals
    pub fn new(price: f64, unit: Unit) -> Result<Self> {
        Ok(Self {
            price: checked_price(price)?,
            unit,
        })
    }
}

/// Reject non-positive or non-finite prices, round the rest to two decimals
pub fn checked_price(price: f64) -> Result<f64> {
    if !price.is_finite() || price <= 0.0 {
        return Err(CateringError::Format(format!(
            "price must be positive, got {}",
            price
        )));
    }
    Ok(round_to(price, 2))
}
