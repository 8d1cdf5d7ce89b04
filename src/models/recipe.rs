use crate::error::{CateringError, Result};
use crate::models::normalize_key;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A recipe as stored in the catalog
///
/// `ingredients` maps ingredient name to the quantity used by one batch, in the
/// ingredient's price-list unit. `portions` maps event type to the number of
/// guests one batch serves at that kind of event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(skip)]
    pub name: String,
    pub ingredients: BTreeMap<String, f64>,
    pub portions: BTreeMap<String, f64>,
}

impl Recipe {
    /// Build a validated recipe; every key is normalised
    pub fn new<I, P>(name: &str, ingredients: I, portions: P) -> Result<Self>
    where
        I: IntoIterator<Item = (String, f64)>,
        P: IntoIterator<Item = (String, f64)>,
    {
        let recipe = Self {
            name: normalize_key(name),
            ingredients: ingredients
                .into_iter()
                .map(|(k, v)| (normalize_key(&k), v))
                .collect(),
            portions: portions
                .into_iter()
                .map(|(k, v)| (normalize_key(&k), v))
                .collect(),
        };
        recipe.validate()?;
        Ok(recipe)
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(CateringError::Format("recipe name cannot be empty".to_string()));
        }
        if self.ingredients.is_empty() {
            return Err(CateringError::Format(format!(
                "recipe '{}' has no ingredients",
                self.name
            )));
        }
        for (ingredient, quantity) in &self.ingredients {
            if ingredient.is_empty() || !quantity.is_finite() || *quantity <= 0.0 {
                return Err(CateringError::Format(format!(
                    "recipe '{}': invalid quantity {} for ingredient '{}'",
                    self.name, quantity, ingredient
                )));
            }
        }
        for (event_type, size) in &self.portions {
            if event_type.is_empty() || !size.is_finite() || *size <= 0.0 {
                return Err(CateringError::Format(format!(
                    "recipe '{}': invalid portion size {} for event type '{}'",
                    self.name, size, event_type
                )));
            }
        }
        Ok(())
    }

    /// Guests served by one batch at `event_type`
    pub fn portion_size(&self, event_type: &str) -> Result<f64> {
        self.portions
            .get(&normalize_key(event_type))
            .copied()
            .ok_or_else(|| CateringError::EventTypeNotFound {
                recipe: self.name.clone(),
                event_type: normalize_key(event_type),
            })
    }
}
