//! Event planning pipeline
//!
//! ```text
//! request → estimate → apply overrides → build list → total cost
//!                                            ↑
//!                         recipe book + ingredient table (snapshot)
//! ```
//!
//! Every stage is a pure function over the snapshot handed to [`Planner::plan`],
//! so the same inputs always produce the same plan.

pub mod cost;
pub mod estimator;
pub mod overrides;
pub mod rounding;
pub mod shopping;

pub use cost::{recipe_batch_cost, total_cost};
pub use estimator::{estimate, Multipliers, RecipeMultiplier};
pub use overrides::{apply_overrides, parse_overrides, Override};
pub use rounding::{RoundingPolicy, RoundingRule};
pub use shopping::{build_list, Attribution, ShoppingLineItem};

use crate::error::{CateringError, Result};
use crate::models::normalize_key;
use crate::store::{IngredientTable, RecipeBook};
use chrono::NaiveDate;
use tracing::{debug, info, warn};

/// What the caterer asked for
#[derive(Debug, Clone, PartialEq)]
pub struct EventRequest {
    pub guest_count: u32,
    pub event_type: String,
    /// Normalised, de-duplicated, in the order given
    pub recipes: Vec<String>,
}

impl EventRequest {
    pub fn new<S: AsRef<str>>(guest_count: u32, event_type: &str, recipes: &[S]) -> Result<Self> {
        if guest_count == 0 {
            return Err(CateringError::Format(
                "guest count must be a positive integer".to_string(),
            ));
        }
        let event_type = normalize_key(event_type);
        if event_type.is_empty() {
            return Err(CateringError::Format("event type cannot be empty".to_string()));
        }

        let mut names: Vec<String> = Vec::with_capacity(recipes.len());
        for recipe in recipes {
            let name = normalize_key(recipe.as_ref());
            if !name.is_empty() && !names.contains(&name) {
                names.push(name);
            }
        }
        if names.is_empty() {
            return Err(CateringError::Format("at least one recipe is required".to_string()));
        }

        Ok(Self {
            guest_count,
            event_type,
            recipes: names,
        })
    }

    /// Split a comma-separated list of dishes
    pub fn parse_recipe_list(text: &str) -> Vec<String> {
        text.split(',')
            .map(normalize_key)
            .filter(|name| !name.is_empty())
            .collect()
    }
}

/// Price data older than the configured threshold
#[derive(Debug, Clone, PartialEq)]
pub struct StaleDataWarning {
    pub ingredient: String,
    pub last_update: NaiveDate,
    pub age_days: i64,
}

/// Result of planning one event
#[derive(Debug, Clone, PartialEq)]
pub struct EventPlan {
    /// Multipliers as estimated from guest count
    pub estimated: Multipliers,
    /// Multipliers after overrides, used for the list
    pub multipliers: Multipliers,
    pub lines: Vec<ShoppingLineItem>,
    pub total: f64,
    pub warnings: Vec<StaleDataWarning>,
}

/// Runs the pipeline with a fixed rounding policy and staleness threshold
#[derive(Debug, Clone)]
pub struct Planner {
    policy: RoundingPolicy,
    stale_after_days: i64,
}

impl Planner {
    pub fn new(policy: RoundingPolicy, stale_after_days: i64) -> Self {
        Self {
            policy,
            stale_after_days,
        }
    }

    pub fn policy(&self) -> &RoundingPolicy {
        &self.policy
    }

    /// Estimate multipliers only, for showing before overrides are chosen
    pub fn estimate(&self, request: &EventRequest, book: &RecipeBook) -> Result<Multipliers> {
        estimate(
            &request.recipes,
            &request.event_type,
            request.guest_count,
            book,
        )
    }

    /// Plan an event against one snapshot of both datasets
    pub fn plan(
        &self,
        request: &EventRequest,
        book: &RecipeBook,
        table: &IngredientTable,
        overrides: &[Override],
        today: NaiveDate,
    ) -> Result<EventPlan> {
        let estimated = self.estimate(request, book)?;
        debug!(multipliers = %estimated, "Estimated recipe multipliers");

        let multipliers = apply_overrides(&estimated, overrides)?;
        if !overrides.is_empty() {
            debug!(multipliers = %multipliers, "Applied user overrides");
        }

        let lines = build_list(&multipliers, book, table, &self.policy)?;
        let total = total_cost(&lines);
        let warnings = stale_warnings(&lines, table, today, self.stale_after_days);
        for warning in &warnings {
            warn!(
                ingredient = %warning.ingredient,
                last_update = %warning.last_update,
                age_days = warning.age_days,
                "Price data is stale"
            );
        }

        info!(
            guests = request.guest_count,
            event_type = %request.event_type,
            lines = lines.len(),
            total,
            "Event planned"
        );

        Ok(EventPlan {
            estimated,
            multipliers,
            lines,
            total,
            warnings,
        })
    }
}

impl Default for Planner {
    fn default() -> Self {
        Self::new(RoundingPolicy::standard(), 7)
    }
}

/// Listed ingredients whose last update is more than `stale_after_days` old
pub fn stale_warnings(
    lines: &[ShoppingLineItem],
    table: &IngredientTable,
    today: NaiveDate,
    stale_after_days: i64,
) -> Vec<StaleDataWarning> {
    lines
        .iter()
        .filter_map(|line| table.get(&line.ingredient))
        .filter_map(|row| {
            let age_days = row.age_days(today);
            (age_days > stale_after_days).then(|| StaleDataWarning {
                ingredient: row.name.clone(),
                last_update: row.last_update,
                age_days,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Ingredient, Recipe, Unit};

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn book() -> RecipeBook {
        RecipeBook::new(vec![Recipe::new(
            "hummus",
            [("chickpeas".to_string(), 0.5), ("tahini".to_string(), 0.1)],
            [("buffet".to_string(), 10.0)],
        )
        .unwrap()])
    }

    fn table() -> IngredientTable {
        IngredientTable::new(vec![
            Ingredient::new("chickpeas", 1.5, Unit::Kg, "aldi", date(9, 1)).unwrap(),
            Ingredient::new("tahini", 3.0, Unit::Whole, "yasar halim", date(8, 1)).unwrap(),
        ])
    }

    #[test]
    fn test_request_normalizes_and_dedupes() {
        let request = EventRequest::new(40, " Buffet", &["Hummus", "hummus ", "Schug"]).unwrap();
        assert_eq!(request.event_type, "buffet");
        assert_eq!(request.recipes, vec!["hummus", "schug"]);
    }

    #[test]
    fn test_request_validation() {
        assert!(EventRequest::new(0, "buffet", &["hummus"]).is_err());
        assert!(EventRequest::new(10, " ", &["hummus"]).is_err());
        assert!(EventRequest::new(10, "buffet", &[" "]).is_err());
    }

    #[test]
    fn test_parse_recipe_list() {
        assert_eq!(
            EventRequest::parse_recipe_list("hummus, Schug,,moroccan carrots "),
            vec!["hummus", "schug", "moroccan carrots"]
        );
    }

    #[test]
    fn test_plan_reports_stale_rows_only() {
        let request = EventRequest::new(40, "buffet", &["hummus"]).unwrap();
        let plan = Planner::new(RoundingPolicy::standard(), 7)
            .plan(&request, &book(), &table(), &[], date(9, 5))
            .unwrap();

        assert_eq!(plan.warnings.len(), 1);
        assert_eq!(plan.warnings[0].ingredient, "tahini");
        assert_eq!(plan.warnings[0].age_days, 35);
    }

    #[test]
    fn test_plan_keeps_estimate_next_to_overridden_multipliers() {
        let request = EventRequest::new(40, "buffet", &["hummus"]).unwrap();
        let overrides = parse_overrides("hummus: 2").unwrap();
        let plan = Planner::default()
            .plan(&request, &book(), &table(), &overrides, date(9, 1))
            .unwrap();

        assert_eq!(plan.estimated.get("hummus"), Some(4.0));
        assert_eq!(plan.multipliers.get("hummus"), Some(2.0));
    }
}
