//! Dataset checks run before planning
//!
//! The planner fails closed on the first unpriced ingredient it meets; the
//! audit reports every problem in both datasets at once so they can be fixed
//! in one pass.

use crate::models::{Recipe, Unit};
use crate::store::{IngredientTable, RecipeBook};

/// Recipe that references ingredients absent from the price list
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeAudit {
    pub recipe: String,
    pub missing: Vec<String>,
}

/// Price-list row that breaks a record rule
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidRow {
    pub ingredient: String,
    pub problem: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditReport {
    pub recipes: Vec<RecipeAudit>,
    pub invalid_rows: Vec<InvalidRow>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.recipes.is_empty() && self.invalid_rows.is_empty()
    }
}

/// Ingredients used by `recipe` with no price-list row, in name order
pub fn missing_ingredients(recipe: &Recipe, table: &IngredientTable) -> Vec<String> {
    recipe
        .ingredients
        .keys()
        .filter(|name| !table.contains(name))
        .cloned()
        .collect()
}

/// [`missing_ingredients`] for every recipe; complete recipes are left out
pub fn audit_catalog(book: &RecipeBook, table: &IngredientTable) -> Vec<RecipeAudit> {
    book.iter()
        .filter_map(|recipe| {
            let missing = missing_ingredients(recipe, table);
            (!missing.is_empty()).then(|| RecipeAudit {
                recipe: recipe.name.clone(),
                missing,
            })
        })
        .collect()
}

/// Rows that violate the record rules or still carry an `unknown` unit
pub fn validate_ingredients(table: &IngredientTable) -> Vec<InvalidRow> {
    let mut invalid = Vec::new();
    for row in table.iter() {
        if let Err(e) = row.validate() {
            invalid.push(InvalidRow {
                ingredient: row.name.clone(),
                problem: e.to_string(),
            });
        } else if row.unit == Unit::Unknown {
            invalid.push(InvalidRow {
                ingredient: row.name.clone(),
                problem: "unit is unknown; set it before planning".to_string(),
            });
        }
    }
    invalid
}

/// Full audit of both datasets
pub fn audit(book: &RecipeBook, table: &IngredientTable) -> AuditReport {
    AuditReport {
        recipes: audit_catalog(book, table),
        invalid_rows: validate_ingredients(table),
    }
}
