//! Ingredient price list and recipe catalog
//!
//! The planner never talks to storage directly: it receives an
//! [`IngredientTable`] and a [`RecipeBook`], in-memory snapshots taken once at
//! the start of a request through the [`IngredientStore`] and [`RecipeCatalog`]
//! traits. Maintenance tooling (CLI, price refresher) writes through
//! [`PriceListWriter`], whose implementations serialise record writes behind a
//! single write guard.

pub mod guard;
pub mod json;
pub mod memory;

pub use guard::WriteGuard;
pub use json::{JsonIngredientStore, JsonRecipeCatalog};
pub use memory::{MemoryIngredientStore, MemoryRecipeCatalog};

use crate::error::{CateringError, Result};
use crate::models::{normalize_key, Ingredient, PriceQuote, Recipe, Unit};
use chrono::NaiveDate;
use std::collections::BTreeMap;

// ============================================================
// Snapshots
// ============================================================

/// Immutable copy of the price list, keyed by normalised ingredient name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngredientTable {
    rows: BTreeMap<String, Ingredient>,
}

impl IngredientTable {
    pub fn new(rows: impl IntoIterator<Item = Ingredient>) -> Self {
        Self {
            rows: rows
                .into_iter()
                .map(|row| (normalize_key(&row.name), row))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Ingredient> {
        self.rows.get(&normalize_key(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Rows in name order
    pub fn iter(&self) -> impl Iterator<Item = &Ingredient> {
        self.rows.values()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub(crate) fn insert(&mut self, row: Ingredient) {
        self.rows.insert(normalize_key(&row.name), row);
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Ingredient> {
        self.rows.get_mut(&normalize_key(name))
    }

    pub(crate) fn into_rows(self) -> Vec<Ingredient> {
        self.rows.into_values().collect()
    }
}

/// Immutable copy of the recipe catalog, keyed by normalised recipe name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeBook {
    recipes: BTreeMap<String, Recipe>,
}

impl RecipeBook {
    pub fn new(recipes: impl IntoIterator<Item = Recipe>) -> Self {
        Self {
            recipes: recipes
                .into_iter()
                .map(|recipe| (normalize_key(&recipe.name), recipe))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Recipe> {
        self.recipes.get(&normalize_key(name))
    }

    /// Lookup that fails with `RecipeNotFound`
    pub fn recipe(&self, name: &str) -> Result<&Recipe> {
        self.get(name)
            .ok_or_else(|| CateringError::RecipeNotFound(normalize_key(name)))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.values()
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub(crate) fn insert(&mut self, recipe: Recipe) {
        self.recipes.insert(normalize_key(&recipe.name), recipe);
    }
}

// ============================================================
// Store interfaces
// ============================================================

/// Read access to the price list
pub trait IngredientStore: Send + Sync {
    /// Take a consistent in-memory copy of every row
    fn snapshot(&self) -> Result<IngredientTable>;

    fn get_ingredient(&self, name: &str) -> Result<Option<Ingredient>> {
        Ok(self.snapshot()?.get(name).cloned())
    }

    fn list_ingredients(&self) -> Result<Vec<Ingredient>> {
        Ok(self.snapshot()?.into_rows())
    }

    fn get_unit(&self, name: &str) -> Result<Unit> {
        Ok(require(self.get_ingredient(name)?, name)?.unit)
    }

    fn get_price(&self, name: &str) -> Result<f64> {
        Ok(require(self.get_ingredient(name)?, name)?.price)
    }

    fn get_shop(&self, name: &str) -> Result<String> {
        Ok(require(self.get_ingredient(name)?, name)?.shop)
    }
}

/// Maintenance writes on the price list
///
/// Every method is a single record write performed under the store's write guard,
/// so concurrent refreshers never interleave partial updates.
pub trait PriceListWriter: IngredientStore {
    /// Insert a new row; fails with `AlreadyExists` for a known name
    fn add_ingredient(&self, ingredient: Ingredient) -> Result<()>;

    fn update_unit(&self, name: &str, unit: Unit) -> Result<()>;

    fn update_price(&self, name: &str, price: f64) -> Result<()>;

    /// Reset the last-update date
    fn touch(&self, name: &str, today: NaiveDate) -> Result<()>;

    /// Write unit, price and last-update date of one row as one record write
    fn apply_quote(&self, name: &str, quote: PriceQuote, today: NaiveDate) -> Result<()>;
}

/// Read access to the recipe catalog
pub trait RecipeCatalog: Send + Sync {
    fn snapshot(&self) -> Result<RecipeBook>;

    fn get_recipe(&self, name: &str) -> Result<Recipe> {
        self.snapshot()?.recipe(name).cloned()
    }

    fn list_recipes(&self) -> Result<Vec<Recipe>> {
        Ok(self.snapshot()?.iter().cloned().collect())
    }

    /// Insert a new recipe; fails with `AlreadyExists` for a known name
    fn add_recipe(&self, recipe: Recipe) -> Result<()>;
}

fn require(row: Option<Ingredient>, name: &str) -> Result<Ingredient> {
    row.ok_or_else(|| CateringError::IngredientNotFound {
        ingredient: normalize_key(name),
        recipe: None,
    })
}

/// Apply one maintenance edit to a table row, shared by every writer
pub(crate) fn edit_row(
    table: &mut IngredientTable,
    name: &str,
    edit: impl FnOnce(&mut Ingredient) -> Result<()>,
) -> Result<()> {
    let row = table
        .get_mut(name)
        .ok_or_else(|| CateringError::IngredientNotFound {
            ingredient: normalize_key(name),
            recipe: None,
        })?;
    let mut updated = row.clone();
    edit(&mut updated)?;
    updated.validate()?;
    *row = updated;
    Ok(())
}
