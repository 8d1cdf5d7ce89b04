//! Command implementations for the CLI
//!
//! - plan: Estimate batches and print the shopping list
//! - ingredient: Price-list maintenance
//! - recipe: Recipe catalog maintenance
//! - audit: Dataset checks
//! - refresh: Run the shop price feeds
//! - config: Configuration display and validation

pub mod audit;
pub mod config;
pub mod ingredient;
pub mod plan;
pub mod recipe;
pub mod refresh;

use catering_estimator::config::Config;
use catering_estimator::store::{JsonIngredientStore, JsonRecipeCatalog};
use chrono::{Local, NaiveDate};
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use std::sync::Arc;

/// Stores opened from the configured data files
pub struct Context {
    pub config: Config,
    pub ingredients: Arc<JsonIngredientStore>,
    pub recipes: JsonRecipeCatalog,
}

impl Context {
    pub fn open(config: Config) -> Self {
        let ingredients = Arc::new(JsonIngredientStore::open(&config.data.ingredients_path));
        let recipes = JsonRecipeCatalog::open(&config.data.recipes_path);
        Self {
            config,
            ingredients,
            recipes,
        }
    }

    /// Amount with the configured currency symbol
    pub fn money(&self, amount: f64) -> String {
        format!("{}{:.2}", self.config.pricing.currency_symbol, amount)
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Table with the layout every command uses
pub fn new_table<const N: usize>(header: [&str; N]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.to_vec());
    table
}
