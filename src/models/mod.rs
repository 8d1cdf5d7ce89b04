//! Domain records shared by the stores, the planner and the price feeds.

pub mod ingredient;
pub mod recipe;
pub mod unit;

pub use ingredient::{checked_price, Ingredient, PriceQuote};
pub use recipe::Recipe;
pub use unit::Unit;

/// Normalise a user- or file-supplied key (recipe, ingredient, event type, shop)
///
/// Keys are matched case-insensitively everywhere, so they are stored trimmed and lowercase.
pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Round to a fixed number of decimal places, halves to the even neighbour
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round_ties_even() / factor
}
