use crate::error::Result;
use crate::models::normalize_key;
use crate::store::RecipeBook;
use std::fmt;

/// Scale factor for one requested recipe
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeMultiplier {
    pub recipe: String,
    pub multiplier: f64,
}

/// Multipliers in request order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Multipliers(Vec<RecipeMultiplier>);

impl Multipliers {
    pub fn new(entries: Vec<RecipeMultiplier>) -> Self {
        Self(entries)
    }

    pub fn get(&self, recipe: &str) -> Option<f64> {
        let recipe = normalize_key(recipe);
        self.0
            .iter()
            .find(|entry| entry.recipe == recipe)
            .map(|entry| entry.multiplier)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RecipeMultiplier> {
        self.0.iter()
    }

    pub fn recipes(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|entry| entry.recipe.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn set(&mut self, recipe: &str, multiplier: f64) -> bool {
        match self.0.iter_mut().find(|entry| entry.recipe == recipe) {
            Some(entry) => {
                entry.multiplier = multiplier;
                true
            }
            None => false,
        }
    }
}

impl fmt::Display for Multipliers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|entry| format!("{}: {}", entry.recipe, entry.multiplier))
            .collect();
        f.write_str(&parts.join(", "))
    }
}

/// Half-recipe multiplier for `guest_count` guests at batches of `portion_size`
///
/// `round(guest_count * 2 / portion_size) / 2`, with exact halves going to the
/// even neighbour.
pub fn half_step_multiplier(guest_count: u32, portion_size: f64) -> f64 {
    (f64::from(guest_count) * 2.0 / portion_size).round_ties_even() / 2.0
}

/// Estimate a multiplier per recipe for an event
///
/// Fails with `RecipeNotFound` or `EventTypeNotFound` on the first recipe that
/// cannot be resolved; nothing is returned in that case.
pub fn estimate(
    recipes: &[String],
    event_type: &str,
    guest_count: u32,
    book: &RecipeBook,
) -> Result<Multipliers> {
    let mut entries = Vec::with_capacity(recipes.len());
    for name in recipes {
        let recipe = book.recipe(name)?;
        let portion_size = recipe.portion_size(event_type)?;
        entries.push(RecipeMultiplier {
            recipe: recipe.name.clone(),
            multiplier: half_step_multiplier(guest_count, portion_size),
        });
    }
    Ok(Multipliers::new(entries))
}
