use crate::error::{CateringError, Result};
use crate::models::normalize_key;
use crate::planner::estimator::Multipliers;

/// User replacement for one recipe's multiplier
#[derive(Debug, Clone, PartialEq)]
pub struct Override {
    pub recipe: String,
    pub multiplier: f64,
}

/// Parse `"<recipe>: <multiplier>, ..."`
///
/// An empty string or `no` means no overrides. Blank entries (a trailing comma)
/// are skipped. Any malformed entry rejects the whole batch.
pub fn parse_overrides(text: &str) -> Result<Vec<Override>> {
    let text = text.trim();
    if text.is_empty() || text.eq_ignore_ascii_case("no") {
        return Ok(Vec::new());
    }

    let mut overrides = Vec::new();
    for entry in text.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }

        let (name, value) = entry.split_once(':').ok_or_else(|| {
            CateringError::Format(format!(
                "override '{}' must look like 'recipe: multiplier'",
                entry
            ))
        })?;

        let recipe = normalize_key(name);
        if recipe.is_empty() {
            return Err(CateringError::Format(format!(
                "override '{}' has no recipe name",
                entry
            )));
        }

        let multiplier: f64 = value.trim().parse().map_err(|_| {
            CateringError::Format(format!(
                "override '{}': '{}' is not a number",
                entry,
                value.trim()
            ))
        })?;
        if !multiplier.is_finite() || multiplier < 0.0 {
            return Err(CateringError::Format(format!(
                "override '{}': multiplier must be a non-negative number",
                entry
            )));
        }

        overrides.push(Override { recipe, multiplier });
    }
    Ok(overrides)
}

/// Replace multipliers for the named recipes
///
/// Every override must name a recipe present in `multipliers`; otherwise the batch
/// is rejected with `UnknownRecipe` and no multiplier changes. Later overrides of
/// the same recipe win.
pub fn apply_overrides(multipliers: &Multipliers, overrides: &[Override]) -> Result<Multipliers> {
    let mut updated = multipliers.clone();
    for item in overrides {
        let recipe = normalize_key(&item.recipe);
        if !updated.set(&recipe, item.multiplier) {
            return Err(CateringError::UnknownRecipe(recipe));
        }
    }
    Ok(updated)
}
