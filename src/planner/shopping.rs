use crate::error::{CateringError, Result};
use crate::models::{round_to, Unit};
use crate::planner::estimator::Multipliers;
use crate::planner::rounding::RoundingPolicy;
use crate::store::{IngredientTable, RecipeBook};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use tracing::debug;

/// Which requested recipes need an ingredient
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attribution {
    /// Every requested recipe uses it
    AllRecipes,
    /// Contributing recipes in request order
    Recipes(Vec<String>),
}

impl fmt::Display for Attribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribution::AllRecipes => f.write_str("all recipes"),
            Attribution::Recipes(recipes) => f.write_str(&recipes.join(", ")),
        }
    }
}

/// One row of the shopping list
#[derive(Debug, Clone, PartialEq)]
pub struct ShoppingLineItem {
    pub shop: String,
    pub ingredient: String,
    /// Purchasable quantity after rounding
    pub quantity: f64,
    pub unit: Unit,
    /// `quantity * unit price`, two decimals
    pub price: f64,
    pub attribution: Attribution,
}

/// Per-recipe requirement before grouping
#[derive(Debug, Clone, PartialEq)]
pub struct DraftEntry {
    pub ingredient: String,
    pub recipe: String,
    pub needed: f64,
    pub unit: Unit,
    pub shop: String,
}

/// Summed requirement for one ingredient across recipes
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedIngredient {
    pub ingredient: String,
    pub needed: f64,
    pub unit: Unit,
    pub shop: String,
    pub recipes: Vec<String>,
}

/// Expand every recipe's ingredients by its multiplier
///
/// Unit and shop come from the price list; an ingredient missing from it fails
/// the whole expansion with `IngredientNotFound`.
pub fn draft_entries(
    multipliers: &Multipliers,
    book: &RecipeBook,
    table: &IngredientTable,
) -> Result<Vec<DraftEntry>> {
    let mut drafts = Vec::new();
    for entry in multipliers.iter() {
        let recipe = book.recipe(&entry.recipe)?;
        for (ingredient, per_batch) in &recipe.ingredients {
            let row = table
                .get(ingredient)
                .ok_or_else(|| CateringError::IngredientNotFound {
                    ingredient: ingredient.clone(),
                    recipe: Some(recipe.name.clone()),
                })?;
            drafts.push(DraftEntry {
                ingredient: ingredient.clone(),
                recipe: recipe.name.clone(),
                needed: per_batch * entry.multiplier,
                unit: row.unit,
                shop: row.shop.clone(),
            });
        }
    }
    Ok(drafts)
}

/// Group drafts by ingredient in first-occurrence order and sum what is needed
///
/// Unit and shop must agree across every draft of an ingredient; a disagreement
/// is reported as `DataConsistency` rather than resolved.
pub fn group_drafts(drafts: Vec<DraftEntry>) -> Result<Vec<AggregatedIngredient>> {
    let mut grouped: Vec<AggregatedIngredient> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for draft in drafts {
        match index.get(&draft.ingredient) {
            Some(&position) => {
                let group = &mut grouped[position];
                if group.unit != draft.unit {
                    return Err(CateringError::DataConsistency {
                        ingredient: draft.ingredient,
                        detail: format!(
                            "unit '{}' from '{}' disagrees with '{}' from '{}'",
                            draft.unit, draft.recipe, group.unit, group.recipes[0]
                        ),
                    });
                }
                if group.shop != draft.shop {
                    return Err(CateringError::DataConsistency {
                        ingredient: draft.ingredient,
                        detail: format!(
                            "shop '{}' from '{}' disagrees with '{}' from '{}'",
                            draft.shop, draft.recipe, group.shop, group.recipes[0]
                        ),
                    });
                }
                group.needed += draft.needed;
                if !group.recipes.contains(&draft.recipe) {
                    group.recipes.push(draft.recipe);
                }
            }
            None => {
                index.insert(draft.ingredient.clone(), grouped.len());
                grouped.push(AggregatedIngredient {
                    ingredient: draft.ingredient,
                    needed: draft.needed,
                    unit: draft.unit,
                    shop: draft.shop,
                    recipes: vec![draft.recipe],
                });
            }
        }
    }
    Ok(grouped)
}

/// Collapse attribution to "all recipes" when every requested recipe contributes
pub fn attribution_for(contributors: &[String], requested: &[&str]) -> Attribution {
    let contributing: BTreeSet<&str> = contributors.iter().map(String::as_str).collect();
    let all: BTreeSet<&str> = requested.iter().copied().collect();
    if contributing == all {
        Attribution::AllRecipes
    } else {
        Attribution::Recipes(contributors.to_vec())
    }
}

/// Build the priced shopping list for the given multipliers
///
/// Runs expansion, grouping, attribution, rounding and pricing, then sorts by
/// shop (stable). Any failure aborts the whole list.
pub fn build_list(
    multipliers: &Multipliers,
    book: &RecipeBook,
    table: &IngredientTable,
    policy: &RoundingPolicy,
) -> Result<Vec<ShoppingLineItem>> {
    let drafts = draft_entries(multipliers, book, table)?;
    debug!(drafts = drafts.len(), "Expanded recipe ingredients");

    let grouped = group_drafts(drafts)?;
    let requested: Vec<&str> = multipliers.recipes().collect();

    let mut lines = Vec::with_capacity(grouped.len());
    for group in grouped {
        let unit_price = table
            .get(&group.ingredient)
            .map(|row| row.price)
            .ok_or_else(|| CateringError::IngredientNotFound {
                ingredient: group.ingredient.clone(),
                recipe: group.recipes.first().cloned(),
            })?;
        let quantity = policy.round(group.unit, group.needed);

        lines.push(ShoppingLineItem {
            attribution: attribution_for(&group.recipes, &requested),
            price: round_to(quantity * unit_price, 2),
            shop: group.shop,
            ingredient: group.ingredient,
            quantity,
            unit: group.unit,
        });
    }

    lines.sort_by(|a, b| a.shop.cmp(&b.shop));
    debug!(lines = lines.len(), "Shopping list built");
    Ok(lines)
}
