use crate::error::{CateringError, Result};
use crate::models::{round_to, Recipe};
use crate::planner::shopping::ShoppingLineItem;
use crate::store::IngredientTable;

/// Total cost of a shopping list, two decimals
pub fn total_cost(lines: &[ShoppingLineItem]) -> f64 {
    round_to(lines.iter().map(|line| line.price).sum(), 2)
}

/// Cost of one unrounded batch of a recipe at current prices
pub fn recipe_batch_cost(recipe: &Recipe, table: &IngredientTable) -> Result<f64> {
    let mut total = 0.0;
    for (ingredient, quantity) in &recipe.ingredients {
        let row = table
            .get(ingredient)
            .ok_or_else(|| CateringError::IngredientNotFound {
                ingredient: ingredient.clone(),
                recipe: Some(recipe.name.clone()),
            })?;
        total += row.price * quantity;
    }
    Ok(round_to(total, 2))
}
