use super::{new_table, Context};
use anyhow::{anyhow, Context as _, Result};
use catering_estimator::audit::missing_ingredients;
use catering_estimator::models::Recipe;
use catering_estimator::planner::recipe_batch_cost;
use catering_estimator::store::{IngredientStore, RecipeCatalog};
use colored::Colorize;
use tracing::info;

pub fn show(ctx: &Context, name: &str) -> Result<()> {
    let recipe = ctx.recipes.get_recipe(name)?;

    println!("{}", recipe.name.bold());
    let mut table = new_table(["Ingredient", "Quantity per batch"]);
    for (ingredient, quantity) in &recipe.ingredients {
        table.add_row(vec![ingredient.clone(), quantity.to_string()]);
    }
    println!("{}", table);

    if recipe.portions.is_empty() {
        println!("{}", "No portion sizes recorded".yellow());
    } else {
        println!("Guests served per batch:");
        for (event_type, size) in &recipe.portions {
            println!("  {:<16} {}", event_type, size);
        }
    }
    Ok(())
}

pub fn list(ctx: &Context) -> Result<()> {
    let recipes = ctx.recipes.list_recipes()?;
    if recipes.is_empty() {
        println!("No recipes found");
        return Ok(());
    }

    let mut table = new_table(["Recipe", "Ingredients", "Event types"]);
    for recipe in &recipes {
        let event_types: Vec<&str> = recipe.portions.keys().map(String::as_str).collect();
        table.add_row(vec![
            recipe.name.clone(),
            recipe.ingredients.len().to_string(),
            event_types.join(", "),
        ]);
    }
    println!("{}", table);
    Ok(())
}

pub fn add(ctx: &Context, name: &str, ingredients: &[String], portions: &[String]) -> Result<()> {
    let ingredients = parse_pairs(ingredients, "--ingredient")?;
    let portions = parse_pairs(portions, "--portion")?;
    let recipe = Recipe::new(name, ingredients, portions)?;

    let table = ctx.ingredients.snapshot()?;
    let missing = missing_ingredients(&recipe, &table);

    info!("Adding recipe '{}'", recipe.name);
    let recipe_name = recipe.name.clone();
    ctx.recipes.add_recipe(recipe)?;
    println!("{} Added recipe {}", "✓".green(), recipe_name);

    if !missing.is_empty() {
        println!(
            "{} Not in the price list yet: {}",
            "⚠".yellow(),
            missing.join(", ").yellow()
        );
        println!("  Add them with `caterer ingredient add` before planning with this recipe");
    }
    Ok(())
}

pub fn cost(ctx: &Context, name: &str) -> Result<()> {
    let recipe = ctx.recipes.get_recipe(name)?;
    let table = ctx.ingredients.snapshot()?;
    let cost = recipe_batch_cost(&recipe, &table)?;

    println!("One batch of {} costs {}", recipe.name.bold(), ctx.money(cost).green());
    for (event_type, size) in &recipe.portions {
        println!(
            "  {:<16} {} per guest",
            event_type,
            ctx.money(cost / size)
        );
    }
    Ok(())
}

/// Parse repeated `name=value` arguments
fn parse_pairs(args: &[String], flag: &str) -> Result<Vec<(String, f64)>> {
    args.iter()
        .map(|arg| {
            let (key, value) = arg
                .split_once('=')
                .ok_or_else(|| anyhow!("{} expects NAME=VALUE, got '{}'", flag, arg))?;
            let value: f64 = value
                .trim()
                .parse()
                .with_context(|| format!("{} '{}': value is not a number", flag, arg))?;
            Ok((key.trim().to_string(), value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pairs() {
        let args = vec!["chickpeas=0.25".to_string(), " Tahini = 0.5".to_string()];
        let pairs = parse_pairs(&args, "--ingredient").unwrap();
        assert_eq!(
            pairs,
            vec![("chickpeas".to_string(), 0.25), ("Tahini".to_string(), 0.5)]
        );
    }

    #[test]
    fn test_parse_pairs_rejects_malformed() {
        let err = parse_pairs(&["chickpeas".to_string()], "--ingredient").unwrap_err();
        assert!(err.to_string().contains("NAME=VALUE"));

        let err = parse_pairs(&["buffet=lots".to_string()], "--portion").unwrap_err();
        assert!(err.to_string().contains("not a number"));
    }
}
