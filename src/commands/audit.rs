use super::Context;
use anyhow::Result;
use catering_estimator::audit::audit;
use catering_estimator::store::{IngredientStore, RecipeCatalog};
use colored::Colorize;
use tracing::info;

/// Execute the audit command
///
/// Returns an error when problems were found so scripts can gate on the exit code.
pub fn execute(ctx: &Context) -> Result<()> {
    info!("Auditing recipe catalog and price list");
    let book = ctx.recipes.snapshot()?;
    let table = ctx.ingredients.snapshot()?;
    let report = audit(&book, &table);

    println!(
        "Checked {} recipe(s) and {} price-list row(s)",
        book.len(),
        table.len()
    );
    println!();

    if report.is_clean() {
        println!("{}", "✓ No problems found".green());
        return Ok(());
    }

    if !report.recipes.is_empty() {
        println!("{}", "Recipes with unpriced ingredients:".bold());
        for entry in &report.recipes {
            println!("  {}: {}", entry.recipe.yellow(), entry.missing.join(", "));
        }
        println!();
    }

    if !report.invalid_rows.is_empty() {
        println!("{}", "Invalid price-list rows:".bold());
        for row in &report.invalid_rows {
            println!("  {}: {}", row.ingredient.red(), row.problem);
        }
        println!();
    }

    anyhow::bail!(
        "Audit found {} recipe(s) with missing ingredients and {} invalid row(s)",
        report.recipes.len(),
        report.invalid_rows.len()
    )
}
