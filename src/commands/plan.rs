use super::{new_table, today, Context};
use anyhow::Result;
use catering_estimator::planner::{
    parse_overrides, EventPlan, EventRequest, Planner, RoundingPolicy,
};
use catering_estimator::store::{IngredientStore, RecipeCatalog};
use colored::Colorize;
use comfy_table::{Cell, CellAlignment};
use tracing::info;

/// Execute the plan command
///
/// Snapshots both datasets once, runs the pipeline and prints the multipliers,
/// the shopping list grouped by shop, the total and any stale-price warnings.
pub fn execute(
    ctx: &Context,
    guests: u32,
    event: &str,
    recipes: &str,
    overrides: Option<&str>,
) -> Result<()> {
    let request = EventRequest::new(guests, event, &EventRequest::parse_recipe_list(recipes))?;
    let overrides = parse_overrides(overrides.unwrap_or_default())?;

    info!(
        "Planning {} for {} guests: {}",
        request.event_type,
        request.guest_count,
        request.recipes.join(", ")
    );

    let book = ctx.recipes.snapshot()?;
    let table = ctx.ingredients.snapshot()?;
    let planner = Planner::new(RoundingPolicy::standard(), ctx.config.pricing.stale_after_days);

    let plan = planner.plan(&request, &book, &table, &overrides, today())?;
    print_plan(ctx, &plan);
    Ok(())
}

fn print_plan(ctx: &Context, plan: &EventPlan) {
    println!("{}", "Recipe multipliers:".bold());
    for entry in plan.multipliers.iter() {
        let estimated = plan.estimated.get(&entry.recipe);
        match estimated {
            Some(estimated) if estimated != entry.multiplier => println!(
                "  {:<20} {} {}",
                entry.recipe,
                entry.multiplier,
                format!("(estimated {})", estimated).dimmed()
            ),
            _ => println!("  {:<20} {}", entry.recipe, entry.multiplier),
        }
    }
    println!();

    let mut table = new_table(["Shop", "Ingredient", "Quantity", "Unit", "Price", "Recipes"]);
    for line in &plan.lines {
        table.add_row(vec![
            Cell::new(&line.shop),
            Cell::new(&line.ingredient),
            Cell::new(line.quantity).set_alignment(CellAlignment::Right),
            Cell::new(line.unit),
            Cell::new(ctx.money(line.price)).set_alignment(CellAlignment::Right),
            Cell::new(&line.attribution),
        ]);
    }
    println!("{}", table);
    println!();
    println!("{} {}", "Total cost:".bold(), ctx.money(plan.total).green().bold());

    if !plan.warnings.is_empty() {
        println!();
        println!("{}", "⚠ Stale price data:".yellow().bold());
        for warning in &plan.warnings {
            println!(
                "  {} last updated {} ({} days ago)",
                warning.ingredient.yellow(),
                warning.last_update,
                warning.age_days
            );
        }
    }
}
