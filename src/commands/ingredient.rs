use super::{new_table, today, Context};
use anyhow::{bail, Result};
use catering_estimator::models::{normalize_key, Ingredient, Unit};
use catering_estimator::store::{IngredientStore, PriceListWriter};
use colored::Colorize;
use comfy_table::{Cell, CellAlignment, Color};
use tracing::info;

pub fn show(ctx: &Context, name: &str) -> Result<()> {
    let Some(row) = ctx.ingredients.get_ingredient(name)? else {
        bail!("Ingredient '{}' is not in the price list", normalize_key(name));
    };

    println!("{}", row.name.bold());
    println!("  Price:        {} per {}", ctx.money(row.price), row.unit);
    println!("  Shop:         {}", row.shop);
    println!(
        "  Last update:  {} ({} days ago)",
        row.last_update,
        row.age_days(today())
    );
    Ok(())
}

pub fn list(ctx: &Context, shop: Option<&str>) -> Result<()> {
    let shop = shop.map(normalize_key);
    let rows: Vec<Ingredient> = ctx
        .ingredients
        .list_ingredients()?
        .into_iter()
        .filter(|row| shop.as_ref().map_or(true, |shop| &row.shop == shop))
        .collect();

    if rows.is_empty() {
        println!("No ingredients found");
        return Ok(());
    }

    let today = today();
    let stale_after = ctx.config.pricing.stale_after_days;
    let mut table = new_table(["Ingredient", "Price", "Unit", "Shop", "Last update"]);
    for row in &rows {
        let updated = Cell::new(row.last_update);
        let updated = if row.age_days(today) > stale_after {
            updated.fg(Color::Yellow)
        } else {
            updated
        };
        let unit = Cell::new(row.unit);
        let unit = if row.unit == Unit::Unknown {
            unit.fg(Color::Red)
        } else {
            unit
        };
        table.add_row(vec![
            Cell::new(&row.name),
            Cell::new(ctx.money(row.price)).set_alignment(CellAlignment::Right),
            unit,
            Cell::new(&row.shop),
            updated,
        ]);
    }

    println!("{}", table);
    println!("{} ingredient(s)", rows.len());
    Ok(())
}

pub fn add(ctx: &Context, name: &str, price: f64, unit: Unit, shop: &str) -> Result<()> {
    let ingredient = Ingredient::new(name, price, unit, shop, today())?;
    info!("Adding ingredient '{}'", ingredient.name);
    let summary = format!(
        "{} at {} per {} from {}",
        ingredient.name,
        ctx.money(ingredient.price),
        ingredient.unit,
        ingredient.shop
    );

    ctx.ingredients.add_ingredient(ingredient)?;
    println!("{} Added {}", "✓".green(), summary);
    Ok(())
}

pub fn set_price(ctx: &Context, name: &str, price: f64) -> Result<()> {
    ctx.ingredients.update_price(name, price)?;
    let price = ctx.ingredients.get_price(name)?;
    println!(
        "{} {} now costs {}",
        "✓".green(),
        normalize_key(name),
        ctx.money(price)
    );
    Ok(())
}

pub fn set_unit(ctx: &Context, name: &str, unit: Unit) -> Result<()> {
    ctx.ingredients.update_unit(name, unit)?;
    println!("{} {} is now priced per {}", "✓".green(), normalize_key(name), unit);
    Ok(())
}

pub fn touch(ctx: &Context, name: &str) -> Result<()> {
    let today = today();
    ctx.ingredients.touch(name, today)?;
    println!("{} {} marked as checked on {}", "✓".green(), normalize_key(name), today);
    Ok(())
}
