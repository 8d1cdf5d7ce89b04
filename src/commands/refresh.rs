use super::{new_table, today, Context};
use anyhow::Result;
use catering_estimator::feeds::{self, PriceRefresher};
use catering_estimator::store::PriceListWriter;
use colored::Colorize;
use std::sync::Arc;
use tracing::info;

/// Execute the refresh command
pub async fn execute(ctx: &Context, shop: Option<&str>) -> Result<()> {
    let feeds = feeds::from_config(&ctx.config.feeds);
    if feeds.is_empty() {
        println!("{}", "No price feeds are enabled".yellow());
        return Ok(());
    }

    let store: Arc<dyn PriceListWriter> = ctx.ingredients.clone();
    let refresher = PriceRefresher::new(store, feeds);

    info!("Starting price refresh");
    let reports = refresher.refresh(today(), shop).await?;

    let mut table = new_table(["Feed", "Shop", "Updated", "Already current", "Failed"]);
    for report in &reports {
        table.add_row(vec![
            report.feed.clone(),
            report.shop.clone(),
            report.updated.len().to_string(),
            report.skipped.len().to_string(),
            report.failed.len().to_string(),
        ]);
    }
    println!("{}", table);

    let failures: Vec<_> = reports
        .iter()
        .flat_map(|report| report.failed.iter().map(move |f| (&report.feed, f)))
        .collect();
    if !failures.is_empty() {
        println!();
        println!("{}", "Failed lookups (prices left unchanged):".yellow().bold());
        for (feed, (ingredient, reason)) in failures {
            println!("  [{}] {}: {}", feed, ingredient, reason);
        }
    }

    Ok(())
}
