use super::PriceFeed;
use crate::error::{CateringError, Result};
use crate::models::normalize_key;
use crate::store::{IngredientTable, PriceListWriter};
use chrono::NaiveDate;
use futures::future::join_all;
use reqwest::Client;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Outcome of one feed's refresh run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RefreshReport {
    pub feed: String,
    pub shop: String,
    /// Rows rewritten with a fresh quote
    pub updated: Vec<String>,
    /// Rows already refreshed today
    pub skipped: Vec<String>,
    /// Rows whose fetch or write failed, with the reason
    pub failed: Vec<(String, String)>,
}

impl RefreshReport {
    fn new(feed: &dyn PriceFeed) -> Self {
        Self {
            feed: feed.name().to_string(),
            shop: feed.shop().to_string(),
            ..Self::default()
        }
    }
}

/// Work assigned to one feed
struct Partition {
    feed: Arc<dyn PriceFeed>,
    pending: Vec<String>,
    skipped: Vec<String>,
}

/// Refreshes price-list rows from the shop feeds
///
/// Each feed only ever sees the rows of its own shop, so workers never touch
/// the same record. All writes still go through the store's write guard.
pub struct PriceRefresher {
    store: Arc<dyn PriceListWriter>,
    feeds: Vec<Arc<dyn PriceFeed>>,
    client: Client,
}

impl PriceRefresher {
    pub fn new(store: Arc<dyn PriceListWriter>, feeds: Vec<Arc<dyn PriceFeed>>) -> Self {
        Self {
            store,
            feeds,
            client: Client::new(),
        }
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Run every feed (or only the one serving `only_shop`) concurrently
    ///
    /// Returns one report per feed that ran. Fetch failures and timeouts are
    /// recorded in the report and logged; they never abort the run.
    pub async fn refresh(
        &self,
        today: NaiveDate,
        only_shop: Option<&str>,
    ) -> Result<Vec<RefreshReport>> {
        let table = self.store.snapshot()?;
        let partitions = self.partition(&table, today, only_shop)?;

        info!(
            "Refreshing prices from {} feed(s) for {}",
            partitions.len(),
            today
        );

        let workers = partitions.into_iter().map(|partition| {
            let store = Arc::clone(&self.store);
            let client = self.client.clone();
            let feed_name = partition.feed.name().to_string();
            let handle = tokio::spawn(run_worker(store, client, partition, today));
            async move { (feed_name, handle.await) }
        });

        let mut reports = Vec::new();
        for (feed_name, joined) in join_all(workers).await {
            match joined {
                Ok(report) => reports.push(report),
                Err(e) => error!("Price feed worker '{}' aborted: {}", feed_name, e),
            }
        }

        Ok(reports)
    }

    fn partition(
        &self,
        table: &IngredientTable,
        today: NaiveDate,
        only_shop: Option<&str>,
    ) -> Result<Vec<Partition>> {
        let only_shop = only_shop.map(normalize_key);

        let feeds: Vec<_> = self
            .feeds
            .iter()
            .filter(|feed| {
                only_shop
                    .as_deref()
                    .map_or(true, |shop| normalize_key(feed.shop()) == shop)
            })
            .collect();

        if let Some(shop) = &only_shop {
            if feeds.is_empty() {
                return Err(CateringError::Format(format!(
                    "no enabled price feed serves shop '{}'",
                    shop
                )));
            }
        }

        Ok(feeds
            .into_iter()
            .map(|feed| {
                let shop = normalize_key(feed.shop());
                let (skipped, pending): (Vec<_>, Vec<_>) = table
                    .iter()
                    .filter(|row| row.shop == shop)
                    .partition(|row| row.last_update == today);

                Partition {
                    feed: Arc::clone(feed),
                    pending: pending.into_iter().map(|row| row.name.clone()).collect(),
                    skipped: skipped.into_iter().map(|row| row.name.clone()).collect(),
                }
            })
            .collect())
    }
}

async fn run_worker(
    store: Arc<dyn PriceListWriter>,
    client: Client,
    partition: Partition,
    today: NaiveDate,
) -> RefreshReport {
    let feed = partition.feed;
    let mut report = RefreshReport::new(feed.as_ref());
    report.skipped = partition.skipped;

    debug!(
        "[{}] {} to refresh, {} already current",
        feed.name(),
        partition.pending.len(),
        report.skipped.len()
    );

    for ingredient in partition.pending {
        let result = tokio::time::timeout(feed.timeout(), feed.fetch(&client, &ingredient)).await;

        let quote = match result {
            Ok(Ok(quote)) => quote,
            Ok(Err(e)) => {
                warn!(
                    feed = feed.name(),
                    error_type = e.kind(),
                    "Price fetch failed for '{}': {}",
                    ingredient,
                    e
                );
                report.failed.push((ingredient, e.to_string()));
                continue;
            }
            Err(_) => {
                warn!(feed = feed.name(), "Price fetch timed out for '{}'", ingredient);
                report.failed.push((ingredient, "timed out".to_string()));
                continue;
            }
        };

        let writer = Arc::clone(&store);
        let name = ingredient.clone();
        let written =
            tokio::task::spawn_blocking(move || writer.apply_quote(&name, quote, today)).await;

        match written {
            Ok(Ok(())) => {
                debug!(
                    "[{}] {} now {:.2} per {}",
                    feed.name(),
                    ingredient,
                    quote.price,
                    quote.unit
                );
                report.updated.push(ingredient);
            }
            Ok(Err(e)) => {
                error!(feed = feed.name(), "Failed to save price for '{}': {}", ingredient, e);
                report.failed.push((ingredient, e.to_string()));
            }
            Err(e) => {
                error!(feed = feed.name(), "Price write for '{}' aborted: {}", ingredient, e);
                report.failed.push((ingredient, e.to_string()));
            }
        }
    }

    info!(
        "[{}] refreshed {}, skipped {}, failed {}",
        feed.name(),
        report.updated.len(),
        report.skipped.len(),
        report.failed.len()
    );
    report
}
