//! Price feeds
//!
//! Each shop is served by one [`PriceFeed`] that looks an ingredient up on the
//! shop's website and turns the listing into a [`PriceQuote`]. Feeds are only
//! used by the [`refresher::PriceRefresher`]; the planner reads whatever the
//! refresher last wrote to the price list.

pub mod aldi;
pub mod refresher;
pub mod yasar_halim;

pub use aldi::AldiFeed;
pub use refresher::{PriceRefresher, RefreshReport};
pub use yasar_halim::YasarHalimFeed;

use crate::config::{FeedConfig, FeedsConfig};
use crate::error::{CateringError, Result};
use crate::models::PriceQuote;
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// One external source of ingredient prices
#[async_trait]
pub trait PriceFeed: Send + Sync + 'static {
    /// Feed name used in logs and reports (e.g. "aldi")
    fn name(&self) -> &str;

    /// Shop whose price-list rows this feed refreshes
    fn shop(&self) -> &str;

    /// Upper bound for one `fetch`
    fn timeout(&self) -> Duration;

    /// Look up the current price and unit of one ingredient
    async fn fetch(&self, client: &Client, ingredient: &str) -> Result<PriceQuote>;
}

/// Build the enabled feeds from configuration
pub fn from_config(config: &FeedsConfig) -> Vec<Arc<dyn PriceFeed>> {
    let mut feeds: Vec<Arc<dyn PriceFeed>> = Vec::new();
    if config.aldi.enabled {
        feeds.push(Arc::new(AldiFeed::new(config.aldi.clone())));
    }
    if config.yasar_halim.enabled {
        feeds.push(Arc::new(YasarHalimFeed::new(config.yasar_halim.clone())));
    }
    feeds
}

/// GET `{base_url}/search?q=<ingredient>` and return the page body
pub(crate) async fn fetch_search_page(
    client: &Client,
    config: &FeedConfig,
    ingredient: &str,
) -> Result<String> {
    let url = format!("{}/search", config.base_url.trim_end_matches('/'));
    debug!("Searching {} for '{}'", url, ingredient);

    let response = client
        .get(&url)
        .query(&[("q", ingredient)])
        .timeout(Duration::from_secs(config.timeout_seconds))
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(CateringError::Upstream {
            status: status.as_u16(),
            message,
        });
    }

    Ok(response.text().await?)
}

/// First capture group of `regex` in `haystack`, trimmed
pub(crate) fn capture(regex: &Regex, haystack: &str) -> Option<String> {
    regex
        .captures(haystack)
        .and_then(|caps| caps.get(1))
        .map(|m| decode_entities(m.as_str().trim()))
}

/// Parse a shelf price such as `£1.50`, `1.50` or `89p` into pounds
pub(crate) fn parse_money(text: &str) -> Result<f64> {
    let cleaned = text.trim().replace('£', "").replace(',', "");
    let cleaned = cleaned.trim();
    let value = match cleaned.strip_suffix('p') {
        Some(pence) => pence.trim().parse::<f64>().map(|p| p / 100.0),
        None => cleaned.parse::<f64>(),
    };
    value.map_err(|_| CateringError::Format(format!("cannot read price from '{}'", text.trim())))
}

fn decode_entities(text: &str) -> String {
    text.replace("&pound;", "£")
        .replace("&#163;", "£")
        .replace("&amp;", "&")
        .replace("&nbsp;", " ")
}
