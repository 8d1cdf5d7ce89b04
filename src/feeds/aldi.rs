use super::{capture, fetch_search_page, parse_money, PriceFeed};
use crate::config::FeedConfig;
use crate::error::{CateringError, Result};
use crate::models::{PriceQuote, Unit};
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::debug;

/// Per-unit price label of the first product tile on a search page
static PRICE_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)data-qa="product-price"[^>]*>\s*(?:<span[^>]*>\s*)*([^<]+?)\s*<"#).unwrap()
});

/// Aldi price feed
///
/// Reads the per-unit label Aldi prints under each product (`£1.50 per kg`,
/// `£0.20 per 100ml`, ...) rather than the shelf price, so the quote is
/// already expressed in one of the price-list units.
pub struct AldiFeed {
    config: FeedConfig,
}

impl AldiFeed {
    pub fn new(config: FeedConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl PriceFeed for AldiFeed {
    fn name(&self) -> &str {
        "aldi"
    }

    fn shop(&self) -> &str {
        &self.config.shop
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_seconds)
    }

    async fn fetch(&self, client: &Client, ingredient: &str) -> Result<PriceQuote> {
        let page = fetch_search_page(client, &self.config, ingredient).await?;
        let label = capture(&PRICE_LABEL_RE, &page).ok_or_else(|| {
            CateringError::Format(format!("no price label for '{}' on Aldi page", ingredient))
        })?;
        debug!("Aldi label for '{}': {}", ingredient, label);
        parse_price_label(&label)
    }
}

/// Turn an Aldi per-unit label into a quote
///
/// | label              | quote        |
/// |--------------------|--------------|
/// | `£1.50 per kg`     | 1.50 / kg    |
/// | `£0.99 each`       | 0.99 / whole |
/// | `£0.20 per 100ml`  | 2.00 / l     |
/// | `£0.25 per 100g`   | 2.50 / kg    |
pub fn parse_price_label(label: &str) -> Result<PriceQuote> {
    let normalized = label.trim().to_lowercase();
    let unaccounted = || CateringError::Format(format!("unaccounted unit in label '{}'", label.trim()));

    if let Some(price) = normalized.strip_suffix("each") {
        return PriceQuote::new(parse_money(price)?, Unit::Whole);
    }

    let (price, per) = normalized.split_once(" per ").ok_or_else(unaccounted)?;
    let price = parse_money(price)?;
    let per = per.replace(' ', "");

    match per.as_str() {
        "kg" => PriceQuote::new(price, Unit::Kg),
        "l" | "litre" | "liter" => PriceQuote::new(price, Unit::L),
        "100ml" => PriceQuote::new(price * 10.0, Unit::L),
        "100g" => PriceQuote::new(price * 10.0, Unit::Kg),
        _ => Err(unaccounted()),
    }
}
