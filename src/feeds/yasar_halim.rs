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

static PRICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)class="product-price"[^>]*>\s*(?:<[^>]+>\s*)*([^<]+?)\s*<"#).unwrap()
});
static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)class="product-name"[^>]*>\s*(?:<[^>]+>\s*)*([^<]+?)\s*<"#).unwrap()
});

/// Packs lighter than this are sold as a pack rather than priced by weight
const MIN_WEIGHED_GRAMS: f64 = 100.0;

/// Yasar Halim price feed
///
/// The site only shows a shelf price, so the unit comes from the product
/// name (`Parsley Bunch`, `Tahini 500G`, `Rice 2Kg`).
pub struct YasarHalimFeed {
    config: FeedConfig,
}

impl YasarHalimFeed {
    pub fn new(config: FeedConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl PriceFeed for YasarHalimFeed {
    fn name(&self) -> &str {
        "yasar_halim"
    }

    fn shop(&self) -> &str {
        &self.config.shop
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_seconds)
    }

    async fn fetch(&self, client: &Client, ingredient: &str) -> Result<PriceQuote> {
        let page = fetch_search_page(client, &self.config, ingredient).await?;

        let missing = |what: &str| {
            CateringError::Format(format!(
                "no {} for '{}' on Yasar Halim page",
                what, ingredient
            ))
        };
        let price = capture(&PRICE_RE, &page).ok_or_else(|| missing("product price"))?;
        let name = capture(&NAME_RE, &page).ok_or_else(|| missing("product name"))?;
        debug!("Yasar Halim product for '{}': {} at {}", ingredient, name, price);

        parse_product(&name, parse_money(&price)?)
    }
}

static WEIGHT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+(?:\.\d+)?)\s?(kg|gr|g)\b").unwrap());

/// Derive the unit from a product name and express `price` in it
///
/// Sale words win over weights (`Mint Bunch 100G` is a bunch). Weights of at
/// least 100 g are converted to a price per kg; lighter packs stay a pack.
/// Names with neither become `unknown` so the audit can flag them.
pub fn parse_product(name: &str, price: f64) -> Result<PriceQuote> {
    for word in name.split_whitespace() {
        let unit = match word.to_lowercase().as_str() {
            "each" => Some(Unit::Whole),
            "single" => Some(Unit::Single),
            "bunch" => Some(Unit::Bunch),
            "pack" => Some(Unit::Pack),
            _ => None,
        };
        if let Some(unit) = unit {
            return PriceQuote::new(price, unit);
        }
    }

    let Some(caps) = WEIGHT_RE.captures(name) else {
        return PriceQuote::new(price, Unit::Unknown);
    };
    let amount: f64 = caps[1]
        .parse()
        .map_err(|_| CateringError::Format(format!("bad weight in '{}'", name)))?;
    if amount <= 0.0 {
        return Err(CateringError::Format(format!("zero weight in '{}'", name)));
    }

    if caps[2].eq_ignore_ascii_case("kg") {
        PriceQuote::new(price / amount, Unit::Kg)
    } else if amount >= MIN_WEIGHED_GRAMS {
        PriceQuote::new(price * 1000.0 / amount, Unit::Kg)
    } else {
        PriceQuote::new(price, Unit::Pack)
    }
}
