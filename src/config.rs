use crate::models::normalize_key;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file read when `--config` is not given; missing is fine
pub const DEFAULT_CONFIG_FILE: &str = "caterer.toml";

/// Prefix of environment overrides, e.g. `CATERER__PRICING__STALE_AFTER_DAYS=14`
pub const ENV_PREFIX: &str = "CATERER";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    pub data: DataConfig,
    pub pricing: PricingConfig,
    pub feeds: FeedsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DataConfig {
    pub ingredients_path: PathBuf,
    pub recipes_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PricingConfig {
    /// Rows older than this many days are reported as stale
    pub stale_after_days: i64,
    pub currency_symbol: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeedsConfig {
    pub aldi: FeedConfig,
    pub yasar_halim: FeedConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeedConfig {
    pub enabled: bool,
    /// Price-list shop name this feed refreshes
    pub shop: String,
    pub base_url: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    /// "text" or "json"
    pub format: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            ingredients_path: PathBuf::from("ingredients.json"),
            recipes_path: PathBuf::from("recipes.json"),
        }
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            stale_after_days: 7,
            currency_symbol: "£".to_string(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            shop: String::new(),
            base_url: String::new(),
            timeout_seconds: 30,
        }
    }
}

impl Default for FeedsConfig {
    fn default() -> Self {
        Self {
            aldi: FeedConfig {
                shop: "aldi".to_string(),
                base_url: "https://www.aldi.co.uk".to_string(),
                ..FeedConfig::default()
            },
            yasar_halim: FeedConfig {
                shop: "yasar halim".to_string(),
                base_url: "https://www.yasarhalim.com".to_string(),
                ..FeedConfig::default()
            },
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

/// Load configuration: built-in defaults, then the TOML file, then `CATERER__*` env vars
///
/// An explicit `path` must exist; the default `caterer.toml` is optional.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false),
    };

    let config = config::Config::builder()
        .add_source(config::Config::try_from(&Config::default())?)
        .add_source(file)
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?;

    let cfg: Config = config.try_deserialize()?;
    validate_config(&cfg)?;

    Ok(cfg)
}

pub fn validate_config(cfg: &Config) -> anyhow::Result<()> {
    if cfg.data.ingredients_path.as_os_str().is_empty() {
        anyhow::bail!("data.ingredients_path cannot be empty");
    }
    if cfg.data.recipes_path.as_os_str().is_empty() {
        anyhow::bail!("data.recipes_path cannot be empty");
    }
    if cfg.data.ingredients_path == cfg.data.recipes_path {
        anyhow::bail!("data.ingredients_path and data.recipes_path must be different files");
    }

    if cfg.pricing.stale_after_days < 0 {
        anyhow::bail!("pricing.stale_after_days cannot be negative");
    }

    // Each enabled feed must own a disjoint set of price list rows
    let mut claimed: Vec<(&str, String)> = Vec::new();
    for (name, feed) in [("aldi", &cfg.feeds.aldi), ("yasar_halim", &cfg.feeds.yasar_halim)] {
        if !feed.enabled {
            continue;
        }
        if feed.base_url.trim().is_empty() {
            anyhow::bail!("Feed '{}' is enabled but has no base_url", name);
        }
        if !feed.base_url.starts_with("http://") && !feed.base_url.starts_with("https://") {
            anyhow::bail!("Feed '{}' base_url must be an http(s) URL: {}", name, feed.base_url);
        }
        if feed.shop.trim().is_empty() {
            anyhow::bail!("Feed '{}' is enabled but has no shop", name);
        }
        if feed.timeout_seconds == 0 {
            anyhow::bail!("Feed '{}' timeout_seconds must be greater than 0", name);
        }
        let shop = normalize_key(&feed.shop);
        if let Some((other, _)) = claimed.iter().find(|(_, s)| *s == shop) {
            anyhow::bail!("Feeds '{}' and '{}' both refresh shop '{}'", other, name, shop);
        }
        claimed.push((name, shop));
    }

    match cfg.logging.format.as_str() {
        "text" | "json" => {}
        other => anyhow::bail!("Invalid logging.format '{}': expected 'text' or 'json'", other),
    }

    Ok(())
}
