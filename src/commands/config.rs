use anyhow::Result;
use catering_estimator::config::Config;
use colored::Colorize;
use tracing::info;

/// Execute the config show command
///
/// Prints the effective configuration after defaults, file and environment are merged
pub fn show(cfg: &Config) -> Result<()> {
    info!("Displaying effective configuration");

    println!("{}", "Current Configuration:".bold());
    println!();

    let toml_string = toml::to_string_pretty(cfg)?;
    println!("{}", toml_string);
    Ok(())
}

/// Execute the config validate command
///
/// Loading already validated the configuration; this prints a summary
pub fn validate(cfg: &Config) -> Result<()> {
    info!("Configuration validation successful");

    println!("{}", "✓ Configuration is valid".green());
    println!();
    println!("{}", "Summary:");
    println!("  Price list:     {}", cfg.data.ingredients_path.display());
    println!("  Recipes:        {}", cfg.data.recipes_path.display());
    println!("  Stale after:    {} days", cfg.pricing.stale_after_days);
    println!("  Enabled feeds:  {}", enabled_feeds(cfg).join(", "));
    Ok(())
}

fn enabled_feeds(cfg: &Config) -> Vec<&str> {
    let mut feeds = Vec::new();
    if cfg.feeds.aldi.enabled {
        feeds.push("aldi");
    }
    if cfg.feeds.yasar_halim.enabled {
        feeds.push("yasar_halim");
    }
    if feeds.is_empty() {
        feeds.push("none");
    }
    feeds
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enabled_feeds() {
        let mut cfg = Config::default();
        assert_eq!(enabled_feeds(&cfg), vec!["aldi", "yasar_halim"]);

        cfg.feeds.aldi.enabled = false;
        cfg.feeds.yasar_halim.enabled = false;
        assert_eq!(enabled_feeds(&cfg), vec!["none"]);
    }

    #[test]
    fn test_config_renders_as_toml() {
        let rendered = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(rendered.contains("[feeds.aldi]"));
        assert!(rendered.contains("stale_after_days = 7"));
    }
}
