use catering_estimator::models::Unit;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "caterer", version, about = "Catering shopping-list and cost estimator")]
pub struct Cli {
    /// Configuration file path (defaults to ./caterer.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Estimate batches and build the shopping list for an event
    Plan {
        /// Number of guests
        #[arg(short, long)]
        guests: u32,

        /// Event type, e.g. buffet or canapes
        #[arg(short, long)]
        event: String,

        /// Comma-separated recipe names, e.g. "hummus, tabbouleh"
        #[arg(short, long)]
        recipes: String,

        /// Multiplier overrides, e.g. "hummus: 2, tabbouleh: 1.5"
        #[arg(short, long = "override", value_name = "OVERRIDES")]
        overrides: Option<String>,
    },

    /// Price-list maintenance
    Ingredient {
        #[command(subcommand)]
        action: IngredientCommands,
    },

    /// Recipe catalog maintenance
    Recipe {
        #[command(subcommand)]
        action: RecipeCommands,
    },

    /// Report recipes with unpriced ingredients and invalid price rows
    Audit,

    /// Refresh prices from the shop feeds
    Refresh {
        /// Only refresh rows of this shop
        #[arg(short, long)]
        shop: Option<String>,
    },

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand, Debug, Clone)]
pub enum IngredientCommands {
    /// Show one price-list row
    Show { name: String },

    /// List the price list
    List {
        /// Only rows of this shop
        #[arg(short, long)]
        shop: Option<String>,
    },

    /// Add a new ingredient
    Add {
        name: String,

        #[arg(short, long)]
        price: f64,

        /// kg, l, whole, pack, bunch, single or unknown
        #[arg(short, long)]
        unit: Unit,

        #[arg(short, long)]
        shop: String,
    },

    /// Change the price of an ingredient
    SetPrice { name: String, price: f64 },

    /// Change the unit of an ingredient
    SetUnit { name: String, unit: Unit },

    /// Mark an ingredient's price as checked today
    Touch { name: String },
}

#[derive(Subcommand, Debug, Clone)]
pub enum RecipeCommands {
    /// Show one recipe
    Show { name: String },

    /// List all recipes
    List,

    /// Add a new recipe
    Add {
        name: String,

        /// Quantity per batch, repeatable
        #[arg(short, long = "ingredient", value_name = "NAME=QTY", required = true)]
        ingredients: Vec<String>,

        /// Guests served per batch for an event type, repeatable
        #[arg(short, long = "portion", value_name = "EVENT=GUESTS")]
        portions: Vec<String>,
    },

    /// Cost of one batch at current prices
    Cost { name: String },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Display the effective configuration
    Show,

    /// Validate configuration file
    Validate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_plan() {
        let args = vec![
            "caterer", "plan", "--guests", "20", "--event", "buffet", "--recipes", "hummus, tabbouleh",
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Plan {
                guests,
                event,
                recipes,
                overrides,
            } => {
                assert_eq!(guests, 20);
                assert_eq!(event, "buffet");
                assert_eq!(recipes, "hummus, tabbouleh");
                assert!(overrides.is_none());
            }
            _ => panic!("Expected Plan command"),
        }
    }

    #[test]
    fn test_cli_parsing_plan_with_override() {
        let args = vec![
            "caterer", "plan", "-g", "20", "-e", "buffet", "-r", "hummus", "--override", "hummus: 2",
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Plan { overrides, .. } => {
                assert_eq!(overrides.as_deref(), Some("hummus: 2"));
            }
            _ => panic!("Expected Plan command"),
        }
    }

    #[test]
    fn test_cli_rejects_negative_guests() {
        let args = vec!["caterer", "plan", "--guests", "-3", "--event", "buffet", "--recipes", "hummus"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_cli_parsing_ingredient_add() {
        let args = vec![
            "caterer", "ingredient", "add", "Chickpeas", "--price", "1.5", "--unit", "KG", "--shop", "aldi",
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Ingredient {
                action: IngredientCommands::Add { name, price, unit, shop },
            } => {
                assert_eq!(name, "Chickpeas");
                assert_eq!(price, 1.5);
                assert_eq!(unit, Unit::Kg);
                assert_eq!(shop, "aldi");
            }
            _ => panic!("Expected Ingredient Add command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_unit() {
        let args = vec!["caterer", "ingredient", "set-unit", "tahini", "jar"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_cli_parsing_recipe_add() {
        let args = vec![
            "caterer", "recipe", "add", "hummus", "-i", "chickpeas=0.25", "-i", "tahini=0.5", "-p",
            "buffet=10",
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Recipe {
                action: RecipeCommands::Add { ingredients, portions, .. },
            } => {
                assert_eq!(ingredients, vec!["chickpeas=0.25", "tahini=0.5"]);
                assert_eq!(portions, vec!["buffet=10"]);
            }
            _ => panic!("Expected Recipe Add command"),
        }
    }

    #[test]
    fn test_cli_parsing_refresh_and_config() {
        let cli = Cli::try_parse_from(vec!["caterer", "refresh", "--shop", "aldi"]).unwrap();
        assert!(matches!(cli.command, Commands::Refresh { shop: Some(ref s) } if s == "aldi"));

        let cli = Cli::try_parse_from(vec!["caterer", "-c", "alt.toml", "config", "show"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("alt.toml")));
        assert!(matches!(
            cli.command,
            Commands::Config { action: ConfigCommands::Show }
        ));
    }
}
