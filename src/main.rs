use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use catering_estimator::{config, init_tracing};
use cli::{Commands, ConfigCommands, IngredientCommands, RecipeCommands};
use commands::Context;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = cli::Cli::parse();

    // Version needs no configuration
    if let Commands::Version = args.command {
        print_version();
        return Ok(());
    }

    let cfg = config::load_config(args.config.as_deref())?;
    init_tracing(&cfg.logging.level, &cfg.logging.format);

    let ctx = Context::open(cfg);

    // Dispatch to appropriate command handler
    match args.command {
        Commands::Plan {
            guests,
            event,
            recipes,
            overrides,
        } => {
            commands::plan::execute(&ctx, guests, &event, &recipes, overrides.as_deref())?;
        }
        Commands::Ingredient { action } => match action {
            IngredientCommands::Show { name } => commands::ingredient::show(&ctx, &name)?,
            IngredientCommands::List { shop } => {
                commands::ingredient::list(&ctx, shop.as_deref())?
            }
            IngredientCommands::Add {
                name,
                price,
                unit,
                shop,
            } => commands::ingredient::add(&ctx, &name, price, unit, &shop)?,
            IngredientCommands::SetPrice { name, price } => {
                commands::ingredient::set_price(&ctx, &name, price)?
            }
            IngredientCommands::SetUnit { name, unit } => {
                commands::ingredient::set_unit(&ctx, &name, unit)?
            }
            IngredientCommands::Touch { name } => commands::ingredient::touch(&ctx, &name)?,
        },
        Commands::Recipe { action } => match action {
            RecipeCommands::Show { name } => commands::recipe::show(&ctx, &name)?,
            RecipeCommands::List => commands::recipe::list(&ctx)?,
            RecipeCommands::Add {
                name,
                ingredients,
                portions,
            } => commands::recipe::add(&ctx, &name, &ingredients, &portions)?,
            RecipeCommands::Cost { name } => commands::recipe::cost(&ctx, &name)?,
        },
        Commands::Audit => commands::audit::execute(&ctx)?,
        Commands::Refresh { shop } => {
            commands::refresh::execute(&ctx, shop.as_deref()).await?;
        }
        Commands::Config { action } => match action {
            ConfigCommands::Show => commands::config::show(&ctx.config)?,
            ConfigCommands::Validate => commands::config::validate(&ctx.config)?,
        },
        Commands::Version => print_version(),
    }

    Ok(())
}

fn print_version() {
    println!("caterer v{}", env!("CARGO_PKG_VERSION"));
}
