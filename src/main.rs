use log::error;
use std::env;

use recipe_ideas::{BridgeConfig, PlaceholderImages, PromptBridge};

const USAGE: &str = "Usage:
  recipe-ideas recipes <ingredients...>
  recipe-ideas substitute <ingredient>
  recipe-ideas wine <recipe name> <ingredient>...";

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(e) = run().await {
        error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().skip(1).collect();
    let (command, rest) = args.split_first().ok_or(USAGE)?;

    let config = BridgeConfig::load()?;
    let bridge = PromptBridge::from_config(&config)?;

    match command.as_str() {
        "recipes" => {
            let ingredients = rest.join(" ");
            let recipes = bridge.generate_recipe_ideas(&ingredients).await?;
            let recipes = PlaceholderImages::new(config.placeholder_images).assign(recipes);
            if recipes.is_empty() {
                println!("No recipes found.");
            } else {
                println!("{}", serde_json::to_string_pretty(&recipes)?);
            }
        }
        "substitute" => {
            let ingredient = rest.join(" ");
            let suggestions = bridge.suggest_substitutes(&ingredient).await?;
            println!("{}", suggestions);
        }
        "wine" => {
            let (recipe_name, ingredients) = rest.split_first().ok_or(USAGE)?;
            let pairing = bridge.suggest_wine_pairing(recipe_name, ingredients).await?;
            println!("{}", serde_json::to_string_pretty(&pairing)?);
        }
        _ => return Err(USAGE.into()),
    }

    Ok(())
}
