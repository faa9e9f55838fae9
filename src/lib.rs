//! Recipe ideas, ingredient substitutes and wine pairings from Gemini.
//!
//! [`PromptBridge`] turns domain inputs into prompts, sends them with an
//! optional structured-output contract, and decodes the answer into typed
//! values. Credentials come from server-side configuration only.

pub mod bridge;
pub mod builder;
pub mod config;
pub mod contract;
pub mod error;
pub mod model;
pub mod prompts;
pub mod providers;
pub mod store;

pub use bridge::PromptBridge;
pub use builder::PromptBridgeBuilder;
pub use config::BridgeConfig;
pub use contract::{OutputContract, PromptRequest};
pub use error::BridgeError;
pub use model::{GeneratedRecipe, PlaceholderImages, SubstitutionText, WinePairing, WineSuggestion};
pub use providers::{GoogleProvider, LlmProvider};
pub use store::{InMemoryRecipeStore, RecipeStore, SavedRecipe, StoreError, UserScope};

use std::sync::OnceLock;

static PLACEHOLDER_IMAGES: OnceLock<PlaceholderImages> = OnceLock::new();

/// Rotation shared by every convenience call in the process. The URL list of
/// the first loaded config is kept; later changes to it are not picked up.
fn placeholder_images(urls: Vec<String>) -> &'static PlaceholderImages {
    PLACEHOLDER_IMAGES.get_or_init(|| PlaceholderImages::new(urls))
}

/// Generate recipe ideas using configuration from `config.toml` and the environment
///
/// Placeholder images keep rotating across calls instead of restarting at
/// the same URL each time.
///
/// # Example
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let recipes = recipe_ideas::generate_recipe_ideas("2 eggs, flour, milk").await?;
/// for recipe in recipes {
///     println!("{}", recipe.name);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn generate_recipe_ideas(ingredients_text: &str) -> error::Result<Vec<GeneratedRecipe>> {
    let config = BridgeConfig::load()?;
    let recipes = PromptBridge::from_config(&config)?
        .generate_recipe_ideas(ingredients_text)
        .await?;
    Ok(placeholder_images(config.placeholder_images).assign(recipes))
}

/// Suggest substitutes for an ingredient using loaded configuration
pub async fn suggest_substitutes(ingredient_name: &str) -> error::Result<SubstitutionText> {
    let config = BridgeConfig::load()?;
    PromptBridge::from_config(&config)?
        .suggest_substitutes(ingredient_name)
        .await
}

/// Suggest a red and a white wine for a dish using loaded configuration
pub async fn suggest_wine_pairing(
    recipe_name: &str,
    ingredient_names: &[String],
) -> error::Result<WinePairing> {
    let config = BridgeConfig::load()?;
    PromptBridge::from_config(&config)?
        .suggest_wine_pairing(recipe_name, ingredient_names)
        .await
}
