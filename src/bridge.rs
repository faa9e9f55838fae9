use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;

use crate::config::BridgeConfig;
use crate::contract::{OutputContract, PromptRequest};
use crate::error::{BridgeError, Result};
use crate::model::{GeneratedRecipe, SubstitutionText, WinePairing};
use crate::prompts;
use crate::providers::{GoogleProvider, LlmProvider};

/// Typed bridge between prompts, output contracts and application data.
///
/// Holds no per-call state, so one instance can serve concurrent callers.
#[derive(Clone)]
pub struct PromptBridge {
    provider: Arc<dyn LlmProvider>,
}

#[derive(Debug, Deserialize)]
struct RecipeIdeas {
    #[serde(default)]
    recipes: Option<Vec<RecipeIdea>>,
}

/// Recipe as the model returns it. Any extra fields (e.g. an image) are ignored.
#[derive(Debug, Deserialize)]
struct RecipeIdea {
    name: String,
    ingredients: Vec<String>,
    instructions: Vec<String>,
}

impl From<RecipeIdea> for GeneratedRecipe {
    fn from(idea: RecipeIdea) -> Self {
        GeneratedRecipe {
            name: idea.name,
            ingredients: idea.ingredients,
            instructions: idea.instructions,
            image_url: None,
        }
    }
}

impl PromptBridge {
    pub fn new(provider: impl LlmProvider + 'static) -> Self {
        PromptBridge {
            provider: Arc::new(provider),
        }
    }

    pub(crate) fn from_shared(provider: Arc<dyn LlmProvider>) -> Self {
        PromptBridge { provider }
    }

    /// Bridge backed by Gemini, configured from `config`
    pub fn from_config(config: &BridgeConfig) -> Result<Self> {
        Ok(Self::new(GoogleProvider::new(config)?))
    }

    pub fn builder() -> crate::builder::PromptBridgeBuilder {
        crate::builder::PromptBridgeBuilder::default()
    }

    pub fn provider_name(&self) -> &str {
        self.provider.provider_name()
    }

    /// Send one request and return the raw text of the first candidate
    pub async fn request_completion(&self, request: &PromptRequest) -> Result<String> {
        self.provider.complete(request).await
    }

    /// Ask for three recipe ideas that use `ingredients_text`.
    ///
    /// A response without a `recipes` field yields an empty list. Recipes
    /// missing a name, ingredients or instructions are dropped.
    pub async fn generate_recipe_ideas(
        &self,
        ingredients_text: &str,
    ) -> Result<Vec<GeneratedRecipe>> {
        if ingredients_text.trim().is_empty() {
            return Err(BridgeError::InvalidInput(
                "Ingredients cannot be empty".to_string(),
            ));
        }

        let request = PromptRequest::structured(
            prompts::recipe_ideas_prompt(ingredients_text),
            OutputContract::recipes(),
        )?;
        let raw = self.request_completion(&request).await?;
        let ideas: RecipeIdeas = decode(&raw)?;

        let recipes = ideas.recipes.unwrap_or_default();
        let total = recipes.len();
        let complete: Vec<GeneratedRecipe> = recipes
            .into_iter()
            .map(GeneratedRecipe::from)
            .filter(|recipe| {
                let keep = recipe.is_complete();
                if !keep {
                    warn!("Dropping incomplete recipe '{}'", recipe.name);
                }
                keep
            })
            .collect();

        info!("Generated {} recipe ideas ({} returned)", complete.len(), total);
        Ok(complete)
    }

    /// Ask for 3-4 substitutes for `ingredient_name`, formatted for inline display
    pub async fn suggest_substitutes(&self, ingredient_name: &str) -> Result<SubstitutionText> {
        if ingredient_name.trim().is_empty() {
            return Err(BridgeError::InvalidInput(
                "Ingredient name cannot be empty".to_string(),
            ));
        }

        let request = PromptRequest::text(prompts::substitutes_prompt(ingredient_name))?;
        let raw = self.request_completion(&request).await?;
        Ok(SubstitutionText::from_raw(&raw))
    }

    /// Ask for one red and one white wine matching the dish
    pub async fn suggest_wine_pairing(
        &self,
        recipe_name: &str,
        ingredient_names: &[String],
    ) -> Result<WinePairing> {
        if recipe_name.trim().is_empty() {
            return Err(BridgeError::InvalidInput(
                "Recipe name cannot be empty".to_string(),
            ));
        }

        let request = PromptRequest::structured(
            prompts::wine_pairing_prompt(recipe_name, ingredient_names),
            OutputContract::wine_pairing(),
        )?;
        let raw = self.request_completion(&request).await?;
        decode(&raw)
    }
}

impl std::fmt::Debug for PromptBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptBridge")
            .field("provider", &self.provider.provider_name())
            .finish()
    }
}

/// Validate `raw` against the expected result type in a single parse
fn decode<T: DeserializeOwned>(raw: &str) -> Result<T> {
    serde_json::from_str(raw).map_err(|source| {
        debug!("Response did not match contract: {}", raw);
        BridgeError::Decode {
            source,
            raw: raw.to_string(),
        }
    })
}
