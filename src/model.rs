use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::config::default_placeholder_images;

/// A recipe idea proposed by the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedRecipe {
    pub name: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    /// Assigned by the caller, never by the model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl GeneratedRecipe {
    /// A recipe is complete when it has a name, ingredients and instructions
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.ingredients.is_empty()
            && !self.instructions.is_empty()
    }
}

/// A single wine suggestion with the reason it pairs well
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WineSuggestion {
    pub name: String,
    pub reason: String,
}

/// One red and one white wine for a dish
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinePairing {
    pub red_wine: WineSuggestion,
    pub white_wine: WineSuggestion,
}

/// Substitute suggestions with newlines turned into `<br>` markers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutionText(String);

impl SubstitutionText {
    pub const LINE_BREAK: &'static str = "<br>";

    /// Build from raw model output, replacing every `\n` with [`Self::LINE_BREAK`]
    pub fn from_raw(raw: &str) -> Self {
        SubstitutionText(raw.replace('\n', Self::LINE_BREAK))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for SubstitutionText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hands out image URLs to generated recipes in rotation.
///
/// The cursor moves before each assignment and survives across calls, so
/// consecutive batches keep cycling through the list.
#[derive(Debug)]
pub struct PlaceholderImages {
    urls: Vec<String>,
    cursor: AtomicUsize,
}

impl PlaceholderImages {
    pub fn new(urls: Vec<String>) -> Self {
        Self {
            urls,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Set `image_url` on every recipe. With no URLs configured the recipes are returned as-is.
    pub fn assign(&self, recipes: Vec<GeneratedRecipe>) -> Vec<GeneratedRecipe> {
        if self.urls.is_empty() {
            return recipes;
        }

        recipes
            .into_iter()
            .map(|mut recipe| {
                let index = self.advance();
                recipe.image_url = Some(self.urls[index].clone());
                recipe
            })
            .collect()
    }

    fn advance(&self) -> usize {
        let len = self.urls.len();
        let previous = self
            .cursor
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |i| Some((i + 1) % len))
            .unwrap_or(0);
        (previous + 1) % len
    }
}

impl Default for PlaceholderImages {
    fn default() -> Self {
        Self::new(default_placeholder_images())
    }
}
