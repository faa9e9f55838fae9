//! Persistence boundary for recipes a user chose to keep.
//!
//! Documents live under `artifacts/{app_id}/users/{user_id}/recipes`. The
//! real document database is owned by the embedding application; this module
//! defines the interface and an in-memory implementation.

use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tokio::sync::RwLock;

use crate::config::BridgeConfig;
use crate::model::GeneratedRecipe;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    #[error("Recipe not found: {0}")]
    NotFound(String),

    #[error("Invalid user scope: {0}")]
    InvalidScope(String),
}

/// Identifies whose recipes are being accessed
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserScope {
    app_id: String,
    user_id: String,
}

impl UserScope {
    pub fn new(app_id: impl Into<String>, user_id: impl Into<String>) -> Result<Self, StoreError> {
        let app_id = app_id.into();
        let user_id = user_id.into();

        for (label, value) in [("app id", &app_id), ("user id", &user_id)] {
            if value.trim().is_empty() || value.contains('/') {
                return Err(StoreError::InvalidScope(format!(
                    "{} must be non-empty and contain no '/': {:?}",
                    label, value
                )));
            }
        }

        Ok(UserScope { app_id, user_id })
    }

    /// Scope for `user_id` under the configured application id
    pub fn from_config(
        config: &BridgeConfig,
        user_id: impl Into<String>,
    ) -> Result<Self, StoreError> {
        Self::new(config.app_id.clone(), user_id)
    }

    pub fn collection_path(&self) -> String {
        format!("artifacts/{}/users/{}/recipes", self.app_id, self.user_id)
    }

    pub fn document_path(&self, recipe_id: &str) -> String {
        format!("{}/{}", self.collection_path(), recipe_id)
    }
}

/// A recipe as stored, with the id the store assigned to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedRecipe {
    pub id: String,
    #[serde(flatten)]
    pub recipe: GeneratedRecipe,
}

#[async_trait]
pub trait RecipeStore: Send + Sync {
    async fn save(
        &self,
        scope: &UserScope,
        recipe: GeneratedRecipe,
    ) -> Result<SavedRecipe, StoreError>;

    async fn list(&self, scope: &UserScope) -> Result<Vec<SavedRecipe>, StoreError>;

    async fn delete(&self, scope: &UserScope, recipe_id: &str) -> Result<(), StoreError>;
}

/// Keeps documents in memory, keyed by collection path
#[derive(Debug, Default)]
pub struct InMemoryRecipeStore {
    collections: RwLock<HashMap<String, Vec<SavedRecipe>>>,
    next_id: AtomicU64,
}

impl InMemoryRecipeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecipeStore for InMemoryRecipeStore {
    async fn save(
        &self,
        scope: &UserScope,
        recipe: GeneratedRecipe,
    ) -> Result<SavedRecipe, StoreError> {
        let id = format!("recipe-{}", self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let saved = SavedRecipe { id, recipe };

        debug!("Saving {}", scope.document_path(&saved.id));
        self.collections
            .write()
            .await
            .entry(scope.collection_path())
            .or_default()
            .push(saved.clone());

        Ok(saved)
    }

    async fn list(&self, scope: &UserScope) -> Result<Vec<SavedRecipe>, StoreError> {
        Ok(self
            .collections
            .read()
            .await
            .get(&scope.collection_path())
            .cloned()
            .unwrap_or_default())
    }

    async fn delete(&self, scope: &UserScope, recipe_id: &str) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let documents = collections
            .get_mut(&scope.collection_path())
            .ok_or_else(|| StoreError::NotFound(scope.document_path(recipe_id)))?;

        let position = documents
            .iter()
            .position(|doc| doc.id == recipe_id)
            .ok_or_else(|| StoreError::NotFound(scope.document_path(recipe_id)))?;

        documents.remove(position);
        debug!("Deleted {}", scope.document_path(recipe_id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(name: &str) -> GeneratedRecipe {
        GeneratedRecipe {
            name: name.to_string(),
            ingredients: vec!["rice".to_string()],
            instructions: vec!["Cook".to_string()],
            image_url: Some("https://example.com/rice.jpg".to_string()),
        }
    }

    #[test]
    fn test_paths() {
        let scope = UserScope::new("default-app-id", "user-1").unwrap();
        assert_eq!(
            scope.collection_path(),
            "artifacts/default-app-id/users/user-1/recipes"
        );
        assert_eq!(
            scope.document_path("abc"),
            "artifacts/default-app-id/users/user-1/recipes/abc"
        );
    }

    #[test]
    fn test_scope_from_config_uses_app_id() {
        let scope = UserScope::from_config(&BridgeConfig::default(), "user-1").unwrap();
        assert_eq!(
            scope.collection_path(),
            "artifacts/default-app-id/users/user-1/recipes"
        );

        let config = BridgeConfig {
            app_id: "meal-planner".to_string(),
            ..Default::default()
        };
        let scope = UserScope::from_config(&config, "user-1").unwrap();
        assert_eq!(
            scope.document_path("r1"),
            "artifacts/meal-planner/users/user-1/recipes/r1"
        );

        let config = BridgeConfig {
            app_id: String::new(),
            ..Default::default()
        };
        assert!(UserScope::from_config(&config, "user-1").is_err());
    }

    #[test]
    fn test_invalid_scope() {
        assert!(UserScope::new("", "user-1").is_err());
        assert!(UserScope::new("app", "a/b").is_err());
    }

    #[test]
    fn test_saved_recipe_serializes_flat() {
        let saved = SavedRecipe {
            id: "recipe-1".to_string(),
            recipe: recipe("Rice"),
        };
        let value = serde_json::to_value(&saved).unwrap();
        assert_eq!(value["id"], "recipe-1");
        assert_eq!(value["name"], "Rice");
        assert_eq!(value["image_url"], "https://example.com/rice.jpg");
    }

    #[tokio::test]
    async fn test_save_list_delete() {
        let store = InMemoryRecipeStore::new();
        let scope = UserScope::new("app", "user-1").unwrap();

        let first = store.save(&scope, recipe("Rice")).await.unwrap();
        let second = store.save(&scope, recipe("Risotto")).await.unwrap();
        assert_ne!(first.id, second.id);

        let listed = store.list(&scope).await.unwrap();
        assert_eq!(listed, vec![first.clone(), second.clone()]);

        store.delete(&scope, &first.id).await.unwrap();
        assert_eq!(store.list(&scope).await.unwrap(), vec![second]);

        assert_eq!(
            store.delete(&scope, &first.id).await,
            Err(StoreError::NotFound(scope.document_path(&first.id)))
        );
    }

    #[tokio::test]
    async fn test_scopes_are_isolated() {
        let store = InMemoryRecipeStore::new();
        let alice = UserScope::new("app", "alice").unwrap();
        let bob = UserScope::new("app", "bob").unwrap();

        let saved = store.save(&alice, recipe("Rice")).await.unwrap();
        assert!(store.list(&bob).await.unwrap().is_empty());
        assert!(store.delete(&bob, &saved.id).await.is_err());
        assert_eq!(store.list(&alice).await.unwrap().len(), 1);
    }
}
