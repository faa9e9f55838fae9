//! Prompt requests and the structured-output contracts sent alongside them.

use serde::Serialize;
use serde_json::{json, Value};

use crate::error::{BridgeError, Result};

/// MIME type requested whenever an output contract is attached
pub const JSON_MIME_TYPE: &str = "application/json";

/// A response schema in the upstream `responseSchema` dialect
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OutputContract(Value);

impl OutputContract {
    pub fn new(schema: Value) -> Self {
        OutputContract(schema)
    }

    pub fn schema(&self) -> &Value {
        &self.0
    }

    /// Object with a `recipes` array of `{name, ingredients[], instructions[]}`
    pub fn recipes() -> Self {
        OutputContract(json!({
            "type": "OBJECT",
            "properties": {
                "recipes": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "name": { "type": "STRING" },
                            "ingredients": { "type": "ARRAY", "items": { "type": "STRING" } },
                            "instructions": { "type": "ARRAY", "items": { "type": "STRING" } }
                        },
                        "required": ["name", "ingredients", "instructions"]
                    }
                }
            }
        }))
    }

    /// Object with `red_wine` and `white_wine`, each `{name, reason}`
    pub fn wine_pairing() -> Self {
        let wine = json!({
            "type": "OBJECT",
            "properties": {
                "name": { "type": "STRING" },
                "reason": { "type": "STRING" }
            },
            "required": ["name", "reason"]
        });

        OutputContract(json!({
            "type": "OBJECT",
            "properties": {
                "red_wine": wine.clone(),
                "white_wine": wine
            },
            "required": ["red_wine", "white_wine"]
        }))
    }
}

/// A single prompt, optionally constrained to a structured output
#[derive(Debug, Clone, PartialEq)]
pub struct PromptRequest {
    prompt: String,
    output_contract: Option<OutputContract>,
}

impl PromptRequest {
    /// Plain-text request. Fails when the prompt is blank.
    pub fn text(prompt: impl Into<String>) -> Result<Self> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(BridgeError::InvalidInput(
                "Prompt text cannot be empty".to_string(),
            ));
        }

        Ok(PromptRequest {
            prompt,
            output_contract: None,
        })
    }

    /// Request whose answer must match `contract`
    pub fn structured(prompt: impl Into<String>, contract: OutputContract) -> Result<Self> {
        let mut request = Self::text(prompt)?;
        request.output_contract = Some(contract);
        Ok(request)
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn output_contract(&self) -> Option<&OutputContract> {
        self.output_contract.as_ref()
    }
}
