use crate::model::AiRecipe;
use crate::providers::{build_extraction_prompt, LlmProvider};
use log::{debug, info};
use serde_json::{Deserializer, Map, Value};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Ways the AI fallback can come back empty-handed.
///
/// None of these are fatal to an extraction; the orchestrator falls back to
/// whatever the markup heuristics found.
#[derive(Error, Debug)]
pub enum AiFallbackError {
    #[error("AI provider '{provider}' failed: {message}")]
    Provider { provider: String, message: String },

    #[error("AI provider '{0}' timed out")]
    Timeout(String),

    #[error("AI provider reported no recipe")]
    NoResult,

    #[error("No JSON object found in AI response")]
    NoJson,
}

/// Asks an external AI capability to read a recipe URL.
pub struct AiFallbackExtractor {
    provider: Arc<dyn LlmProvider>,
    timeout: Option<Duration>,
}

impl AiFallbackExtractor {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.provider_name()
    }

    /// One attempt, no retries.
    pub async fn extract(&self, url: &str) -> Result<AiRecipe, AiFallbackError> {
        info!(
            "Requesting AI extraction for {} via {}",
            url,
            self.provider.provider_name()
        );
        let prompt = build_extraction_prompt(url);

        let completion = self.provider.complete(&prompt);
        let result = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, completion)
                .await
                .map_err(|_| AiFallbackError::Timeout(self.provider.provider_name().to_string()))?,
            None => completion.await,
        };

        let raw = result.map_err(|e| AiFallbackError::Provider {
            provider: self.provider.provider_name().to_string(),
            message: e.to_string(),
        })?;
        debug!("AI response: {}", raw);

        parse_ai_response(&raw)
    }
}

/// Interpret the raw text returned by the AI capability.
///
/// A bare `null` (any case) means no recipe. Otherwise the first well-formed
/// JSON object anywhere in the text is used, ignoring prose and code fences.
/// Missing or malformed list fields become empty lists.
pub fn parse_ai_response(raw: &str) -> Result<AiRecipe, AiFallbackError> {
    if raw.trim().eq_ignore_ascii_case("null") {
        return Err(AiFallbackError::NoResult);
    }

    let object = first_json_object(raw).ok_or(AiFallbackError::NoJson)?;

    Ok(AiRecipe {
        ingredients: string_list(object.get("ingredients")),
        instructions: string_list(object.get("instructions")),
        prep_time: optional_text(object.get("prepTime")),
        cook_time: optional_text(object.get("cookTime")),
        servings: optional_text(object.get("servings")),
    })
}

fn first_json_object(raw: &str) -> Option<Map<String, Value>> {
    raw.char_indices()
        .filter(|(_, c)| *c == '{')
        .find_map(|(start, _)| {
            let mut stream = Deserializer::from_str(&raw[start..]).into_iter::<Value>();
            match stream.next() {
                Some(Ok(Value::Object(object))) => Some(object),
                _ => None,
            }
        })
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .filter(|s| !s.is_empty())
        .collect()
}

fn optional_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
