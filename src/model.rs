use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Title used when a page offers nothing better.
pub const UNTITLED_RECIPE: &str = "Untitled Recipe";

/// Structured result of a single extraction call.
///
/// Ingredient and instruction order is the order found on the page and is
/// never rearranged by any strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedRecipe {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<String>,
}

impl Default for ScrapedRecipe {
    fn default() -> Self {
        Self {
            title: UNTITLED_RECIPE.to_string(),
            description: None,
            cover_image: None,
            images: Vec::new(),
            ingredients: Vec::new(),
            instructions: Vec::new(),
            prep_time: None,
            cook_time: None,
            total_time: None,
            servings: None,
        }
    }
}

impl ScrapedRecipe {
    /// Both ingredients and instructions were found.
    pub fn is_complete(&self) -> bool {
        !self.ingredients.is_empty() && !self.instructions.is_empty()
    }

    /// At least one of ingredients or instructions was found.
    pub fn has_content(&self) -> bool {
        !self.ingredients.is_empty() || !self.instructions.is_empty()
    }
}

/// What the AI fallback hands back once its raw text has been parsed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AiRecipe {
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub prep_time: Option<String>,
    pub cook_time: Option<String>,
    pub servings: Option<String>,
}

/// A saved recipe, built from a [`ScrapedRecipe`] once it has an identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: Uuid,
    pub url: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    pub images: Vec<String>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Recipe {
    /// Assign an id and timestamps to a freshly scraped recipe.
    pub fn from_scraped(url: &str, scraped: ScrapedRecipe, tags: Vec<String>) -> Self {
        let now = Utc::now().to_rfc3339();

        Recipe {
            id: Uuid::new_v4(),
            url: url.to_string(),
            title: scraped.title,
            description: scraped.description,
            cover_image: scraped.cover_image,
            images: scraped.images,
            ingredients: scraped.ingredients,
            instructions: scraped.instructions,
            tags,
            prep_time: scraped.prep_time,
            cook_time: scraped.cook_time,
            total_time: scraped.total_time,
            servings: scraped.servings,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}
