pub mod builder;
pub mod config;
pub mod duration;
pub mod error;
pub mod extractors;
pub mod fetcher;
pub mod model;
pub mod pipelines;
pub mod providers;

pub use crate::builder::{RecipeScraper, RecipeScraperBuilder};
pub use crate::config::{load_config, AiConfig, ProviderConfig, ScraperConfig};
pub use crate::duration::{parse_duration, parse_duration_str};
pub use crate::error::ScrapeError;
pub use crate::extractors::{AiFallbackError, AiFallbackExtractor, HtmlClassExtractor, JsonLdExtractor};
pub use crate::model::{AiRecipe, Recipe, ScrapedRecipe, UNTITLED_RECIPE};
pub use crate::pipelines::{merge_ai_result, Extraction, ExtractionMethod};
pub use crate::providers::{LlmProvider, ProviderFactory};

/// Scrape a recipe using configuration from `recipe-scraper.toml` and the
/// environment.
///
/// # Example
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let recipe = recipe_scraper::scrape_recipe("https://example.com/recipe").await?;
/// println!("{} ({} ingredients)", recipe.title, recipe.ingredients.len());
/// # Ok(())
/// # }
/// ```
pub async fn scrape_recipe(url: &str) -> Result<ScrapedRecipe, ScrapeError> {
    let config = load_config()?;
    RecipeScraper::from_config(&config)?.scrape(url).await
}
