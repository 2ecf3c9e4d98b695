use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};

use crate::config::{default_ai_timeout, default_user_agent, ScraperConfig};
use crate::error::ScrapeError;
use crate::extractors::AiFallbackExtractor;
use crate::fetcher::RequestFetcher;
use crate::model::ScrapedRecipe;
use crate::pipelines::{self, Extraction};
use crate::providers::{LlmProvider, ProviderFactory};

/// Builder for configuring a [`RecipeScraper`]
#[derive(Default)]
pub struct RecipeScraperBuilder {
    timeout: Option<Duration>,
    user_agent: Option<String>,
    provider: Option<Arc<dyn LlmProvider>>,
    ai_timeout: Option<Duration>,
}

impl RecipeScraperBuilder {
    /// Set a timeout for page fetches
    ///
    /// # Example
    /// ```
    /// use recipe_scraper::RecipeScraper;
    /// use std::time::Duration;
    ///
    /// let builder = RecipeScraper::builder()
    ///     .timeout(Duration::from_secs(10));
    /// ```
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Set the user agent sent with page fetches
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the LLM provider used by the AI fallback
    ///
    /// Without a provider the AI step is skipped and partial markup results
    /// are returned as-is.
    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Bound the time spent waiting on the AI fallback (120 seconds unless set)
    pub fn ai_timeout(mut self, duration: Duration) -> Self {
        self.ai_timeout = Some(duration);
        self
    }

    /// Drop any provider set so far
    pub fn without_ai(mut self) -> Self {
        self.provider = None;
        self
    }

    /// Seed the builder from loaded configuration
    ///
    /// A provider that cannot be created (disabled, unknown, missing key)
    /// leaves the AI fallback unavailable rather than failing.
    pub fn from_config(config: &ScraperConfig) -> Self {
        let mut builder = Self::default()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(config.user_agent.clone())
            .ai_timeout(Duration::from_secs(config.ai.timeout));

        match ProviderFactory::get_default_provider(&config.ai) {
            Ok(provider) => {
                info!("AI fallback enabled via {}", provider.provider_name());
                builder.provider = Some(provider);
            }
            Err(e) => warn!("AI fallback unavailable: {}", e),
        }
        builder
    }

    /// Build the scraper
    ///
    /// # Errors
    /// Returns `ScrapeError` if the HTTP client cannot be constructed
    pub fn build(self) -> Result<RecipeScraper, ScrapeError> {
        let user_agent = self.user_agent.unwrap_or_else(default_user_agent);
        if user_agent.trim().is_empty() {
            return Err(ScrapeError::Builder(
                "User agent cannot be empty".to_string(),
            ));
        }

        let fetcher = RequestFetcher::new(self.timeout, &user_agent)?;
        let ai_timeout = self
            .ai_timeout
            .unwrap_or_else(|| Duration::from_secs(default_ai_timeout()));
        let ai = self
            .provider
            .map(|provider| AiFallbackExtractor::new(provider).with_timeout(ai_timeout));

        Ok(RecipeScraper { fetcher, ai })
    }
}

/// Main entry point for scraping recipes
pub struct RecipeScraper {
    fetcher: RequestFetcher,
    ai: Option<AiFallbackExtractor>,
}

impl RecipeScraper {
    /// Creates a new builder
    ///
    /// # Example
    /// ```
    /// use recipe_scraper::RecipeScraper;
    ///
    /// let scraper = RecipeScraper::builder().build();
    /// assert!(scraper.is_ok());
    /// ```
    pub fn builder() -> RecipeScraperBuilder {
        RecipeScraperBuilder::default()
    }

    pub fn from_config(config: &ScraperConfig) -> Result<Self, ScrapeError> {
        RecipeScraperBuilder::from_config(config).build()
    }

    pub fn has_ai_fallback(&self) -> bool {
        self.ai.is_some()
    }

    /// Fetch a page and extract the best recipe it offers
    ///
    /// Only a failed fetch is an error. A page without any recipe content
    /// yields a recipe with the placeholder title and empty lists.
    ///
    /// # Example
    /// ```no_run
    /// # use recipe_scraper::RecipeScraper;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let scraper = RecipeScraper::builder().build()?;
    /// let recipe = scraper.scrape("https://example.com/recipe").await?;
    /// println!("{}", recipe.title);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn scrape(&self, url: &str) -> Result<ScrapedRecipe, ScrapeError> {
        Ok(self.scrape_detailed(url).await?.recipe)
    }

    /// Like [`scrape`](Self::scrape), also reporting which strategy won
    pub async fn scrape_detailed(&self, url: &str) -> Result<Extraction, ScrapeError> {
        let extraction = pipelines::process(&self.fetcher, self.ai.as_ref(), url).await?;
        info!("Extracted recipe from {} using {}", url, extraction.method);
        Ok(extraction)
    }

    /// Run extraction on markup that was fetched elsewhere
    pub async fn extract_from_html(&self, html: &str, url: &str) -> Extraction {
        pipelines::extract_from_html(html, url, self.ai.as_ref()).await
    }
}
