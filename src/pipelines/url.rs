use crate::error::ScrapeError;
use crate::extractors::{
    AiFallbackExtractor, Extractor, HtmlClassExtractor, JsonLdExtractor, ParsingContext,
};
use crate::fetcher::RequestFetcher;
use crate::model::{AiRecipe, ScrapedRecipe};
use log::{debug, info, warn};
use std::fmt;
use std::ops::ControlFlow;
use url::Url;

/// Which step of the pipeline produced the final recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMethod {
    /// Embedded JSON-LD Recipe with ingredients
    JsonLd,
    /// Markup heuristics found both ingredients and instructions
    HtmlClass,
    /// AI fallback content merged over the markup heuristics
    AiFallback,
    /// Whatever the markup heuristics found, possibly empty
    HtmlPartial,
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExtractionMethod::JsonLd => "json_ld",
            ExtractionMethod::HtmlClass => "html_class",
            ExtractionMethod::AiFallback => "ai_fallback",
            ExtractionMethod::HtmlPartial => "html_partial",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub recipe: ScrapedRecipe,
    pub method: ExtractionMethod,
}

/// Fetch a URL and extract a recipe from it
///
/// This pipeline:
/// 1. Fetches HTML using RequestFetcher (failure here is the only error)
/// 2. Runs the extraction state machine in [`extract_from_html`]
pub async fn process(
    fetcher: &RequestFetcher,
    ai: Option<&AiFallbackExtractor>,
    url: &str,
) -> Result<Extraction, ScrapeError> {
    Url::parse(url)?;
    let html = fetcher.fetch(url).await?;
    Ok(extract_from_html(&html, url, ai).await)
}

/// Extract a recipe from already-fetched markup
///
/// Each strategy runs at most once:
/// 1. JSON-LD with at least one ingredient is returned as-is
/// 2. Markup heuristics with ingredients and instructions are returned as-is
/// 3. Otherwise the AI fallback is asked once and merged over the heuristics
/// 4. If that fails or finds no ingredients, the heuristic result is returned
pub async fn extract_from_html(
    html: &str,
    url: &str,
    ai: Option<&AiFallbackExtractor>,
) -> Extraction {
    let html_recipe = match run_markup_strategies(html, url) {
        ControlFlow::Break(extraction) => return extraction,
        ControlFlow::Continue(partial) => partial,
    };

    let Some(ai) = ai else {
        info!("AI fallback unavailable, using HTML result for {}", url);
        return partial(html_recipe);
    };

    info!("Falling back to AI extraction via {}", ai.provider_name());
    match ai.extract(url).await {
        Ok(ai_recipe) if !ai_recipe.ingredients.is_empty() => {
            debug!("AI extraction result: {:?}", ai_recipe);
            Extraction {
                recipe: merge_ai_result(html_recipe, ai_recipe),
                method: ExtractionMethod::AiFallback,
            }
        }
        Ok(_) => {
            info!("AI extraction returned no ingredients, using HTML fallback");
            partial(html_recipe)
        }
        Err(e) => {
            warn!("AI extraction failed, using HTML fallback: {}", e);
            partial(html_recipe)
        }
    }
}

/// The synchronous strategies; the parsed document never outlives this call.
fn run_markup_strategies(html: &str, url: &str) -> ControlFlow<Extraction, ScrapedRecipe> {
    let context = ParsingContext::new(url, html);

    if let Some(recipe) = JsonLdExtractor.parse(&context) {
        debug!("Using {} result for {}", JsonLdExtractor.name(), url);
        return ControlFlow::Break(Extraction {
            recipe,
            method: ExtractionMethod::JsonLd,
        });
    }

    let recipe = HtmlClassExtractor.extract(&context);
    info!(
        "HTML scraping result: {} ingredients, {} instructions",
        recipe.ingredients.len(),
        recipe.instructions.len()
    );

    if recipe.is_complete() {
        ControlFlow::Break(Extraction {
            recipe,
            method: ExtractionMethod::HtmlClass,
        })
    } else {
        ControlFlow::Continue(recipe)
    }
}

fn partial(recipe: ScrapedRecipe) -> Extraction {
    Extraction {
        recipe,
        method: ExtractionMethod::HtmlPartial,
    }
}

/// Lay AI output over a heuristic result.
///
/// Ingredients and instructions are replaced wholesale. Timing and servings
/// are only filled where the heuristic result has none.
pub fn merge_ai_result(html_recipe: ScrapedRecipe, ai_recipe: AiRecipe) -> ScrapedRecipe {
    ScrapedRecipe {
        ingredients: ai_recipe.ingredients,
        instructions: ai_recipe.instructions,
        prep_time: html_recipe.prep_time.or(ai_recipe.prep_time),
        cook_time: html_recipe.cook_time.or(ai_recipe.cook_time),
        servings: html_recipe.servings.or(ai_recipe.servings),
        ..html_recipe
    }
}
