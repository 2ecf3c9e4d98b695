use crate::model::ScrapedRecipe;
use scraper::Html;

pub mod ai_fallback;
mod html_class;
mod json_ld;

pub use ai_fallback::{AiFallbackError, AiFallbackExtractor};
pub use html_class::HtmlClassExtractor;
pub use json_ld::JsonLdExtractor;

pub struct ParsingContext {
    pub url: String,
    pub document: Html,
}

impl ParsingContext {
    pub fn new(url: impl Into<String>, html: &str) -> Self {
        Self {
            url: url.into(),
            document: Html::parse_document(html),
        }
    }
}

/// A strategy that turns an already-parsed page into a recipe.
///
/// `None` means the strategy found nothing it is willing to vouch for.
pub trait Extractor {
    fn name(&self) -> &'static str;
    fn parse(&self, context: &ParsingContext) -> Option<ScrapedRecipe>;
}
