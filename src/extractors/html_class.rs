use crate::extractors::{Extractor, ParsingContext};
use crate::model::{ScrapedRecipe, UNTITLED_RECIPE};
use log::debug;
use scraper::{ElementRef, Html, Selector};
use url::Url;

const MAX_IMAGES: usize = 10;
const MAX_INGREDIENT_LEN: usize = 200;
const MIN_INSTRUCTION_LEN: usize = 10;

/// A structural pattern that may locate recipe content on a page.
enum Signature {
    /// Elements matching a CSS selector.
    Css(&'static str),
    /// List items (inside a `ul`) whose text contains a word.
    ListItemContaining(&'static str),
}

impl Signature {
    /// Trimmed text of every element the signature matches, in document order.
    fn candidates(&self, document: &Html) -> Vec<String> {
        let (selector_str, needle) = match self {
            Signature::Css(selector) => (*selector, None),
            Signature::ListItemContaining(word) => ("ul li", Some(*word)),
        };

        let Ok(selector) = Selector::parse(selector_str) else {
            return Vec::new();
        };

        document
            .select(&selector)
            .map(element_text)
            .filter(|text| needle.map_or(true, |word| text.contains(word)))
            .map(|text| text.trim().to_string())
            .collect()
    }

    fn describe(&self) -> String {
        match self {
            Signature::Css(selector) => selector.to_string(),
            Signature::ListItemContaining(word) => format!("ul li containing '{word}'"),
        }
    }
}

// Earlier entries win outright; matches are never merged across signatures.
const INGREDIENT_SIGNATURES: &[Signature] = &[
    Signature::Css(r#"[class*="ingredient"] li"#),
    Signature::Css(r#"[class*="Ingredient"] li"#),
    Signature::Css(".ingredients li"),
    Signature::Css("[data-ingredient]"),
    Signature::ListItemContaining("cup"),
    Signature::ListItemContaining("tablespoon"),
    Signature::ListItemContaining("teaspoon"),
];

const INSTRUCTION_SIGNATURES: &[Signature] = &[
    Signature::Css(r#"[class*="instruction"] li"#),
    Signature::Css(r#"[class*="Instruction"] li"#),
    Signature::Css(r#"[class*="direction"] li"#),
    Signature::Css(r#"[class*="Direction"] li"#),
    Signature::Css(r#"[class*="step"] li"#),
    Signature::Css(".instructions li"),
    Signature::Css(".directions li"),
    Signature::Css(".steps li"),
    Signature::Css(r#"[class*="instruction"] p"#),
    Signature::Css(r#"[class*="step"] p"#),
];

/// Best-effort extraction from page markup when no structured data exists.
pub struct HtmlClassExtractor;

impl HtmlClassExtractor {
    /// Never fails; fields it cannot find are left empty.
    pub fn extract(&self, context: &ParsingContext) -> ScrapedRecipe {
        debug!("Attempting to extract recipe using HTML class matchers");
        let document = &context.document;

        let title = first_text(document, "h1")
            .or_else(|| meta_content(document, r#"meta[property="og:title"]"#))
            .or_else(|| first_text(document, "title"))
            .unwrap_or_else(|| UNTITLED_RECIPE.to_string());

        let description = meta_content(document, r#"meta[property="og:description"]"#)
            .or_else(|| meta_content(document, r#"meta[name="description"]"#));

        let cover_image = meta_content(document, r#"meta[property="og:image"]"#)
            .or_else(|| first_image_src(document));

        let images = collect_images(document, &context.url);

        let ingredients = first_matching_signature(document, INGREDIENT_SIGNATURES, |text| {
            !text.is_empty() && text.chars().count() < MAX_INGREDIENT_LEN
        });

        let instructions = first_matching_signature(document, INSTRUCTION_SIGNATURES, |text| {
            text.chars().count() > MIN_INSTRUCTION_LEN
        });

        debug!("Recipe name: {}", title);
        debug!("Ingredients count: {}", ingredients.len());
        debug!("Instructions count: {}", instructions.len());

        ScrapedRecipe {
            title,
            description,
            cover_image,
            images,
            ingredients,
            instructions,
            ..Default::default()
        }
    }
}

impl Extractor for HtmlClassExtractor {
    fn name(&self) -> &'static str {
        "html_class"
    }

    fn parse(&self, context: &ParsingContext) -> Option<ScrapedRecipe> {
        Some(self.extract(context))
    }
}

/// Accepted texts from the first signature that yields any, in priority order.
fn first_matching_signature<F>(document: &Html, signatures: &[Signature], accept: F) -> Vec<String>
where
    F: Fn(&str) -> bool,
{
    for signature in signatures {
        let items: Vec<String> = signature
            .candidates(document)
            .into_iter()
            .filter(|text| accept(text))
            .collect();

        if !items.is_empty() {
            debug!("Found {} items using {}", items.len(), signature.describe());
            return items;
        }
    }
    Vec::new()
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>()
}

fn first_text(document: &Html, selector_str: &str) -> Option<String> {
    let selector = Selector::parse(selector_str).ok()?;
    let element = document.select(&selector).next()?;
    non_empty(element_text(element))
}

fn meta_content(document: &Html, selector_str: &str) -> Option<String> {
    let selector = Selector::parse(selector_str).ok()?;
    let element = document.select(&selector).next()?;
    non_empty(element.value().attr("content")?.to_string())
}

fn first_image_src(document: &Html) -> Option<String> {
    let selector = Selector::parse("img").ok()?;
    let element = document.select(&selector).next()?;
    non_empty(element.value().attr("src")?.to_string())
}

fn non_empty(text: String) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Every non-icon, non-logo image source resolved against the page URL.
///
/// The exclusion is a case-sensitive substring test on the raw `src`.
fn collect_images(document: &Html, page_url: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse("img") else {
        return Vec::new();
    };
    let base = Url::parse(page_url).ok();

    document
        .select(&selector)
        .filter_map(|img| img.value().attr("src"))
        .filter(|src| !src.is_empty() && !src.contains("icon") && !src.contains("logo"))
        .filter_map(|src| resolve_url(base.as_ref(), src))
        .take(MAX_IMAGES)
        .collect()
}

fn resolve_url(base: Option<&Url>, src: &str) -> Option<String> {
    if src.starts_with("http") {
        return Some(src.to_string());
    }
    match base.map(|base| base.join(src)) {
        Some(Ok(resolved)) => Some(resolved.to_string()),
        _ => {
            debug!("Skipping unresolvable image source: {}", src);
            None
        }
    }
}
