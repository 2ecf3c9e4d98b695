/// The prompt sent to the AI fallback, with a `{url}` placeholder.
///
/// Loaded from `prompt.txt` at compile time so it can be edited without
/// dealing with Rust string syntax.
pub const RECIPE_EXTRACTION_PROMPT: &str = include_str!("prompt.txt");

/// Render the extraction prompt for a recipe URL.
pub fn build_extraction_prompt(url: &str) -> String {
    RECIPE_EXTRACTION_PROMPT.replace("{url}", url.trim())
}
