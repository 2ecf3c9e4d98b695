use super::{Extractor, ParsingContext};
use crate::duration::parse_duration;
use crate::model::{ScrapedRecipe, UNTITLED_RECIPE};
use html_escape::decode_html_entities;
use log::debug;
use scraper::Selector;
use serde_json::{Map, Value};

pub struct JsonLdExtractor;

impl Extractor for JsonLdExtractor {
    fn name(&self) -> &'static str {
        "json_ld"
    }

    fn parse(&self, context: &ParsingContext) -> Option<ScrapedRecipe> {
        debug!("JsonLdExtractor: Starting parse for URL: {}", context.url);
        let selector = Selector::parse(r#"script[type="application/ld+json"]"#).ok()?;

        let mut recipe = None;
        for (index, script) in context.document.select(&selector).enumerate() {
            let raw_json = script.text().collect::<String>();
            let json_ld = match serde_json::from_str::<Value>(&raw_json) {
                Ok(json_ld) => json_ld,
                Err(e) => {
                    debug!("JsonLdExtractor: Failed to parse JSON-LD {}: {}", index, e);
                    continue;
                }
            };

            if let Some(found) = find_recipe(&json_ld) {
                debug!("JsonLdExtractor: Found Recipe entity in script {}", index);
                recipe = Some(convert_to_recipe(found));
                break;
            }
        }

        let recipe = recipe?;
        if recipe.ingredients.is_empty() {
            debug!("JsonLdExtractor: Recipe entity has no ingredients");
            return None;
        }
        Some(recipe)
    }
}

/// Depth-first search for the first Recipe entity.
///
/// Lists are searched element by element; an object is a hit when its
/// `@type` names Recipe, otherwise its `@graph` list is searched.
fn find_recipe(value: &Value) -> Option<&Map<String, Value>> {
    match value {
        Value::Array(items) => items.iter().find_map(find_recipe),
        Value::Object(obj) if has_type(obj, "Recipe") => Some(obj),
        Value::Object(obj) => match obj.get("@graph") {
            Some(graph @ Value::Array(_)) => find_recipe(graph),
            _ => None,
        },
        _ => None,
    }
}

fn has_type(obj: &Map<String, Value>, expected: &str) -> bool {
    match obj.get("@type") {
        Some(Value::String(t)) => t == expected,
        Some(Value::Array(types)) => types.iter().any(|t| t.as_str() == Some(expected)),
        _ => false,
    }
}

fn convert_to_recipe(recipe: &Map<String, Value>) -> ScrapedRecipe {
    let image = recipe.get("image");

    ScrapedRecipe {
        title: text_field(recipe, "name").unwrap_or_else(|| UNTITLED_RECIPE.to_string()),
        description: text_field(recipe, "description"),
        cover_image: image.and_then(resolve_image),
        images: image.map(collect_images).unwrap_or_default(),
        ingredients: recipe
            .get("recipeIngredient")
            .map(extract_ingredients)
            .unwrap_or_default(),
        instructions: recipe
            .get("recipeInstructions")
            .map(extract_instructions)
            .unwrap_or_default(),
        prep_time: parse_duration(recipe.get("prepTime")),
        cook_time: parse_duration(recipe.get("cookTime")),
        total_time: parse_duration(recipe.get("totalTime")),
        servings: recipe.get("recipeYield").and_then(yield_to_string),
    }
}

fn text_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(decode_html_symbols)
        .filter(|s| !s.trim().is_empty())
}

fn url_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// A single representative URL from an `image` value.
///
/// Strings are URLs, lists yield their first resolvable element, objects
/// yield `url` before `@id`.
fn resolve_image(value: &Value) -> Option<String> {
    match value {
        Value::String(url) if !url.is_empty() => Some(url.clone()),
        Value::Array(items) => items.iter().find_map(resolve_image),
        Value::Object(obj) => url_field(obj, "url").or_else(|| url_field(obj, "@id")),
        _ => None,
    }
}

fn collect_images(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(resolve_image).collect(),
        other => resolve_image(other).into_iter().collect(),
    }
}

fn extract_ingredients(value: &Value) -> Vec<String> {
    let Value::Array(items) = value else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(decode_html_symbols(s)),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Object(obj) => {
                let name = text_field(obj, "name")?;
                match obj.get("amount").and_then(Value::as_str).map(str::trim) {
                    Some(amount) if !amount.is_empty() => Some(format!("{amount} {name}")),
                    _ => Some(name),
                }
            }
            _ => None,
        })
        .map(|ing| ing.trim().to_string())
        .filter(|ing| !ing.is_empty())
        .collect()
}

fn extract_instructions(value: &Value) -> Vec<String> {
    let mut steps = Vec::new();
    match value {
        Value::String(text) => {
            steps.extend(
                text.lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(decode_html_symbols),
            );
        }
        other => flatten_steps(other, &mut steps),
    }
    steps
}

/// Flatten a list of strings, `HowToStep`s and (nested) `HowToSection`s
/// into one ordered list of step texts.
fn flatten_steps(value: &Value, steps: &mut Vec<String>) {
    match value {
        Value::Array(items) => {
            for item in items {
                flatten_steps(item, steps);
            }
        }
        Value::String(text) => {
            if !text.trim().is_empty() {
                steps.push(decode_html_symbols(text));
            }
        }
        Value::Object(obj) if has_type(obj, "HowToStep") => {
            if let Some(text) = text_field(obj, "text").or_else(|| text_field(obj, "name")) {
                steps.push(text);
            }
        }
        Value::Object(obj) if has_type(obj, "HowToSection") => {
            if let Some(items @ Value::Array(_)) = obj.get("itemListElement") {
                flatten_steps(items, steps);
            }
        }
        _ => {}
    }
}

fn yield_to_string(value: &Value) -> Option<String> {
    let servings = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => {
            let entries: Vec<String> = items.iter().filter_map(yield_to_string).collect();
            // Prefer the descriptive entry (e.g. "4 servings") over a bare number
            entries
                .iter()
                .find(|s| s.contains(char::is_alphabetic))
                .or_else(|| entries.first())
                .cloned()?
        }
        _ => return None,
    };

    if servings.is_empty() {
        None
    } else {
        Some(servings)
    }
}

fn decode_html_symbols(text: &str) -> String {
    decode_html_entities(text).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_html_document(json_ld: &str) -> String {
        format!(
            r#"
            <!DOCTYPE html>
            <html>
            <head>
                <script type="application/ld+json">
                    {json_ld}
                </script>
            </head>
            <body></body>
            </html>
            "#
        )
    }

    fn parse(json_ld: &str) -> Option<ScrapedRecipe> {
        let context = ParsingContext::new("http://example.com", &create_html_document(json_ld));
        JsonLdExtractor.parse(&context)
    }

    #[test]
    fn test_no_json_ld() {
        let context = ParsingContext::new("http://example.com", "<html><body>Test</body></html>");
        assert!(JsonLdExtractor.parse(&context).is_none());
    }

    #[test]
    fn test_parse_basic_recipe() {
        let result = parse(
            r#"
        {
            "@context": "https://schema.org/",
            "@type": "Recipe",
            "name": "Chocolate Chip Cookies",
            "description": "Delicious homemade cookies",
            "image": "https://example.com/cookie.jpg",
            "recipeIngredient": ["flour", "sugar", "chocolate chips"],
            "recipeInstructions": "Mix ingredients.\n\nBake at 350F for 10 minutes.",
            "prepTime": "PT15M",
            "cookTime": "PT10M",
            "totalTime": "PT1H25M",
            "recipeYield": "24 cookies"
        }
        "#,
        )
        .unwrap();

        assert_eq!(result.title, "Chocolate Chip Cookies");
        assert_eq!(result.description.as_deref(), Some("Delicious homemade cookies"));
        assert_eq!(result.cover_image.as_deref(), Some("https://example.com/cookie.jpg"));
        assert_eq!(result.images, vec!["https://example.com/cookie.jpg"]);
        assert_eq!(result.ingredients, vec!["flour", "sugar", "chocolate chips"]);
        assert_eq!(
            result.instructions,
            vec!["Mix ingredients.", "Bake at 350F for 10 minutes."]
        );
        assert_eq!(result.prep_time.as_deref(), Some("15 minutes"));
        assert_eq!(result.cook_time.as_deref(), Some("10 minutes"));
        assert_eq!(result.total_time.as_deref(), Some("1 hour 25 minutes"));
        assert_eq!(result.servings.as_deref(), Some("24 cookies"));
    }

    #[test]
    fn test_recipe_in_graph() {
        let result = parse(
            r#"
        {
            "@context": "https://schema.org",
            "@graph": [
                {"@type": "WebSite", "name": "Food Blog"},
                {"@type": ["Recipe", "NewsArticle"], "name": "Soup", "recipeIngredient": ["water"]}
            ]
        }
        "#,
        )
        .unwrap();

        assert_eq!(result.title, "Soup");
        assert_eq!(result.ingredients, vec!["water"]);
    }

    #[test]
    fn test_first_recipe_in_array_wins() {
        let result = parse(
            r#"
        [
            {"@type": "WebSite", "name": "Recipe Website"},
            {"@type": "Recipe", "name": "First", "recipeIngredient": ["a"]},
            {"@type": "Recipe", "name": "Second", "recipeIngredient": ["b"]}
        ]
        "#,
        )
        .unwrap();

        assert_eq!(result.title, "First");
    }

    #[test]
    fn test_malformed_block_is_skipped() {
        let html = r#"
            <!DOCTYPE html>
            <html><head>
            <script type="application/ld+json">{ "@type": "Recipe", broken </script>
            <script type="application/ld+json">
                {"@type": "Recipe", "name": "Second Block", "recipeIngredient": ["salt"]}
            </script>
            </head><body></body></html>
        "#;
        let context = ParsingContext::new("http://example.com", html);
        let result = JsonLdExtractor.parse(&context).unwrap();
        assert_eq!(result.title, "Second Block");
    }

    #[test]
    fn test_first_recipe_without_ingredients_stops_search() {
        let html = r#"
            <!DOCTYPE html>
            <html><head>
            <script type="application/ld+json">
                {"@type": "Recipe", "name": "Empty", "recipeInstructions": "Stir."}
            </script>
            <script type="application/ld+json">
                {"@type": "Recipe", "name": "Full", "recipeIngredient": ["salt"]}
            </script>
            </head><body></body></html>
        "#;
        let context = ParsingContext::new("http://example.com", html);
        assert!(JsonLdExtractor.parse(&context).is_none());
    }

    #[test]
    fn test_missing_name_uses_placeholder() {
        let result = parse(r#"{"@type": "Recipe", "name": 42, "recipeIngredient": ["x"]}"#).unwrap();
        assert_eq!(result.title, UNTITLED_RECIPE);
        assert_eq!(result.description, None);
    }

    #[test]
    fn test_type_must_match_exactly() {
        assert!(parse(r#"{"@type": "recipe", "recipeIngredient": ["x"]}"#).is_none());
    }

    #[test]
    fn test_find_recipe_rules() {
        assert!(find_recipe(&json!({"@type": "Recipe"})).is_some());
        assert!(find_recipe(&json!({"@type": ["Thing", "Recipe"]})).is_some());
        assert!(find_recipe(&json!({"@graph": [{"@type": "Recipe"}]})).is_some());
        assert!(find_recipe(&json!({"@graph": {"@type": "Recipe"}})).is_none());
        assert!(find_recipe(&json!([[{"@type": "Recipe"}]])).is_some());
        assert!(find_recipe(&json!("Recipe")).is_none());
    }

    #[test]
    fn test_image_shapes() {
        assert_eq!(
            resolve_image(&json!("https://example.com/a.jpg")).as_deref(),
            Some("https://example.com/a.jpg")
        );
        assert_eq!(
            resolve_image(&json!({"@type": "ImageObject", "url": "https://example.com/b.jpg"}))
                .as_deref(),
            Some("https://example.com/b.jpg")
        );
        assert_eq!(
            resolve_image(&json!({"@id": "https://example.com/#image"})).as_deref(),
            Some("https://example.com/#image")
        );
        assert_eq!(
            resolve_image(&json!([{"caption": "none"}, "https://example.com/c.jpg"])).as_deref(),
            Some("https://example.com/c.jpg")
        );

        let images = collect_images(&json!([
            "https://example.com/1.jpg",
            {"url": "https://example.com/2.jpg"},
            {"width": 100},
            "https://example.com/1.jpg"
        ]));
        assert_eq!(
            images,
            vec![
                "https://example.com/1.jpg",
                "https://example.com/2.jpg",
                "https://example.com/1.jpg"
            ]
        );
    }

    #[test]
    fn test_ingredient_coercion() {
        let ingredients = extract_ingredients(&json!([
            "2 cups flour",
            "",
            "   ",
            3,
            {"name": "butter", "amount": "100 g"},
            {"name": "salt"},
            null
        ]));
        assert_eq!(ingredients, vec!["2 cups flour", "3", "100 g butter", "salt"]);
        assert!(extract_ingredients(&json!("flour, sugar")).is_empty());
    }

    #[test]
    fn test_section_flattening() {
        let steps = extract_instructions(&json!([
            {
                "@type": "HowToSection",
                "name": "Dough",
                "itemListElement": [
                    {"@type": "HowToStep", "text": "Mix flour."},
                    {"@type": "HowToStep", "text": "Knead."}
                ]
            }
        ]));
        assert_eq!(steps, vec!["Mix flour.", "Knead."]);
    }

    #[test]
    fn test_nested_sections_flatten_in_order() {
        let steps = extract_instructions(&json!([
            {"@type": "HowToStep", "text": "Preheat."},
            {
                "@type": "HowToSection",
                "itemListElement": [
                    {"@type": "HowToStep", "text": "Outer one."},
                    {
                        "@type": "HowToSection",
                        "itemListElement": [
                            {"@type": "HowToStep", "text": "Inner one."},
                            {"@type": "HowToStep", "name": "Inner two."}
                        ]
                    },
                    {"@type": "HowToStep", "text": "Outer two."}
                ]
            },
            {"@type": "HowToTip", "text": "Not a step."},
            "Serve."
        ]));
        assert_eq!(
            steps,
            vec!["Preheat.", "Outer one.", "Inner one.", "Inner two.", "Outer two.", "Serve."]
        );
    }

    #[test]
    fn test_instruction_strings_and_entities() {
        assert_eq!(
            extract_instructions(&json!("Boil water.\r\n\nAdd salt &amp; pasta.")),
            vec!["Boil water.", "Add salt & pasta."]
        );
        assert_eq!(
            extract_instructions(&json!(["Step one", "", "Step two"])),
            vec!["Step one", "Step two"]
        );
        assert!(extract_instructions(&json!(7)).is_empty());
    }

    #[test]
    fn test_instruction_lines_are_trimmed() {
        assert_eq!(
            extract_instructions(&json!("  Heat the oil.\n   \n\tFry the onions.  ")),
            vec!["Heat the oil.", "Fry the onions."]
        );
    }

    #[test]
    fn test_yield_coercion() {
        assert_eq!(yield_to_string(&json!(4)).as_deref(), Some("4"));
        assert_eq!(yield_to_string(&json!("6 servings")).as_deref(), Some("6 servings"));
        assert_eq!(
            yield_to_string(&json!(["4", "4 servings"])).as_deref(),
            Some("4 servings")
        );
        assert_eq!(yield_to_string(&json!([8])).as_deref(), Some("8"));
        assert_eq!(yield_to_string(&json!("")), None);
    }
}
