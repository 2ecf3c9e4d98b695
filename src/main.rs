use clap::Parser;
use log::{debug, error};
use recipe_scraper::{load_config, Recipe, RecipeScraper};
use std::process::ExitCode;

/// Scrape a recipe page and print it as JSON
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Recipe page URL
    url: String,

    /// Comma-separated tags to attach to the recipe
    #[arg(long, value_delimiter = ',')]
    tags: Vec<String>,
}

impl Args {
    /// Tags with surrounding whitespace and empty entries removed
    fn clean_tags(&self) -> Vec<String> {
        self.tags
            .iter()
            .map(|tag| tag.trim())
            .filter(|tag| !tag.is_empty())
            .map(String::from)
            .collect()
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let scraper = RecipeScraper::from_config(&config)?;

    let extraction = scraper.scrape_detailed(&args.url).await?;
    debug!("{:#?}", extraction);

    if !extraction.recipe.has_content() {
        eprintln!(
            "Warning: could not extract ingredients or instructions from {}",
            args.url
        );
    }

    let tags = args.clean_tags();
    let recipe = Recipe::from_scraped(&args.url, extraction.recipe, tags);
    println!("{}", serde_json::to_string_pretty(&recipe)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_url_and_tags() {
        let args = Args::try_parse_from([
            "recipe-scraper",
            "https://example.com/soup",
            "--tags",
            "dinner, vegetarian,,",
        ])
        .unwrap();
        assert_eq!(args.url, "https://example.com/soup");
        assert_eq!(args.clean_tags(), vec!["dinner", "vegetarian"]);
    }

    #[test]
    fn test_parse_without_tags() {
        let args = Args::try_parse_from(["recipe-scraper", "https://example.com/soup"]).unwrap();
        assert!(args.clean_tags().is_empty());
    }

    #[test]
    fn test_parse_requires_url() {
        assert!(Args::try_parse_from(["recipe-scraper", "--tags", "dinner"]).is_err());
        assert!(Args::try_parse_from(["recipe-scraper"]).is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_flag() {
        let err = Args::try_parse_from(["recipe-scraper", "https://example.com", "--verbose"])
            .unwrap_err();
        assert!(err.to_string().contains("--verbose"));
    }
}
