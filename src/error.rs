use thiserror::Error;

/// Errors that can occur while scraping a recipe
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// The recipe URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The page responded with a non-success HTTP status
    #[error("Failed to fetch URL: {status}")]
    HttpStatus { status: u16 },

    /// Transport-level failure while fetching the page
    #[error("Failed to fetch URL: {0}")]
    Fetch(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Builder configuration error
    #[error("Builder error: {0}")]
    Builder(String),
}

impl ScrapeError {
    /// HTTP status of a failed page fetch, if the failure carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ScrapeError::HttpStatus { status } => Some(*status),
            ScrapeError::Fetch(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
