use async_trait::async_trait;
use recipe_scraper::LlmProvider;
use std::error::Error;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Canned AI provider that counts how often it was asked.
pub struct FakeProvider {
    response: Result<String, String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl FakeProvider {
    pub fn answering(response: &str) -> Self {
        Self {
            response: Ok(response.to_string()),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmProvider for FakeProvider {
    fn provider_name(&self) -> &str {
        "fake"
    }

    async fn complete(&self, _prompt: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.response.clone().map_err(|e| e.into())
    }
}

pub async fn serve_page(server: &mut mockito::Server, path: &str, html: &str) -> mockito::Mock {
    server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(html)
        .create_async()
        .await
}

/// A blog post whose markup only exposes an ingredient sidebar.
pub const PARTIAL_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Bacon Wrapped Asparagus | Some Blog</title>
    <meta property="og:title" content="Bacon Wrapped Asparagus">
</head>
<body>
    <h1>Bacon Wrapped Asparagus</h1>
    <p>My grandmother used to make this every spring.</p>
    <div class="recipe-ingredients">
        <ul>
            <li>1 lb asparagus</li>
            <li>12 slices bacon</li>
        </ul>
    </div>
</body>
</html>"#;

/// A page with complete markup and no structured data.
pub const COMPLETE_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Pancakes</title></head>
<body>
    <h1>Fluffy Pancakes</h1>
    <ul class="ingredients">
        <li>1 cup flour</li>
        <li>1 egg</li>
        <li>3/4 cup milk</li>
    </ul>
    <ol class="instructions">
        <li>Whisk everything together until smooth.</li>
        <li>Cook on a hot griddle until golden on both sides.</li>
    </ol>
</body>
</html>"#;
