use futures::future::try_join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::application::deadline::with_deadline;
use crate::domain::{ports::EncyclopediaSource, DomainError};

pub const DEFAULT_MAX_PAGES: usize = 3;

pub struct ContentFetcher {
    source: Arc<dyn EncyclopediaSource>,
    max_pages: usize,
    timeout: Duration,
}

impl ContentFetcher {
    pub fn new(source: Arc<dyn EncyclopediaSource>, max_pages: usize, timeout: Duration) -> Self {
        Self {
            source,
            max_pages: max_pages.max(1),
            timeout,
        }
    }

    pub fn with_defaults(source: Arc<dyn EncyclopediaSource>) -> Self {
        Self::new(source, DEFAULT_MAX_PAGES, Duration::from_secs(20))
    }

    /// Fetches the top pages for `search_term`, joined with newlines in
    /// search-result order.
    #[instrument(skip(self))]
    pub async fn fetch(&self, search_term: &str) -> Result<String, DomainError> {
        let mut titles = with_deadline(
            self.timeout,
            "wikipedia search",
            self.source.search(search_term, self.max_pages),
        )
        .await?;
        titles.truncate(self.max_pages);

        if titles.is_empty() {
            return Err(DomainError::external(format!(
                "no Wikipedia pages match \"{search_term}\""
            )));
        }
        debug!(?titles, "fetching pages");

        let pages = try_join_all(titles.iter().map(|title| {
            with_deadline(self.timeout, "wikipedia page fetch", self.source.page_text(title))
        }))
        .await
        .map_err(|e| match e {
            DomainError::NotFound(msg) => DomainError::external(msg),
            other => other,
        })?;

        Ok(pages.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeEncyclopedia;

    #[tokio::test]
    async fn test_fetches_at_most_three_pages_in_search_order() {
        let source = Arc::new(
            FakeEncyclopedia::new()
                .with_results("Batman", &["Batman", "Robin", "Joker", "Alfred", "Gotham"])
                .with_page("Batman", "B")
                .with_page("Robin", "R")
                .with_page("Joker", "J")
                .with_page("Alfred", "A")
                .with_delay("Batman", Duration::from_millis(60))
                .with_delay("Robin", Duration::from_millis(30)),
        );
        let fetcher = ContentFetcher::with_defaults(source.clone());

        let content = fetcher.fetch("Batman").await.unwrap();

        assert_eq!(content, "B\nR\nJ");
        let mut requested = source.page_requests();
        requested.sort();
        assert_eq!(requested, vec!["Batman", "Joker", "Robin"]);
    }

    #[tokio::test]
    async fn test_zero_matches_is_external_error() {
        let source = Arc::new(FakeEncyclopedia::new());
        let fetcher = ContentFetcher::with_defaults(source.clone());

        let err = fetcher.fetch("Xyzzyq").await.unwrap_err();

        assert!(matches!(err, DomainError::ExternalService(_)));
        assert!(source.page_requests().is_empty());
    }

    #[tokio::test]
    async fn test_missing_page_fails_the_fetch() {
        let source = Arc::new(
            FakeEncyclopedia::new()
                .with_results("Batman", &["Batman", "Batwoman"])
                .with_page("Batman", "Batman is a superhero."),
        );
        let fetcher = ContentFetcher::with_defaults(source);

        let err = fetcher.fetch("Batman").await.unwrap_err();
        assert!(err.is_external());
    }

    #[tokio::test]
    async fn test_slow_page_times_out() {
        let source = Arc::new(
            FakeEncyclopedia::new()
                .with_results("Batman", &["Batman"])
                .with_page("Batman", "Batman is a superhero.")
                .with_delay("Batman", Duration::from_secs(5)),
        );
        let fetcher = ContentFetcher::new(source, 3, Duration::from_millis(20));

        let err = fetcher.fetch("Batman").await.unwrap_err();
        assert!(matches!(err, DomainError::Timeout(_)));
    }
}
