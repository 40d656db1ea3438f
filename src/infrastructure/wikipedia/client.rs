use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::domain::{ports::EncyclopediaSource, DomainError};
use crate::infrastructure::config::WikipediaConfig;

/// MediaWiki query API client: title search plus plain-text extracts.
pub struct WikipediaClient {
    http: Client,
    base_url: String,
}

impl WikipediaClient {
    pub fn new(config: &WikipediaConfig) -> Result<Self, DomainError> {
        let http = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .build()
            .map_err(|e| DomainError::configuration(format!("http client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    async fn query<T: DeserializeOwned>(&self, params: &[(&str, &str)]) -> Result<T, DomainError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("action", "query"), ("format", "json"), ("formatversion", "2")])
            .query(params)
            .send()
            .await
            .map_err(|e| DomainError::external(format!("wikipedia request failed: {e}")))?
            .error_for_status()
            .map_err(|e| DomainError::external(format!("wikipedia returned an error: {e}")))?;

        response
            .json::<T>()
            .await
            .map_err(|e| DomainError::external(format!("unexpected wikipedia response: {e}")))
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    query: Option<SearchQuery>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    #[serde(default)]
    query: Option<ExtractQuery>,
}

#[derive(Debug, Deserialize)]
struct ExtractQuery {
    #[serde(default)]
    pages: Vec<ExtractPage>,
}

#[derive(Debug, Deserialize)]
struct ExtractPage {
    title: String,
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    extract: Option<String>,
}

fn titles(response: SearchResponse) -> Vec<String> {
    response
        .query
        .map(|q| q.search.into_iter().map(|hit| hit.title).collect())
        .unwrap_or_default()
}

fn page_text(title: &str, response: ExtractResponse) -> Result<String, DomainError> {
    let page = response
        .query
        .and_then(|q| q.pages.into_iter().next())
        .ok_or_else(|| DomainError::not_found(format!("wikipedia page \"{title}\"")))?;

    if page.missing {
        return Err(DomainError::not_found(format!(
            "wikipedia page \"{}\"",
            page.title
        )));
    }
    Ok(page.extract.unwrap_or_default())
}

#[async_trait]
impl EncyclopediaSource for WikipediaClient {
    #[instrument(skip(self))]
    async fn search(&self, term: &str, limit: usize) -> Result<Vec<String>, DomainError> {
        let limit = limit.to_string();
        let response: SearchResponse = self
            .query(&[
                ("list", "search"),
                ("srsearch", term),
                ("srlimit", limit.as_str()),
                ("srprop", ""),
            ])
            .await?;

        let titles = titles(response);
        debug!(count = titles.len(), "search results");
        Ok(titles)
    }

    #[instrument(skip(self))]
    async fn page_text(&self, title: &str) -> Result<String, DomainError> {
        let response: ExtractResponse = self
            .query(&[
                ("prop", "extracts"),
                ("explaintext", "1"),
                ("redirects", "1"),
                ("titles", title),
            ])
            .await?;

        page_text(title, response)
    }
}
