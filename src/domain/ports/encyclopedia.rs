use crate::domain::errors::DomainError;
use async_trait::async_trait;

#[async_trait]
pub trait EncyclopediaSource: Send + Sync {
    /// Page titles ranked by the source's own relevance, best first.
    async fn search(&self, term: &str, limit: usize) -> Result<Vec<String>, DomainError>;
    async fn page_text(&self, title: &str) -> Result<String, DomainError>;
}
