use crate::domain::{errors::DomainError, ContentChunk, Embedding, SearchResult};
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait VectorStore: Send + Sync {
    async fn insert(&self, chunk: &ContentChunk, embedding: &Embedding)
        -> Result<(), DomainError>;
    /// Best matches first; equal scores keep insertion order.
    async fn search(
        &self,
        query: &Embedding,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, DomainError>;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Creates an empty store for each newly indexed content blob.
pub type VectorStoreFactory = Arc<dyn Fn() -> Arc<dyn VectorStore> + Send + Sync>;
