use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::application::deadline::with_deadline;
use crate::domain::{
    ports::{EmbeddingService, VectorStore},
    ContentChunk, DomainError,
};

pub const DEFAULT_TOP_K: usize = 4;

/// Embeds chunks into a store and retrieves the best matches for a question.
pub struct RagService {
    embedding: Arc<dyn EmbeddingService>,
    default_top_k: usize,
    timeout: Duration,
}

impl RagService {
    pub fn new(
        embedding: Arc<dyn EmbeddingService>,
        default_top_k: usize,
        timeout: Duration,
    ) -> Self {
        Self {
            embedding,
            default_top_k: default_top_k.max(1),
            timeout,
        }
    }

    pub fn with_defaults(embedding: Arc<dyn EmbeddingService>) -> Self {
        Self::new(embedding, DEFAULT_TOP_K, Duration::from_secs(30))
    }

    #[instrument(skip(self, index), fields(top_k = self.default_top_k))]
    pub async fn retrieve(
        &self,
        index: &dyn VectorStore,
        question: &str,
    ) -> Result<Vec<ContentChunk>, DomainError> {
        self.retrieve_top_k(index, question, self.default_top_k).await
    }

    #[instrument(skip(self, index))]
    pub async fn retrieve_top_k(
        &self,
        index: &dyn VectorStore,
        question: &str,
        top_k: usize,
    ) -> Result<Vec<ContentChunk>, DomainError> {
        let embedding = with_deadline(
            self.timeout,
            "question embedding",
            self.embedding.embed(question),
        )
        .await?;

        Ok(index
            .search(&embedding, top_k)
            .await?
            .into_iter()
            .map(|r| r.chunk)
            .collect())
    }

    #[instrument(skip(self, index, chunks), fields(count = chunks.len()))]
    pub async fn index_chunks(
        &self,
        index: &dyn VectorStore,
        chunks: &[ContentChunk],
    ) -> Result<(), DomainError> {
        if chunks.is_empty() {
            return Ok(());
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        let embeddings = with_deadline(
            self.timeout,
            "chunk embedding",
            self.embedding.embed_batch(&texts),
        )
        .await?;
        debug!(model = self.embedding.model(), vectors = embeddings.len(), "chunks embedded");

        if embeddings.len() != chunks.len() {
            return Err(DomainError::external(format!(
                "embedding service returned {} vectors for {} chunks",
                embeddings.len(),
                chunks.len()
            )));
        }

        for (chunk, embedding) in chunks.iter().zip(embeddings.iter()) {
            index.insert(chunk, embedding).await?;
        }

        Ok(())
    }
}
