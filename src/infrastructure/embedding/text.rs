use async_trait::async_trait;
use rig::client::{EmbeddingsClient, ProviderClient};
use rig::embeddings::EmbeddingModel;
use rig::providers::openai;

use crate::domain::{ports::EmbeddingService, DomainError, Embedding};
use crate::infrastructure::config::EmbeddingConfig;

pub struct TextEmbedding {
    client: openai::Client,
    model: String,
    dimension: usize,
}

impl TextEmbedding {
    /// Reads `OPENAI_API_KEY` from the environment.
    pub fn new() -> Self {
        Self::from_config(&EmbeddingConfig::default())
    }

    pub fn from_config(config: &EmbeddingConfig) -> Self {
        Self {
            client: openai::Client::from_env(),
            model: config.model.clone(),
            dimension: config.dimension,
        }
    }

    fn check_dimension(&self, embedding: &Embedding) -> Result<(), DomainError> {
        if embedding.dimension() != self.dimension {
            return Err(DomainError::external(format!(
                "{} returned {} dimensions, expected {}",
                self.model,
                embedding.dimension(),
                self.dimension
            )));
        }
        Ok(())
    }
}

impl Default for TextEmbedding {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingService for TextEmbedding {
    async fn embed(&self, text: &str) -> Result<Embedding, DomainError> {
        let model = self.client.embedding_model(&self.model);

        let embedding = model
            .embed_text(text)
            .await
            .map_err(|e| DomainError::external(e.to_string()))?;

        let embedding = Embedding::from_f64(embedding.vec);
        self.check_dimension(&embedding)?;
        Ok(embedding)
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, DomainError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let model = self.client.embedding_model(&self.model);
        let mut embeddings = Vec::with_capacity(texts.len());
        for batch in batches(texts, max_documents(&model)) {
            let batch_len = batch.len();
            let batch = model
                .embed_texts(batch)
                .await
                .map_err(|e| DomainError::external(e.to_string()))?;

            if batch.len() != batch_len {
                return Err(DomainError::external(format!(
                    "{} returned {} embeddings for {} texts",
                    self.model,
                    batch.len(),
                    batch_len
                )));
            }
            for e in batch {
                let embedding = Embedding::from_f64(e.vec);
                self.check_dimension(&embedding)?;
                embeddings.push(embedding);
            }
        }
        Ok(embeddings)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

fn max_documents<M: EmbeddingModel>(_model: &M) -> usize {
    M::MAX_DOCUMENTS.max(1)
}

/// Consecutive request-sized groups of `texts`, in input order.
fn batches<'a>(texts: &'a [&'a str], max: usize) -> impl Iterator<Item = Vec<String>> + 'a {
    texts
        .chunks(max.max(1))
        .map(|group| group.iter().map(|t| t.to_string()).collect())
}
