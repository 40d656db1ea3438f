use std::sync::Arc;
use tracing::info;

use crate::application::{
    AnswerService, ContentFetcher, IndexCache, RagService, ReasoningService, TurnOrchestrator,
};
use crate::domain::{
    ports::{EmbeddingService, EncyclopediaSource, LlmService},
    DomainError, TextSplitter,
};
use crate::infrastructure::config::{require_api_key, AppConfig};
use crate::infrastructure::{in_memory_factory, OpenAiLlm, TextEmbedding, WikipediaClient};

/// Wires the production adapters into a [`TurnOrchestrator`].
///
/// Fails fast when the provider credential is missing.
pub fn build_orchestrator(config: &AppConfig) -> Result<TurnOrchestrator, DomainError> {
    require_api_key()?;

    let llm: Arc<dyn LlmService> = Arc::new(OpenAiLlm::from_config(&config.config.llm));
    let embedding: Arc<dyn EmbeddingService> =
        Arc::new(TextEmbedding::from_config(&config.config.embedding));
    let source: Arc<dyn EncyclopediaSource> =
        Arc::new(WikipediaClient::new(&config.config.wikipedia)?);

    info!(
        llm = %config.config.llm.model,
        embedding = %config.config.embedding.model,
        "providers configured"
    );
    Ok(assemble(config, llm, embedding, source))
}

/// Builds the orchestrator around any set of port implementations.
pub fn assemble(
    config: &AppConfig,
    llm: Arc<dyn LlmService>,
    embedding: Arc<dyn EmbeddingService>,
    source: Arc<dyn EncyclopediaSource>,
) -> TurnOrchestrator {
    let c = &config.config;
    let llm_timeout = c.llm.timeout();

    TurnOrchestrator::new(
        ReasoningService::new(llm.clone(), config.prompts.clone(), llm_timeout),
        ContentFetcher::new(source, c.wikipedia.max_pages, c.wikipedia.timeout()),
        IndexCache::new(
            c.rag.cache_capacity,
            TextSplitter::new(c.rag.chunk_size, c.rag.chunk_overlap),
            in_memory_factory(),
        ),
        RagService::new(embedding, c.rag.top_k, c.embedding.timeout()),
        AnswerService::new(llm, config.prompts.clone(), llm_timeout),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CountingEmbedder, FakeEncyclopedia, ScriptedLlm};

    #[tokio::test]
    async fn test_assemble_honours_config() {
        let config = AppConfig::from_yaml(
            "config:\n  wikipedia:\n    max_pages: 1\n  rag:\n    top_k: 1\n",
        )
        .unwrap();
        let source = Arc::new(
            FakeEncyclopedia::new()
                .with_results("Batman", &["Batman", "Robin"])
                .with_page("Batman", "Batman is a superhero.\n\nHe lives in Gotham.")
                .with_page("Robin", "Robin is a sidekick."),
        );
        let llm = ScriptedLlm::new()
            .reply_search("Batman")
            .reply_text("A superhero.");

        let mut orchestrator =
            assemble(&config, llm, CountingEmbedder::new(), source.clone());
        let report = orchestrator.run_turn("Who is Batman?").await.unwrap();

        assert_eq!(source.page_requests(), vec!["Batman"]);
        assert_eq!(report.context_chunks, 1);
    }
}
