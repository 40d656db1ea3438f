pub mod assistant;
pub mod config;
pub mod embedding;
pub mod llm;
pub mod vector_store;
pub mod wikipedia;

pub use assistant::{assemble, build_orchestrator};
pub use config::{AppConfig, Config, PromptsConfig};
pub use embedding::TextEmbedding;
pub use llm::OpenAiLlm;
pub use vector_store::{in_memory_factory, InMemoryVectorStore};
pub use wikipedia::WikipediaClient;
