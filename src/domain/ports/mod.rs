mod embedding;
mod encyclopedia;
mod llm;
mod vector_store;

pub use embedding::EmbeddingService;
pub use encyclopedia::EncyclopediaSource;
pub use llm::LlmService;
pub use vector_store::{VectorStore, VectorStoreFactory};
