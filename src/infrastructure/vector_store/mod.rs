mod in_memory;

pub use in_memory::{in_memory_factory, InMemoryVectorStore};
