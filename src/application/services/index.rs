use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::{info, instrument};

use super::rag::RagService;
use crate::domain::{
    ports::{VectorStore, VectorStoreFactory},
    DomainError, TextSplitter,
};

pub const DEFAULT_CACHE_CAPACITY: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexStatus {
    pub cache: CacheStatus,
    pub chunks: usize,
}

/// Embedding indexes keyed by a hash of the content they were built from.
///
/// At most one index exists per distinct content. Least recently used
/// entries are dropped once `capacity` is reached.
pub struct IndexCache {
    entries: LruCache<blake3::Hash, Arc<dyn VectorStore>>,
    splitter: TextSplitter,
    new_store: VectorStoreFactory,
}

impl IndexCache {
    pub fn new(capacity: usize, splitter: TextSplitter, new_store: VectorStoreFactory) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            splitter,
            new_store,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, content: &str) -> bool {
        self.entries.contains(&blake3::hash(content.as_bytes()))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns the index for `content`, building and caching it on a miss.
    #[instrument(skip(self, content, rag), fields(content_len = content.len()))]
    pub async fn get_or_build(
        &mut self,
        content: &str,
        rag: &RagService,
    ) -> Result<(Arc<dyn VectorStore>, IndexStatus), DomainError> {
        let key = blake3::hash(content.as_bytes());

        if let Some(index) = self.entries.get(&key) {
            let status = IndexStatus {
                cache: CacheStatus::Hit,
                chunks: index.len(),
            };
            info!(key = %key.to_hex(), chunks = status.chunks, "index cache hit");
            return Ok((index.clone(), status));
        }

        let chunks = self.splitter.split(content);
        let index = (self.new_store)();
        rag.index_chunks(index.as_ref(), &chunks).await?;

        info!(key = %key.to_hex(), chunks = chunks.len(), "index built");
        self.entries.put(key, index.clone());

        Ok((
            index,
            IndexStatus {
                cache: CacheStatus::Miss,
                chunks: chunks.len(),
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::vector_store::in_memory_factory;
    use crate::testing::CountingEmbedder;

    fn cache(capacity: usize) -> IndexCache {
        IndexCache::new(capacity, TextSplitter::default(), in_memory_factory())
    }

    #[tokio::test]
    async fn test_identical_content_builds_once() {
        let embedder = CountingEmbedder::new();
        let rag = RagService::with_defaults(embedder.clone());
        let mut cache = cache(DEFAULT_CACHE_CAPACITY);

        let (first, status) = cache
            .get_or_build("Batman is a superhero.", &rag)
            .await
            .unwrap();
        assert_eq!(status.cache, CacheStatus::Miss);
        assert_eq!(status.chunks, 1);

        let (second, status) = cache
            .get_or_build("Batman is a superhero.", &rag)
            .await
            .unwrap();
        assert_eq!(status.cache, CacheStatus::Hit);

        assert_eq!(embedder.batch_calls(), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_different_content_gets_its_own_entry() {
        let rag = RagService::with_defaults(CountingEmbedder::new());
        let mut cache = cache(DEFAULT_CACHE_CAPACITY);

        cache.get_or_build("Batman is a superhero.", &rag).await.unwrap();
        cache.get_or_build("Batman is a superhero!", &rag).await.unwrap();

        assert_eq!(cache.len(), 2);
        assert!(cache.contains("Batman is a superhero."));
        assert!(cache.contains("Batman is a superhero!"));
    }

    #[tokio::test]
    async fn test_least_recently_used_entry_is_evicted() {
        let embedder = CountingEmbedder::new();
        let rag = RagService::with_defaults(embedder.clone());
        let mut cache = cache(2);

        cache.get_or_build("alpha", &rag).await.unwrap();
        cache.get_or_build("beta", &rag).await.unwrap();
        cache.get_or_build("alpha", &rag).await.unwrap();
        cache.get_or_build("gamma", &rag).await.unwrap();

        assert!(cache.contains("alpha"));
        assert!(!cache.contains("beta"));
        assert!(cache.contains("gamma"));
        assert_eq!(embedder.batch_calls(), 3);
    }

    #[tokio::test]
    async fn test_clear_drops_everything() {
        let rag = RagService::with_defaults(CountingEmbedder::new());
        let mut cache = cache(4);
        cache.get_or_build("alpha", &rag).await.unwrap();

        cache.clear();

        assert!(cache.is_empty());
    }
}
