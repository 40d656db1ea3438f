mod answer;
mod fetcher;
mod index;
pub mod prompts;
mod rag;
mod reasoning;

pub use answer::AnswerService;
pub use fetcher::{ContentFetcher, DEFAULT_MAX_PAGES};
pub use index::{CacheStatus, IndexCache, IndexStatus, DEFAULT_CACHE_CAPACITY};
pub use prompts::PromptsConfig;
pub use rag::{RagService, DEFAULT_TOP_K};
pub use reasoning::{interpret, ReasoningMode, ReasoningService};
