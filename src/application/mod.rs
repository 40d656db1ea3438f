//! Application layer - Use cases and orchestration.
//!
//! Services here depend on domain ports (traits) rather than concrete
//! adapters. [`TurnOrchestrator`] sequences them into one conversation turn.

pub mod deadline;
pub mod orchestrator;
pub mod services;

pub use orchestrator::{TurnOrchestrator, TurnReport};
pub use services::{
    AnswerService, CacheStatus, ContentFetcher, IndexCache, IndexStatus, RagService,
    ReasoningMode, ReasoningService,
};
