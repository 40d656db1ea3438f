mod chunk;
mod conversation;
mod embedding;
mod tool;

pub use chunk::{ContentChunk, SearchResult, TextSplitter, DEFAULT_SEPARATORS};
pub use conversation::{join_chunks, Conversation, ConversationState, Message, MessageRole};
pub use embedding::Embedding;
pub use tool::{
    wikipedia_search_term, Completion, ReasoningOutcome, ToolCall, ToolSpec, WIKIPEDIA_TOOL,
};
