use crate::domain::{errors::DomainError, Completion, Message, ToolSpec};
use async_trait::async_trait;

#[async_trait]
pub trait LlmService: Send + Sync {
    /// Runs one completion. The model may answer in text, call one of
    /// `tools`, or both.
    async fn complete(
        &self,
        messages: &[Message],
        tools: &[ToolSpec],
    ) -> Result<Completion, DomainError>;
}
