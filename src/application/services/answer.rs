use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

use super::prompts::{render, PromptVars, PromptsConfig};
use crate::application::deadline::with_deadline;
use crate::domain::{join_chunks, ports::LlmService, ContentChunk, DomainError, Message};

/// Synthesizes the final answer from retrieved chunks.
pub struct AnswerService {
    llm: Arc<dyn LlmService>,
    prompts: PromptsConfig,
    timeout: Duration,
}

impl AnswerService {
    pub fn new(llm: Arc<dyn LlmService>, prompts: PromptsConfig, timeout: Duration) -> Self {
        Self {
            llm,
            prompts,
            timeout,
        }
    }

    #[instrument(skip(self, context), fields(chunks = context.len()))]
    pub async fn generate(
        &self,
        question: &str,
        context: &[ContentChunk],
    ) -> Result<String, DomainError> {
        let context = join_chunks(context);
        let prompt = render(
            &self.prompts.answer,
            &PromptVars {
                question,
                context: &context,
                ..Default::default()
            },
        );
        let messages = [Message::system(&self.prompts.system), Message::user(prompt)];

        let completion = with_deadline(
            self.timeout,
            "answer completion",
            self.llm.complete(&messages, &[]),
        )
        .await?;

        Ok(completion.content)
    }
}
