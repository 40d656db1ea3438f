use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use super::prompts::{render, PromptVars, PromptsConfig};
use crate::application::deadline::with_deadline;
use crate::domain::{
    ports::LlmService, wikipedia_search_term, Completion, ConversationState, DomainError, Message,
    ReasoningOutcome, ToolSpec, WIKIPEDIA_TOOL,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReasoningMode {
    Fresh,
    FollowUp,
}

impl ReasoningMode {
    pub fn for_state(state: &ConversationState) -> Self {
        if state.has_prior_knowledge() {
            Self::FollowUp
        } else {
            Self::Fresh
        }
    }
}

/// Decides whether a question needs a Wikipedia search.
pub struct ReasoningService {
    llm: Arc<dyn LlmService>,
    prompts: PromptsConfig,
    tools: Vec<ToolSpec>,
    timeout: Duration,
}

impl ReasoningService {
    pub fn new(llm: Arc<dyn LlmService>, prompts: PromptsConfig, timeout: Duration) -> Self {
        Self {
            llm,
            prompts,
            tools: vec![ToolSpec::wikipedia()],
            timeout,
        }
    }

    /// Reasons about `state.question` in the mode the state calls for.
    #[instrument(skip(self, state), fields(question = %state.question))]
    pub async fn reason(
        &self,
        state: &ConversationState,
    ) -> Result<(ReasoningMode, ReasoningOutcome), DomainError> {
        let mode = ReasoningMode::for_state(state);
        let messages = self.build_messages(mode, state);

        let completion = with_deadline(
            self.timeout,
            "reasoning completion",
            self.llm.complete(&messages, &self.tools),
        )
        .await?;

        let outcome = interpret(completion)?;
        debug!(?mode, search_term = ?outcome.search_term(), "reasoning finished");
        Ok((mode, outcome))
    }

    fn build_messages(&self, mode: ReasoningMode, state: &ConversationState) -> Vec<Message> {
        let prompt = match mode {
            ReasoningMode::Fresh => render(
                &self.prompts.fresh,
                &PromptVars {
                    question: &state.question,
                    ..Default::default()
                },
            ),
            ReasoningMode::FollowUp => {
                let context = state.joined_context();
                render(
                    &self.prompts.follow_up,
                    &PromptVars {
                        question: &state.question,
                        context: &context,
                        previous_answer: state.answer.as_deref().unwrap_or_default(),
                        previous_question: state.previous_question.as_deref().unwrap_or_default(),
                    },
                )
            }
        };

        vec![Message::system(&self.prompts.system), Message::user(prompt)]
    }
}

/// Turns a raw completion into an outcome. A malformed `wikipedia` call
/// cannot be recovered locally, so it surfaces as an external failure.
pub fn interpret(completion: Completion) -> Result<ReasoningOutcome, DomainError> {
    let mut search_term = None;
    for call in &completion.tool_calls {
        if call.name != WIKIPEDIA_TOOL {
            warn!(tool = %call.name, "ignoring unknown tool call");
            continue;
        }
        let term = wikipedia_search_term(call)
            .map_err(|e| DomainError::external(format!("model issued a bad search: {e}")))?;
        search_term.get_or_insert(term);
    }

    Ok(match search_term {
        Some(search_term) => ReasoningOutcome::SearchRequested {
            search_term,
            provisional_answer: completion.content,
        },
        None => ReasoningOutcome::Answered(completion.content),
    })
}
