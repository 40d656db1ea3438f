use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::application::services::{
    AnswerService, ContentFetcher, IndexCache, IndexStatus, RagService, ReasoningMode,
    ReasoningService,
};
use crate::domain::{Conversation, ConversationState, DomainError, ReasoningOutcome};

/// What happened during one turn, for status output.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReport {
    pub answer: String,
    pub mode: ReasoningMode,
    /// Set when the turn fetched fresh Wikipedia content.
    pub search_term: Option<String>,
    /// Set when the turn retrieved from an index.
    pub index: Option<IndexStatus>,
    pub context_chunks: usize,
}

/// Runs conversation turns: reason, fetch, retrieve, generate.
///
/// Owns the conversation and the index cache for the whole session. A
/// failed turn leaves the conversation exactly as it was before the turn.
pub struct TurnOrchestrator {
    conversation: Conversation,
    reasoning: ReasoningService,
    fetcher: ContentFetcher,
    indexes: IndexCache,
    rag: RagService,
    answers: AnswerService,
}

impl TurnOrchestrator {
    pub fn new(
        reasoning: ReasoningService,
        fetcher: ContentFetcher,
        indexes: IndexCache,
        rag: RagService,
        answers: AnswerService,
    ) -> Self {
        Self {
            conversation: Conversation::new(),
            reasoning,
            fetcher,
            indexes,
            rag,
            answers,
        }
    }

    pub fn conversation_id(&self) -> Uuid {
        self.conversation.id
    }

    pub fn state(&self) -> &ConversationState {
        &self.conversation.state
    }

    pub fn indexes(&self) -> &IndexCache {
        &self.indexes
    }

    /// Drops every cached index. Called when the session ends.
    pub fn end_session(&mut self) {
        info!(
            conversation = %self.conversation.id,
            turns = self.conversation.turns,
            indexes = self.indexes.len(),
            "session ended"
        );
        self.indexes.clear();
    }

    pub async fn run_turn(&mut self, question: &str) -> Result<TurnReport, DomainError> {
        let span = info_span!(
            "turn",
            conversation = %self.conversation.id,
            turn = self.conversation.turns + 1
        );
        let (state, report) = self.execute(question).instrument(span).await?;
        self.conversation.commit(state);
        Ok(report)
    }

    async fn execute(
        &mut self,
        question: &str,
    ) -> Result<(ConversationState, TurnReport), DomainError> {
        let mut state = self.conversation.state.clone();
        state.question = question.to_string();

        // Search
        let (mode, outcome) = self.reasoning.reason(&state).await?;
        let provisional = match outcome {
            ReasoningOutcome::SearchRequested {
                search_term,
                provisional_answer,
            } => {
                state.search_term = Some(search_term);
                state.previous_question = Some(question.to_string());
                provisional_answer
            }
            ReasoningOutcome::Answered(text) => {
                state.search_term = None;
                text
            }
        };

        // FetchWiki
        let search_term = state.search_term.clone();
        if let Some(term) = &search_term {
            info!(search_term = %term, "fetching wikipedia content");
            state.search_content = self.fetcher.fetch(term).await?;
        }

        if state.search_content.is_empty() {
            // Nothing has ever been fetched, so there is no index to consult.
            state.answer = Some(provisional.clone());
            let report = TurnReport {
                answer: provisional,
                mode,
                search_term,
                index: None,
                context_chunks: state.context.len(),
            };
            return Ok((state, report));
        }

        // Retrieve. Runs even when the fetch was skipped, against the most
        // recently fetched content.
        let (index, index_status) = self
            .indexes
            .get_or_build(&state.search_content, &self.rag)
            .await?;
        state.context = self.rag.retrieve(index.as_ref(), question).await?;

        // Generate. Always regenerated, never replayed from the last turn.
        let answer = self.answers.generate(question, &state.context).await?;
        state.answer = Some(answer.clone());

        let report = TurnReport {
            answer,
            mode,
            search_term,
            index: Some(index_status),
            context_chunks: state.context.len(),
        };
        Ok((state, report))
    }
}
