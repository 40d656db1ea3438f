use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ContentChunk;

/// A single conversation thread. One exists per process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Uuid,
    pub state: ConversationState,
    pub turns: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            state: ConversationState::default(),
            turns: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces the carried state with the outcome of a completed turn.
    pub fn commit(&mut self, state: ConversationState) {
        self.state = state;
        self.turns += 1;
        self.updated_at = Utc::now();
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

/// State threaded from one turn into the next.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    pub question: String,
    pub previous_question: Option<String>,
    pub context: Vec<ContentChunk>,
    pub search_content: String,
    pub search_term: Option<String>,
    pub answer: Option<String>,
}

impl ConversationState {
    /// Follow-up reasoning needs both retrieved context and a prior answer.
    pub fn has_prior_knowledge(&self) -> bool {
        !self.context.is_empty() && self.answer.as_deref().is_some_and(|a| !a.is_empty())
    }

    pub fn joined_context(&self) -> String {
        join_chunks(&self.context)
    }
}

pub fn join_chunks(chunks: &[ContentChunk]) -> String {
    chunks
        .iter()
        .map(|c| c.content.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prior_knowledge_requires_context_and_answer() {
        let mut state = ConversationState::default();
        assert!(!state.has_prior_knowledge());

        state.answer = Some("Batman is a superhero.".into());
        assert!(!state.has_prior_knowledge());

        state.context = vec![ContentChunk::new("Batman is a superhero.", 0, 0)];
        assert!(state.has_prior_knowledge());

        state.answer = Some(String::new());
        assert!(!state.has_prior_knowledge());
    }

    #[test]
    fn test_commit_counts_turns() {
        let mut conversation = Conversation::new();
        let id = conversation.id;

        let state = ConversationState {
            question: "Who is Batman?".into(),
            ..Default::default()
        };
        conversation.commit(state.clone());

        assert_eq!(conversation.id, id);
        assert_eq!(conversation.turns, 1);
        assert_eq!(conversation.state, state);
    }

    #[test]
    fn test_joined_context_uses_newlines() {
        let state = ConversationState {
            context: vec![
                ContentChunk::new("first", 0, 0),
                ContentChunk::new("second", 10, 1),
            ],
            ..Default::default()
        };
        assert_eq!(state.joined_context(), "first\nsecond");
    }
}
