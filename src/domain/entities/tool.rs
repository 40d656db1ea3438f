use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::DomainError;

pub const WIKIPEDIA_TOOL: &str = "wikipedia";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

impl ToolSpec {
    pub fn wikipedia() -> Self {
        Self {
            name: WIKIPEDIA_TOOL.to_string(),
            description: "Search Wikipedia for information the conversation does not already \
                          contain. Pass a short free-text search term."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "searchTerm": {
                        "type": "string",
                        "description": "The term to search Wikipedia for"
                    }
                },
                "required": ["searchTerm"]
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    pub arguments: serde_json::Value,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, arguments: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WikipediaArgs {
    search_term: String,
}

/// Extracts the search term from a `wikipedia` tool call.
pub fn wikipedia_search_term(call: &ToolCall) -> Result<String, DomainError> {
    // Some providers hand back arguments as a JSON-encoded string.
    let args: WikipediaArgs = match &call.arguments {
        serde_json::Value::String(raw) => serde_json::from_str(raw),
        other => serde_json::from_value(other.clone()),
    }
    .map_err(|e| DomainError::validation(format!("wikipedia tool arguments: {e}")))?;

    let term = args.search_term.trim();
    if term.is_empty() {
        return Err(DomainError::validation("wikipedia searchTerm is empty"));
    }
    Ok(term.to_string())
}

/// What the model returned: natural-language text plus any tool calls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Completion {
    pub content: String,
    pub tool_calls: Vec<ToolCall>,
}

impl Completion {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    pub fn with_tool_call(mut self, call: ToolCall) -> Self {
        self.tool_calls.push(call);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReasoningOutcome {
    Answered(String),
    SearchRequested {
        search_term: String,
        provisional_answer: String,
    },
}

impl ReasoningOutcome {
    pub fn search_term(&self) -> Option<&str> {
        match self {
            Self::Answered(_) => None,
            Self::SearchRequested { search_term, .. } => Some(search_term),
        }
    }
}
