use serde::{Deserialize, Serialize};

/// Prompt templates. Placeholders: `{question}`, `{context}`,
/// `{previous_answer}`, `{previous_question}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    pub system: String,
    pub fresh: String,
    pub follow_up: String,
    pub answer: String,
}

impl Default for PromptsConfig {
    fn default() -> Self {
        Self {
            system: "You are a helpful assistant that answers questions accurately and \
                     concisely. When you lack the knowledge to answer, call the `wikipedia` \
                     tool with a short search term instead of guessing."
                .to_string(),
            fresh: "Answer the following question. If you do not know the answer, call the \
                    `wikipedia` tool with a search term that would find it.\n\n\
                    Question: {question}"
                .to_string(),
            follow_up: "Here is what we already know.\n\n\
                        Previous question: {previous_question}\n\
                        Previous answer: {previous_answer}\n\
                        Context:\n{context}\n\n\
                        If this is enough to answer the new question, answer it directly. \
                        Otherwise call the `wikipedia` tool with a search term that would \
                        find the answer.\n\n\
                        Question: {question}"
                .to_string(),
            answer: "Answer the question using only the context below. If the context does \
                     not contain the answer, say so.\n\n\
                     Context:\n{context}\n\n\
                     Question: {question}"
                .to_string(),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PromptVars<'a> {
    pub question: &'a str,
    pub context: &'a str,
    pub previous_answer: &'a str,
    pub previous_question: &'a str,
}

pub fn render(template: &str, vars: &PromptVars<'_>) -> String {
    template
        .replace("{question}", vars.question)
        .replace("{context}", vars.context)
        .replace("{previous_answer}", vars.previous_answer)
        .replace("{previous_question}", vars.previous_question)
}
