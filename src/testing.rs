//! In-process fakes for every port, shared by the unit tests.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::domain::ports::{EmbeddingService, EncyclopediaSource, LlmService};
use crate::domain::{Completion, DomainError, Embedding, Message, ToolCall, ToolSpec};

#[derive(Default)]
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<Result<Completion, DomainError>>>,
    calls: Mutex<Vec<(Vec<Message>, Vec<ToolSpec>)>>,
}

impl ScriptedLlm {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(self: &Arc<Self>, completion: Completion) -> Arc<Self> {
        self.replies.lock().unwrap().push_back(Ok(completion));
        self.clone()
    }

    pub fn reply_text(self: &Arc<Self>, text: &str) -> Arc<Self> {
        self.reply(Completion::text(text))
    }

    pub fn reply_search(self: &Arc<Self>, term: &str) -> Arc<Self> {
        self.reply(Completion::text("").with_tool_call(ToolCall::new(
            "wikipedia",
            serde_json::json!({ "searchTerm": term }),
        )))
    }

    pub fn fail(self: &Arc<Self>, message: &str) -> Arc<Self> {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err(DomainError::external(message)));
        self.clone()
    }

    pub fn calls(&self) -> Vec<(Vec<Message>, Vec<ToolSpec>)> {
        self.calls.lock().unwrap().clone()
    }

    /// The user-facing prompt of the n-th call.
    pub fn prompt(&self, n: usize) -> String {
        self.calls()[n]
            .0
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LlmService for ScriptedLlm {
    async fn complete(
        &self,
        messages: &[Message],
        tools: &[ToolSpec],
    ) -> Result<Completion, DomainError> {
        self.calls
            .lock()
            .unwrap()
            .push((messages.to_vec(), tools.to_vec()));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(DomainError::external("no scripted completion left")))
    }
}

/// Bag-of-words embedder that counts how often it is called.
#[derive(Default)]
pub struct CountingEmbedder {
    pub batch_calls: AtomicUsize,
    pub single_calls: AtomicUsize,
}

impl CountingEmbedder {
    const DIMENSION: usize = 64;

    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }

    pub fn single_calls(&self) -> usize {
        self.single_calls.load(Ordering::SeqCst)
    }

    pub fn vector(text: &str) -> Embedding {
        let mut v = vec![0.0_f32; Self::DIMENSION];
        for word in text
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let bucket = word
                .bytes()
                .fold(7usize, |h, b| h.wrapping_mul(31).wrapping_add(b as usize))
                % Self::DIMENSION;
            v[bucket] += 1.0;
        }
        Embedding::new(v)
    }
}

#[async_trait]
impl EmbeddingService for CountingEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, DomainError> {
        self.single_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Self::vector(text))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, DomainError> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|t| Self::vector(t)).collect())
    }

    fn model(&self) -> &str {
        "counting-test-embedder"
    }
}

#[derive(Default)]
pub struct FakeEncyclopedia {
    results: HashMap<String, Vec<String>>,
    pages: HashMap<String, String>,
    delays: HashMap<String, Duration>,
    searches: Mutex<Vec<String>>,
    page_requests: Mutex<Vec<String>>,
}

impl FakeEncyclopedia {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_results(mut self, term: &str, titles: &[&str]) -> Self {
        self.results
            .insert(term.to_string(), titles.iter().map(|t| t.to_string()).collect());
        self
    }

    pub fn with_page(mut self, title: &str, text: &str) -> Self {
        self.pages.insert(title.to_string(), text.to_string());
        self
    }

    pub fn with_delay(mut self, title: &str, delay: Duration) -> Self {
        self.delays.insert(title.to_string(), delay);
        self
    }

    pub fn searches(&self) -> Vec<String> {
        self.searches.lock().unwrap().clone()
    }

    pub fn page_requests(&self) -> Vec<String> {
        self.page_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl EncyclopediaSource for FakeEncyclopedia {
    // Ignores `limit` so callers must cap the result themselves.
    async fn search(&self, term: &str, _limit: usize) -> Result<Vec<String>, DomainError> {
        self.searches.lock().unwrap().push(term.to_string());
        Ok(self.results.get(term).cloned().unwrap_or_default())
    }

    async fn page_text(&self, title: &str) -> Result<String, DomainError> {
        self.page_requests.lock().unwrap().push(title.to_string());
        if let Some(delay) = self.delays.get(title) {
            tokio::time::sleep(*delay).await;
        }
        self.pages
            .get(title)
            .cloned()
            .ok_or_else(|| DomainError::not_found(format!("page {title}")))
    }
}
