use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::application::services::{DEFAULT_CACHE_CAPACITY, DEFAULT_MAX_PAGES, DEFAULT_TOP_K};
use crate::domain::DomainError;

pub use crate::application::services::PromptsConfig;

/// Credential shared by the completion and embedding providers.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub config: Config,
    pub prompts: PromptsConfig,
}

impl AppConfig {
    /// Defaults, overlaid with the YAML file at `path` when given.
    pub fn load(path: Option<&Path>) -> Result<Self, DomainError> {
        let config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|e| {
                    DomainError::configuration(format!("reading {}: {e}", path.display()))
                })?;
                Self::from_yaml(&raw)?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, DomainError> {
        serde_yaml::from_str(raw).map_err(|e| DomainError::configuration(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        let c = &self.config;
        if c.rag.top_k == 0 {
            return Err(DomainError::configuration("rag.top_k must be at least 1"));
        }
        if c.rag.cache_capacity == 0 {
            return Err(DomainError::configuration(
                "rag.cache_capacity must be at least 1",
            ));
        }
        if c.rag.chunk_size == 0 {
            return Err(DomainError::configuration("rag.chunk_size must be at least 1"));
        }
        if c.rag.chunk_overlap >= c.rag.chunk_size {
            return Err(DomainError::configuration(
                "rag.chunk_overlap must be smaller than rag.chunk_size",
            ));
        }
        if c.wikipedia.max_pages == 0 {
            return Err(DomainError::configuration(
                "wikipedia.max_pages must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Fails unless the provider credential is present and non-blank.
pub fn require_api_key() -> Result<(), DomainError> {
    check_api_key(std::env::var(API_KEY_VAR).ok().as_deref())
}

fn check_api_key(value: Option<&str>) -> Result<(), DomainError> {
    match value {
        Some(key) if !key.trim().is_empty() => Ok(()),
        _ => Err(DomainError::configuration(format!(
            "{API_KEY_VAR} is not set"
        ))),
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub llm: LlmConfig,
    pub embedding: EmbeddingConfig,
    pub wikipedia: WikipediaConfig,
    pub rag: RagConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub temperature: Option<f64>,
    pub timeout_seconds: u64,
}

impl LlmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: Some(0.0),
            timeout_seconds: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub model: String,
    pub dimension: usize,
    pub timeout_seconds: u64,
}

impl EmbeddingConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "text-embedding-3-small".to_string(),
            dimension: 1536,
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WikipediaConfig {
    pub base_url: String,
    pub max_pages: usize,
    pub user_agent: String,
    pub timeout_seconds: u64,
}

impl WikipediaConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for WikipediaConfig {
    fn default() -> Self {
        Self {
            base_url: "https://en.wikipedia.org/w/api.php".to_string(),
            max_pages: DEFAULT_MAX_PAGES,
            user_agent: concat!("wiki-rag/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_seconds: 20,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub top_k: usize,
    pub cache_capacity: usize,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
            top_k: DEFAULT_TOP_K,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}
