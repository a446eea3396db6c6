//! Classifier oracle — the capability the screening core uses for skill extraction
//! and synonym-aware matching.
//!
//! The oracle is untrusted and fallible. Callers treat any `ClassifierError` as a
//! single synchronous failure and fall back to deterministic logic; no retry happens
//! at this layer (the live backend owns its own 429/5xx backoff).
//!
//! Backends:
//! - `LlmClient` — live, via Claude.
//! - `OfflineClassifier` — always unavailable, so every caller takes its
//!   deterministic path. Used when no API key is configured.

use async_trait::async_trait;
use thiserror::Error;

use crate::llm_client::prompts::with_plain_text_instruction;
use crate::llm_client::{LlmClient, LlmError};

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Classifier unavailable: {0}")]
    Unavailable(String),

    #[error("Classifier returned an empty response")]
    EmptyResponse,
}

/// `classify(system_instructions, user_payload) -> text_response`.
///
/// Carried by the parser and matcher as `Arc<dyn SkillClassifier>`.
#[async_trait]
pub trait SkillClassifier: Send + Sync {
    async fn classify(&self, system: &str, payload: &str) -> Result<String, ClassifierError>;

    /// Backend label surfaced in screening responses — "llm" | "offline".
    fn backend(&self) -> &'static str;
}

#[async_trait]
impl SkillClassifier for LlmClient {
    async fn classify(&self, system: &str, payload: &str) -> Result<String, ClassifierError> {
        let system = with_plain_text_instruction(system);
        let text = self.call_text(payload, &system).await?;
        if text.trim().is_empty() {
            return Err(ClassifierError::EmptyResponse);
        }
        Ok(text)
    }

    fn backend(&self) -> &'static str {
        "llm"
    }
}

/// Classifier used when no live backend is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineClassifier;

#[async_trait]
impl SkillClassifier for OfflineClassifier {
    async fn classify(&self, _system: &str, _payload: &str) -> Result<String, ClassifierError> {
        Err(ClassifierError::Unavailable(
            "no ANTHROPIC_API_KEY configured".to_string(),
        ))
    }

    fn backend(&self) -> &'static str {
        "offline"
    }
}
