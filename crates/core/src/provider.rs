//! Assistant trait: the abstraction over LLM backends.
//!
//! An Assistant answers one grounded question: it renders the system prompt,
//! sends prior turns plus the new question to its backend, and reports the
//! outcome as an [`AssistantReply`]. Failures never escape as errors; the
//! adapter classifies them and returns a failed reply instead.
//!
//! Implementations: Anthropic, Groq, HuggingFace, Ollama.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::message::ChatTurn;

/// Message attached to every successful reply.
pub const SUCCESS_MESSAGE: &str = "Response generated successfully";

/// The uniform result every backend returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantReply {
    /// Whether the backend produced an answer
    pub success: bool,

    /// The answer text (empty on failure)
    pub response: String,

    /// Human-readable status or error
    pub message: String,
}

impl AssistantReply {
    /// A successful answer.
    pub fn answer(response: impl Into<String>) -> Self {
        Self {
            success: true,
            response: response.into(),
            message: SUCCESS_MESSAGE.into(),
        }
    }

    /// A failed call with an actionable message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            response: String::new(),
            message: message.into(),
        }
    }

    /// Normalize an adapter's internal result at the trait boundary.
    pub fn from_result(result: std::result::Result<String, ProviderError>) -> Self {
        match result {
            Ok(text) => Self::answer(text),
            Err(e) => Self::failure(e.to_string()),
        }
    }
}

impl From<std::result::Result<String, ProviderError>> for AssistantReply {
    fn from(result: std::result::Result<String, ProviderError>) -> Self {
        Self::from_result(result)
    }
}

/// The core Assistant trait.
///
/// Every backend implements this. Callers hold an `Arc<dyn Assistant>` or a
/// concrete registry variant without knowing which provider answers.
#[async_trait]
pub trait Assistant: Send + Sync {
    /// Display name, e.g. "Llama 3.3 70B (Groq - Free)".
    fn provider_name(&self) -> &str;

    /// Answer `question` about `source_name`, grounded in `kb_content`.
    ///
    /// `history` holds completed turns only; the question being answered is
    /// never part of it.
    async fn get_response(
        &self,
        question: &str,
        kb_content: &str,
        source_name: &str,
        history: &[ChatTurn],
    ) -> AssistantReply;
}
