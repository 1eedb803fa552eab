//! Groq provider (free tier, fast).
//!
//! Groq exposes an OpenAI-compatible `/chat/completions` endpoint, so the
//! wire types here are the standard chat-completions shapes: a system message
//! followed by the conversation, Bearer authentication.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use siemguide_core::message::ChatTurn;
use siemguide_core::prompt::build_system_prompt;
use siemguide_core::{Assistant, AssistantReply, ProviderError};
use std::time::Duration;
use tracing::{debug, warn};

use crate::transport::{self, TransportMessages};

const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
const MAX_TOKENS: u32 = 2048;
const TEMPERATURE: f32 = 0.7;
const TIMEOUT: Duration = Duration::from_secs(60);

const INVALID_KEY: &str = "Invalid Groq API key.";
const RATE_LIMITED: &str = "Rate limit exceeded. Groq free tier has limits.";
const NO_CHOICES: &str = "Error: no choices in Groq response";
const EMPTY_MESSAGE: &str = "Groq returned an empty message";
const TRANSPORT: TransportMessages = TransportMessages {
    timeout: "Request timed out. Please try again.",
    connect: "Failed to connect to Groq API. Check your network connection and try again.",
};

/// Groq chat-completions provider.
pub struct GroqProvider {
    base_url: String,
    api_key: String,
    model: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl GroqProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.into(),
            timeout: TIMEOUT,
            client: reqwest::Client::new(),
        }
    }

    /// Point at another OpenAI-compatible endpoint (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Per-request timeout for inference calls.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// System prompt, then history verbatim, then the question.
    fn to_api_messages(system: String, history: &[ChatTurn], question: &str) -> Vec<ApiMessage> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ApiMessage {
            role: "system".into(),
            content: system,
        });
        messages.extend(history.iter().map(|turn| ApiMessage {
            role: turn.role.as_str().into(),
            content: turn.content.clone(),
        }));
        messages.push(ApiMessage {
            role: "user".into(),
            content: question.into(),
        });
        messages
    }

    async fn complete(&self, messages: Vec<ApiMessage>) -> Result<String, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ApiRequest {
            model: &self.model,
            messages,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        debug!(provider = "groq", model = %self.model, "Sending completion request");

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport::classify(e, &TRANSPORT))?;

        let status = response.status().as_u16();

        if status == 401 {
            return Err(ProviderError::AuthenticationFailed(INVALID_KEY.into()));
        }
        if status == 429 {
            return Err(ProviderError::RateLimited(RATE_LIMITED.into()));
        }
        if status != 200 {
            let error_body = transport::error_body(response).await;
            warn!(status, body = %error_body, "Groq returned error");
            return Err(ProviderError::ApiError {
                status_code: status,
                message: format!("Groq API error: {status}"),
            });
        }

        let api_response: ApiResponse = response.json().await.map_err(|e| {
            ProviderError::InvalidResponse(format!("Error: failed to parse Groq response: {e}"))
        })?;

        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::InvalidResponse(NO_CHOICES.into()))?;
        choice
            .message
            .content
            .ok_or_else(|| ProviderError::InvalidResponse(EMPTY_MESSAGE.into()))
    }
}

#[async_trait]
impl Assistant for GroqProvider {
    fn provider_name(&self) -> &str {
        "Llama 3.3 70B (Groq - Free)"
    }

    async fn get_response(
        &self,
        question: &str,
        kb_content: &str,
        source_name: &str,
        history: &[ChatTurn],
    ) -> AssistantReply {
        let system = build_system_prompt(source_name, kb_content);
        let messages = Self::to_api_messages(system, history, question);
        self.complete(messages).await.into()
    }
}

// --- chat-completions API types (internal) ---

#[derive(Debug, Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: Vec<ApiMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ApiChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}
