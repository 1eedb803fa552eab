//! HuggingFace Inference API provider (free tier, slower).
//!
//! The inference endpoint takes a single instruction-formatted string rather
//! than a message list, so history is linearized into `User:` / `Assistant:`
//! lines inside a Mixtral `[INST]` block.

use async_trait::async_trait;
use serde::Serialize;
use siemguide_core::message::{ChatTurn, Role};
use siemguide_core::prompt::{build_system_prompt, build_system_prompt_with_limit};
use siemguide_core::{Assistant, AssistantReply, ProviderError};
use std::time::Duration;
use tracing::{debug, warn};

use crate::transport::{self, TransportMessages};

const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co";
pub const DEFAULT_MODEL: &str = "mistralai/Mixtral-8x7B-Instruct-v0.1";
const MAX_NEW_TOKENS: u32 = 1500;
const TEMPERATURE: f32 = 0.7;
const TIMEOUT: Duration = Duration::from_secs(120);

/// Composed prompts longer than this are rebuilt with a smaller grounding
/// budget and no history. Tunable; not derived from the model's limits.
pub const MAX_PROMPT_CHARS: usize = 24_000;
/// Grounding budget used for the rebuilt prompt.
pub const REDUCED_KB_CHARS: usize = 12_000;

const INVALID_KEY: &str = "Invalid HuggingFace API key.";
const MODEL_LOADING: &str = "Model is loading. Please wait 20-30 seconds and try again.";
const RATE_LIMITED: &str = "Rate limit exceeded. Please try again later.";
const UNEXPECTED_FORMAT: &str = "Unexpected response format";
const TRANSPORT: TransportMessages = TransportMessages {
    timeout: "Request timed out. HuggingFace free tier can be slow.",
    connect: "Failed to connect to HuggingFace API. Check your network connection and try again.",
};

/// HuggingFace text-generation inference provider.
pub struct HuggingFaceProvider {
    base_url: String,
    api_key: String,
    model: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl HuggingFaceProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.into(),
            timeout: TIMEOUT,
            client: reqwest::Client::new(),
        }
    }

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

    /// Linearize system prompt, history and question into one instruction.
    fn compose_prompt(system: &str, history: &[ChatTurn], question: &str) -> String {
        let mut prompt = format!("<s>[INST] {system}\n\n");
        for turn in history {
            let speaker = match turn.role {
                Role::User => "User",
                Role::Assistant => "Assistant",
            };
            prompt.push_str(speaker);
            prompt.push_str(": ");
            prompt.push_str(&turn.content);
            prompt.push('\n');
        }
        prompt.push_str("User question: ");
        prompt.push_str(question);
        prompt.push_str(" [/INST]");
        prompt
    }

    /// Full prompt, or a reduced one if the full prompt is over budget.
    fn build_prompt(
        question: &str,
        kb_content: &str,
        source_name: &str,
        history: &[ChatTurn],
    ) -> String {
        let system = build_system_prompt(source_name, kb_content);
        let prompt = Self::compose_prompt(&system, history, question);
        if prompt.chars().count() <= MAX_PROMPT_CHARS {
            return prompt;
        }

        debug!(
            provider = "huggingface",
            chars = prompt.chars().count(),
            "Prompt over budget, rebuilding with reduced grounding and no history"
        );
        let system = build_system_prompt_with_limit(source_name, kb_content, REDUCED_KB_CHARS);
        Self::compose_prompt(&system, &[], question)
    }

    async fn complete(&self, prompt: String) -> Result<String, ProviderError> {
        let url = format!("{}/models/{}", self.base_url, self.model);
        let body = InferenceRequest {
            inputs: prompt,
            parameters: InferenceParameters {
                max_new_tokens: MAX_NEW_TOKENS,
                temperature: TEMPERATURE,
                return_full_text: false,
            },
        };

        debug!(provider = "huggingface", model = %self.model, "Sending inference request");

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

        match status {
            200 => {}
            401 => return Err(ProviderError::AuthenticationFailed(INVALID_KEY.into())),
            503 => return Err(ProviderError::ModelLoading(MODEL_LOADING.into())),
            429 => return Err(ProviderError::RateLimited(RATE_LIMITED.into())),
            _ => {
                let error_body = transport::error_body(response).await;
                warn!(status, body = %error_body, "HuggingFace returned error");
                return Err(ProviderError::ApiError {
                    status_code: status,
                    message: format!("HuggingFace API error: {status}"),
                });
            }
        }

        let data: serde_json::Value = response
            .json()
            .await
            .map_err(|_| ProviderError::InvalidResponse(UNEXPECTED_FORMAT.into()))?;

        Self::generated_text(&data)
    }

    /// Expected body: `[{"generated_text": "..."}]`.
    fn generated_text(data: &serde_json::Value) -> Result<String, ProviderError> {
        match data.as_array().and_then(|items| items.first()) {
            Some(first) => Ok(first["generated_text"]
                .as_str()
                .unwrap_or_default()
                .trim()
                .to_string()),
            None => Err(ProviderError::InvalidResponse(UNEXPECTED_FORMAT.into())),
        }
    }
}

#[async_trait]
impl Assistant for HuggingFaceProvider {
    fn provider_name(&self) -> &str {
        "Mixtral 8x7B (HuggingFace - Free)"
    }

    async fn get_response(
        &self,
        question: &str,
        kb_content: &str,
        source_name: &str,
        history: &[ChatTurn],
    ) -> AssistantReply {
        let prompt = Self::build_prompt(question, kb_content, source_name, history);
        self.complete(prompt).await.into()
    }
}

#[derive(Debug, Serialize)]
struct InferenceRequest {
    inputs: String,
    parameters: InferenceParameters,
}

#[derive(Debug, Serialize)]
struct InferenceParameters {
    max_new_tokens: u32,
    temperature: f32,
    return_full_text: bool,
}
