//! Anthropic native provider implementation (paid, most capable).
//!
//! Uses Anthropic's Messages API directly:
//! - `x-api-key` header authentication (not Bearer)
//! - `anthropic-version` header
//! - System prompt as a top-level field, not a message

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use siemguide_core::message::ChatTurn;
use siemguide_core::prompt::build_system_prompt;
use siemguide_core::{Assistant, AssistantReply, ProviderError};
use std::time::Duration;
use tracing::{debug, warn};

use crate::transport::{self, TransportMessages};

const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const MAX_TOKENS: u32 = 2048;
const TIMEOUT: Duration = Duration::from_secs(120);

const AUTH_FAILED: &str = "Authentication failed. Please check your API key.";
const RATE_LIMITED: &str = "Rate limit exceeded. Please wait and try again.";
const TRANSPORT: TransportMessages = TransportMessages {
    timeout: "Claude API request timed out. Please try again.",
    connect: "Failed to connect to Claude API.",
};

/// Anthropic native Messages API provider.
pub struct AnthropicProvider {
    base_url: String,
    api_key: String,
    model: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.into(),
            timeout: TIMEOUT,
            client: reqwest::Client::new(),
        }
    }

    /// Create with a custom base URL (e.g., for testing or proxies).
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

    /// History verbatim with roles preserved, then the new question.
    fn to_api_messages(history: &[ChatTurn], question: &str) -> Vec<AnthropicMessage> {
        history
            .iter()
            .map(|turn| AnthropicMessage {
                role: turn.role.as_str().into(),
                content: turn.content.clone(),
            })
            .chain(std::iter::once(AnthropicMessage {
                role: "user".into(),
                content: question.into(),
            }))
            .collect()
    }

    async fn complete(
        &self,
        system: String,
        messages: Vec<AnthropicMessage>,
    ) -> Result<String, ProviderError> {
        let url = format!("{}/v1/messages", self.base_url);
        let body = AnthropicRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            system,
            messages,
        };

        debug!(provider = "anthropic", model = %self.model, "Sending completion request");

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport::classify(e, &TRANSPORT))?;

        let status = response.status().as_u16();

        if status == 401 || status == 403 {
            return Err(ProviderError::AuthenticationFailed(AUTH_FAILED.into()));
        }
        if status == 429 {
            return Err(ProviderError::RateLimited(RATE_LIMITED.into()));
        }
        if status != 200 {
            let error_body = transport::error_body(response).await;
            warn!(status, body = %error_body, "Anthropic API error");
            return Err(ProviderError::ApiError {
                status_code: status,
                message: format!("Error: Claude API returned {status}: {error_body}"),
            });
        }

        let api_resp: AnthropicResponse = response.json().await.map_err(|e| {
            ProviderError::InvalidResponse(format!("Error: failed to parse Claude response: {e}"))
        })?;

        Self::response_text(api_resp)
    }

    fn response_text(resp: AnthropicResponse) -> Result<String, ProviderError> {
        let text: Vec<String> = resp
            .content
            .into_iter()
            .filter_map(|block| match block {
                ResponseContentBlock::Text { text } => Some(text),
                ResponseContentBlock::Other => None,
            })
            .collect();

        if text.is_empty() {
            return Err(ProviderError::InvalidResponse(
                "Error: Claude returned no text content".into(),
            ));
        }
        Ok(text.join("\n"))
    }
}

#[async_trait]
impl Assistant for AnthropicProvider {
    fn provider_name(&self) -> &str {
        "Claude (Anthropic)"
    }

    async fn get_response(
        &self,
        question: &str,
        kb_content: &str,
        source_name: &str,
        history: &[ChatTurn],
    ) -> AssistantReply {
        let system = build_system_prompt(source_name, kb_content);
        let messages = Self::to_api_messages(history, question);
        self.complete(system, messages).await.into()
    }
}

// --- Anthropic API types ---

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: String,
    messages: Vec<AnthropicMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ResponseContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ResponseContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::test_support::{
        Captured, SHORT_TIMEOUT, closed_port_url, serve, slow_router,
    };
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};

    fn status_server(status: StatusCode) -> Router {
        Router::new().route("/v1/messages", post(move || async move { (status, "{}") }))
    }

    #[test]
    fn constructor() {
        let provider = AnthropicProvider::new("sk-ant-test");
        assert_eq!(provider.provider_name(), "Claude (Anthropic)");
        assert_eq!(provider.base_url, DEFAULT_BASE_URL);
        assert_eq!(provider.model(), DEFAULT_MODEL);
    }

    #[test]
    fn constructor_with_base_url() {
        let provider =
            AnthropicProvider::new("sk-ant-test").with_base_url("https://custom.proxy.com/");
        assert_eq!(provider.base_url, "https://custom.proxy.com");
    }

    #[test]
    fn history_then_question() {
        let history = vec![ChatTurn::user("Which ports?"), ChatTurn::assistant("514/udp")];
        let msgs = AnthropicProvider::to_api_messages(&history, "TLS?");
        assert_eq!(msgs.len(), 3);
        assert_eq!(msgs[0].role, "user");
        assert_eq!(msgs[1].role, "assistant");
        assert_eq!(msgs[2].role, "user");
        assert_eq!(msgs[2].content, "TLS?");
    }

    #[test]
    fn parse_text_response() {
        let resp: AnthropicResponse = serde_json::from_str(
            r#"{
                "id": "msg_01",
                "model": "claude-sonnet-4-20250514",
                "content": [{"type": "text", "text": "Use TCP 6514."}],
                "usage": {"input_tokens": 10, "output_tokens": 5},
                "stop_reason": "end_turn"
            }"#,
        )
        .unwrap();
        assert_eq!(AnthropicProvider::response_text(resp).unwrap(), "Use TCP 6514.");
    }

    #[test]
    fn non_text_blocks_ignored() {
        let resp: AnthropicResponse = serde_json::from_str(
            r#"{"content": [{"type": "thinking", "thinking": "hmm"}, {"type": "text", "text": "Answer"}]}"#,
        )
        .unwrap();
        assert_eq!(AnthropicProvider::response_text(resp).unwrap(), "Answer");

        let empty: AnthropicResponse = serde_json::from_str(r#"{"content": []}"#).unwrap();
        assert!(matches!(
            AnthropicProvider::response_text(empty),
            Err(ProviderError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn successful_call_sends_system_and_headers() {
        let captured = Captured::default();
        let cap = captured.clone();
        let router = Router::new().route(
            "/v1/messages",
            post(move |headers: HeaderMap, Json(body): Json<serde_json::Value>| {
                let cap = cap.clone();
                async move {
                    cap.record(&headers, body);
                    Json(serde_json::json!({
                        "content": [{"type": "text", "text": "Forward via syslog-ng."}]
                    }))
                }
            }),
        );
        let base = serve(router).await;
        let provider = AnthropicProvider::new("sk-ant-test").with_base_url(&base);

        let history = vec![ChatTurn::user("hi"), ChatTurn::assistant("hello")];
        let reply = provider
            .get_response("How do I forward logs?", "## Syslog\nUse 514.", "Linux (Syslog)", &history)
            .await;

        assert!(reply.success, "{}", reply.message);
        assert_eq!(reply.response, "Forward via syslog-ng.");

        let body = captured.body();
        assert_eq!(body["model"], DEFAULT_MODEL);
        assert_eq!(body["max_tokens"], 2048);
        assert!(body["system"].as_str().unwrap().contains("**Linux (Syslog)**"));
        assert_eq!(body["messages"].as_array().unwrap().len(), 3);
        assert_eq!(body["messages"][2]["content"], "How do I forward logs?");
        assert_eq!(captured.header("x-api-key").as_deref(), Some("sk-ant-test"));
        assert_eq!(
            captured.header("anthropic-version").as_deref(),
            Some(ANTHROPIC_VERSION)
        );
    }

    #[tokio::test]
    async fn auth_failure() {
        let base = serve(status_server(StatusCode::UNAUTHORIZED)).await;
        let provider = AnthropicProvider::new("bad").with_base_url(&base);
        let reply = provider.get_response("q", "kb", "Cisco ASA", &[]).await;
        assert!(!reply.success);
        assert!(reply.response.is_empty());
        assert_eq!(reply.message, AUTH_FAILED);
    }

    #[tokio::test]
    async fn forbidden_is_auth_failure() {
        let base = serve(status_server(StatusCode::FORBIDDEN)).await;
        let provider = AnthropicProvider::new("sk-ant-test").with_base_url(&base);
        let reply = provider.get_response("q", "kb", "Cisco ASA", &[]).await;
        assert_eq!(reply, AssistantReply::failure(AUTH_FAILED));
    }

    #[tokio::test]
    async fn rate_limited() {
        let base = serve(status_server(StatusCode::TOO_MANY_REQUESTS)).await;
        let provider = AnthropicProvider::new("sk").with_base_url(&base);
        let reply = provider.get_response("q", "kb", "Cisco ASA", &[]).await;
        assert_eq!(reply.message, RATE_LIMITED);
    }

    #[tokio::test]
    async fn other_status_includes_detail() {
        let base = serve(status_server(StatusCode::INTERNAL_SERVER_ERROR)).await;
        let provider = AnthropicProvider::new("sk").with_base_url(&base);
        let reply = provider.get_response("q", "kb", "Cisco ASA", &[]).await;
        assert!(!reply.success);
        assert!(reply.message.starts_with("Error:"));
        assert!(reply.message.contains("500"));
    }

    #[tokio::test]
    async fn connection_failure() {
        let provider = AnthropicProvider::new("sk").with_base_url(closed_port_url());
        let reply = provider.get_response("q", "kb", "Cisco ASA", &[]).await;
        assert!(!reply.success);
        assert_eq!(reply.message, "Failed to connect to Claude API.");
    }

    #[tokio::test]
    async fn slow_api_times_out() {
        let provider = AnthropicProvider::new("sk")
            .with_base_url(serve(slow_router("/v1/messages")).await)
            .with_timeout(SHORT_TIMEOUT);
        let reply = provider.get_response("q", "kb", "Cisco ASA", &[]).await;
        assert_eq!(
            reply,
            AssistantReply::failure("Claude API request timed out. Please try again.")
        );
    }
}
