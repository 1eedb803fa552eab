//! Ollama provider (local, no API key).
//!
//! Availability is decided by probing `GET /api/tags`; a running daemon
//! answers 200 there even with no models pulled.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use siemguide_core::message::ChatTurn;
use siemguide_core::prompt::build_system_prompt;
use siemguide_core::{Assistant, AssistantReply, ProviderError};
use std::time::Duration;
use tracing::{debug, warn};

use crate::transport::{self, TransportMessages};

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama3.2";
const TIMEOUT: Duration = Duration::from_secs(120);
const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

const TRANSPORT: TransportMessages = TransportMessages {
    timeout: "Ollama request timed out. Local models can be slow on first load.",
    connect: "Cannot connect to Ollama. Is it running locally?",
};

/// Locally running Ollama daemon.
pub struct OllamaProvider {
    base_url: String,
    model: String,
    name: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl OllamaProvider {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            model: DEFAULT_MODEL.into(),
            name: Self::display_name(DEFAULT_MODEL),
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
        self.name = Self::display_name(&self.model);
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

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn display_name(model: &str) -> String {
        format!("Ollama Local ({model})")
    }

    /// True iff the daemon answers `GET /api/tags` with 200 within 2s.
    pub async fn probe(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        match self.client.get(&url).timeout(PROBE_TIMEOUT).send().await {
            Ok(response) => response.status().as_u16() == 200,
            Err(e) => {
                debug!(url = %url, error = %e, "Ollama probe failed");
                false
            }
        }
    }

    fn to_api_messages(system: String, history: &[ChatTurn], question: &str) -> Vec<OllamaMessage> {
        std::iter::once(OllamaMessage {
            role: "system".into(),
            content: system,
        })
        .chain(history.iter().map(|turn| OllamaMessage {
            role: turn.role.as_str().into(),
            content: turn.content.clone(),
        }))
        .chain(std::iter::once(OllamaMessage {
            role: "user".into(),
            content: question.into(),
        }))
        .collect()
    }

    async fn complete(&self, messages: Vec<OllamaMessage>) -> Result<String, ProviderError> {
        let url = format!("{}/api/chat", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            messages,
            stream: false,
        };

        debug!(provider = "ollama", model = %self.model, "Sending chat request");

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport::classify(e, &TRANSPORT))?;

        let status = response.status().as_u16();
        if status != 200 {
            let error_body = transport::error_body(response).await;
            warn!(status, body = %error_body, "Ollama returned error");
            return Err(ProviderError::ApiError {
                status_code: status,
                message: format!("Ollama error: {status}"),
            });
        }

        let chat: ChatResponse = response.json().await.map_err(|e| {
            ProviderError::InvalidResponse(format!("Error: failed to parse Ollama response: {e}"))
        })?;

        Ok(chat.message.content)
    }
}

impl Default for OllamaProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Assistant for OllamaProvider {
    fn provider_name(&self) -> &str {
        &self.name
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

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<OllamaMessage>,
    stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct OllamaMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::test_support::{
        Captured, SHORT_TIMEOUT, closed_port_url, serve, slow_router,
    };
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, post};
    use axum::{Json, Router};

    #[test]
    fn name_follows_model() {
        assert_eq!(OllamaProvider::new().provider_name(), "Ollama Local (llama3.2)");
        let custom = OllamaProvider::new().with_model("mistral");
        assert_eq!(custom.provider_name(), "Ollama Local (mistral)");
        assert_eq!(custom.model(), "mistral");
    }

    #[test]
    fn system_message_first() {
        let history = vec![ChatTurn::user("a"), ChatTurn::assistant("b")];
        let msgs = OllamaProvider::to_api_messages("sys".into(), &history, "c");
        let roles: Vec<&str> = msgs.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, vec!["system", "user", "assistant", "user"]);
        assert_eq!(msgs[0].content, "sys");
    }

    #[tokio::test]
    async fn probe_reports_running_daemon() {
        let router = Router::new().route("/api/tags", get(|| async { Json(serde_json::json!({"models": []})) }));
        let provider = OllamaProvider::new().with_base_url(serve(router).await);
        assert!(provider.probe().await);
    }

    #[tokio::test]
    async fn probe_rejects_non_200() {
        let router = Router::new().route(
            "/api/tags",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "down") }),
        );
        let provider = OllamaProvider::new().with_base_url(serve(router).await);
        assert!(!provider.probe().await);
    }

    #[tokio::test]
    async fn probe_closed_port() {
        let provider = OllamaProvider::new().with_base_url(closed_port_url());
        assert!(!provider.probe().await);
    }

    #[tokio::test]
    async fn successful_chat() {
        let captured = Captured::default();
        let cap = captured.clone();
        let router = Router::new().route(
            "/api/chat",
            post(move |headers: HeaderMap, Json(body): Json<serde_json::Value>| {
                let cap = cap.clone();
                async move {
                    cap.record(&headers, body);
                    Json(serde_json::json!({
                        "model": "llama3.2",
                        "message": {"role": "assistant", "content": "Use the Windows TA."},
                        "done": true
                    }))
                }
            }),
        );
        let provider = OllamaProvider::new().with_base_url(serve(router).await);
        let reply = provider
            .get_response("Which add-on?", "## Add-ons", "Windows Event Logs", &[])
            .await;

        assert!(reply.success, "{}", reply.message);
        assert_eq!(reply.response, "Use the Windows TA.");

        let body = captured.body();
        assert_eq!(body["model"], "llama3.2");
        assert_eq!(body["stream"], false);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "Which add-on?");
        assert!(captured.header("authorization").is_none());
    }

    #[tokio::test]
    async fn error_status() {
        let router = Router::new().route(
            "/api/chat",
            post(|| async { (StatusCode::NOT_FOUND, "model not found") }),
        );
        let provider = OllamaProvider::new().with_base_url(serve(router).await);
        let reply = provider.get_response("q", "kb", "Cisco ASA", &[]).await;
        assert_eq!(reply, AssistantReply::failure("Ollama error: 404"));
    }

    #[tokio::test]
    async fn not_running() {
        let provider = OllamaProvider::new().with_base_url(closed_port_url());
        let reply = provider.get_response("q", "kb", "Cisco ASA", &[]).await;
        assert!(!reply.success);
        assert_eq!(reply.message, "Cannot connect to Ollama. Is it running locally?");
    }

    #[tokio::test]
    async fn slow_model_times_out() {
        let provider = OllamaProvider::new()
            .with_base_url(serve(slow_router("/api/chat")).await)
            .with_timeout(SHORT_TIMEOUT);
        let reply = provider.get_response("q", "kb", "Cisco ASA", &[]).await;
        assert_eq!(
            reply,
            AssistantReply::failure("Ollama request timed out. Local models can be slow on first load.")
        );
    }
}
