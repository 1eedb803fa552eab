//! Provider registry: which assistants exist, which are usable, and which
//! one to pick.
//!
//! Hosted providers are usable iff their API key is present and non-blank.
//! Ollama needs no key and is usable iff the local daemon answers a probe.
//! Automatic selection walks [`ProviderKind::PRIORITY`]: free and fast first,
//! paid next, local last.

use async_trait::async_trait;
use serde::Serialize;
use siemguide_config::{AppConfig, ProviderConfig};
use siemguide_core::message::ChatTurn;
use siemguide_core::{Assistant, AssistantReply, CredentialLookup};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

use crate::anthropic::AnthropicProvider;
use crate::groq::GroqProvider;
use crate::huggingface::HuggingFaceProvider;
use crate::ollama::OllamaProvider;

/// The closed set of supported providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Groq,
    HuggingFace,
    Anthropic,
    Ollama,
}

impl ProviderKind {
    /// Automatic selection order.
    pub const PRIORITY: [ProviderKind; 4] = [
        ProviderKind::Groq,
        ProviderKind::HuggingFace,
        ProviderKind::Anthropic,
        ProviderKind::Ollama,
    ];

    /// Stable identifier used in config and on the command line.
    pub fn id(self) -> &'static str {
        match self {
            ProviderKind::Groq => "groq",
            ProviderKind::HuggingFace => "huggingface",
            ProviderKind::Anthropic => "claude",
            ProviderKind::Ollama => "ollama",
        }
    }

    pub fn descriptor(self) -> &'static ProviderDescriptor {
        match self {
            ProviderKind::Groq => &PROVIDERS[0],
            ProviderKind::HuggingFace => &PROVIDERS[1],
            ProviderKind::Anthropic => &PROVIDERS[2],
            ProviderKind::Ollama => &PROVIDERS[3],
        }
    }

    /// Credential key this provider needs, if any.
    pub fn key_name(self) -> Option<&'static str> {
        self.descriptor().key_name
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Returned when parsing an id that names no provider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown provider '{0}' (expected one of: groq, huggingface, claude, ollama)")]
pub struct UnknownProvider(pub String);

impl FromStr for ProviderKind {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProviderKind::PRIORITY
            .into_iter()
            .find(|kind| kind.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownProvider(s.to_string()))
    }
}

/// Static, user-facing description of a provider.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderDescriptor {
    pub id: &'static str,
    pub name: &'static str,
    pub free: bool,
    pub key_name: Option<&'static str>,
    pub signup_url: &'static str,
    pub description: &'static str,
}

/// All providers, in priority order.
pub static PROVIDERS: [ProviderDescriptor; 4] = [
    ProviderDescriptor {
        id: "groq",
        name: "Groq (Llama 3.3 70B) - FREE",
        free: true,
        key_name: Some("GROQ_API_KEY"),
        signup_url: "https://console.groq.com/keys",
        description: "Fast inference with Llama 3.3 70B. Free tier available.",
    },
    ProviderDescriptor {
        id: "huggingface",
        name: "HuggingFace (Mixtral) - FREE",
        free: true,
        key_name: Some("HUGGINGFACE_API_KEY"),
        signup_url: "https://huggingface.co/settings/tokens",
        description: "Mixtral 8x7B model. Free tier with rate limits.",
    },
    ProviderDescriptor {
        id: "claude",
        name: "Claude (Anthropic) - PAID",
        free: false,
        key_name: Some("ANTHROPIC_API_KEY"),
        signup_url: "https://console.anthropic.com/",
        description: "Most capable, but requires paid API key.",
    },
    ProviderDescriptor {
        id: "ollama",
        name: "Ollama (Local) - FREE",
        free: true,
        key_name: None,
        signup_url: "https://ollama.ai/download",
        description: "Run locally. Requires Ollama installed on your machine.",
    },
];

/// A constructed adapter of one of the supported kinds.
pub enum ProviderClient {
    Groq(GroqProvider),
    HuggingFace(HuggingFaceProvider),
    Anthropic(AnthropicProvider),
    Ollama(OllamaProvider),
}

impl ProviderClient {
    pub fn kind(&self) -> ProviderKind {
        match self {
            ProviderClient::Groq(_) => ProviderKind::Groq,
            ProviderClient::HuggingFace(_) => ProviderKind::HuggingFace,
            ProviderClient::Anthropic(_) => ProviderKind::Anthropic,
            ProviderClient::Ollama(_) => ProviderKind::Ollama,
        }
    }

    pub fn model(&self) -> &str {
        match self {
            ProviderClient::Groq(p) => p.model(),
            ProviderClient::HuggingFace(p) => p.model(),
            ProviderClient::Anthropic(p) => p.model(),
            ProviderClient::Ollama(p) => p.model(),
        }
    }
}

/// Question sent by [`ProviderClient::test_connection`].
const CONNECTION_TEST_PROMPT: &str = "Hello";

/// Outcome of a live round-trip to a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionCheck {
    pub success: bool,
    pub message: String,
}

impl ProviderClient {
    /// Send a one-word question with no grounding and report whether the
    /// backend answered. Credentials, endpoint and model are all exercised.
    pub async fn test_connection(&self) -> ConnectionCheck {
        let reply = self
            .get_response(CONNECTION_TEST_PROMPT, "", "connection test", &[])
            .await;
        if reply.success {
            ConnectionCheck {
                success: true,
                message: "API connection successful".into(),
            }
        } else {
            debug!(provider = %self.kind(), error = %reply.message, "Connection test failed");
            ConnectionCheck {
                success: false,
                message: format!("Connection test failed: {}", reply.message),
            }
        }
    }
}

impl fmt::Debug for ProviderClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderClient")
            .field("kind", &self.kind())
            .field("model", &self.model())
            .finish()
    }
}

#[async_trait]
impl Assistant for ProviderClient {
    fn provider_name(&self) -> &str {
        match self {
            ProviderClient::Groq(p) => p.provider_name(),
            ProviderClient::HuggingFace(p) => p.provider_name(),
            ProviderClient::Anthropic(p) => p.provider_name(),
            ProviderClient::Ollama(p) => p.provider_name(),
        }
    }

    async fn get_response(
        &self,
        question: &str,
        kb_content: &str,
        source_name: &str,
        history: &[ChatTurn],
    ) -> AssistantReply {
        match self {
            ProviderClient::Groq(p) => p.get_response(question, kb_content, source_name, history).await,
            ProviderClient::HuggingFace(p) => {
                p.get_response(question, kb_content, source_name, history).await
            }
            ProviderClient::Anthropic(p) => {
                p.get_response(question, kb_content, source_name, history).await
            }
            ProviderClient::Ollama(p) => p.get_response(question, kb_content, source_name, history).await,
        }
    }
}

/// Builds adapters with any configured endpoint/model overrides applied.
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    overrides: HashMap<ProviderKind, ProviderConfig>,
}

impl ProviderRegistry {
    /// Registry with every provider at its default endpoint and model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture `[providers.<id>]` overrides. Ollama falls back to the
    /// top-level `ollama_url` when its section sets no `api_url`.
    pub fn from_config(config: &AppConfig) -> Self {
        let mut overrides = HashMap::new();
        for kind in ProviderKind::PRIORITY {
            let mut entry = config.provider(kind.id()).cloned().unwrap_or_default();
            if kind == ProviderKind::Ollama && entry.api_url.is_none() {
                entry.api_url = Some(config.ollama_url.clone());
            }
            overrides.insert(kind, entry);
        }
        Self { overrides }
    }

    /// Override one provider's endpoint/model.
    pub fn with_override(mut self, kind: ProviderKind, config: ProviderConfig) -> Self {
        self.overrides.insert(kind, config);
        self
    }

    /// All providers, in priority order.
    pub fn list_providers() -> &'static [ProviderDescriptor] {
        &PROVIDERS
    }

    fn api_url(&self, kind: ProviderKind) -> Option<&str> {
        self.overrides.get(&kind).and_then(|c| c.api_url.as_deref())
    }

    fn model(&self, kind: ProviderKind) -> Option<&str> {
        self.overrides.get(&kind).and_then(|c| c.model.as_deref())
    }

    fn ollama(&self) -> OllamaProvider {
        let mut provider = OllamaProvider::new();
        if let Some(url) = self.api_url(ProviderKind::Ollama) {
            provider = provider.with_base_url(url);
        }
        if let Some(model) = self.model(ProviderKind::Ollama) {
            provider = provider.with_model(model);
        }
        provider
    }

    /// Construct an adapter. Hosted kinds return `None` without a non-blank
    /// credential; Ollama ignores it.
    pub fn create(&self, kind: ProviderKind, credential: Option<&str>) -> Option<ProviderClient> {
        let key = || credential.map(str::trim).filter(|k| !k.is_empty());
        let url = self.api_url(kind);
        let model = self.model(kind);

        let client = match kind {
            ProviderKind::Groq => {
                let mut p = GroqProvider::new(key()?);
                if let Some(url) = url {
                    p = p.with_base_url(url);
                }
                if let Some(model) = model {
                    p = p.with_model(model);
                }
                ProviderClient::Groq(p)
            }
            ProviderKind::HuggingFace => {
                let mut p = HuggingFaceProvider::new(key()?);
                if let Some(url) = url {
                    p = p.with_base_url(url);
                }
                if let Some(model) = model {
                    p = p.with_model(model);
                }
                ProviderClient::HuggingFace(p)
            }
            ProviderKind::Anthropic => {
                let mut p = AnthropicProvider::new(key()?);
                if let Some(url) = url {
                    p = p.with_base_url(url);
                }
                if let Some(model) = model {
                    p = p.with_model(model);
                }
                ProviderClient::Anthropic(p)
            }
            ProviderKind::Ollama => ProviderClient::Ollama(self.ollama()),
        };
        Some(client)
    }

    /// Construct an adapter, resolving its credential from `credentials`.
    pub fn create_with(
        &self,
        kind: ProviderKind,
        credentials: &dyn CredentialLookup,
    ) -> Option<ProviderClient> {
        let key = kind.key_name().and_then(|name| credentials.credential(name));
        self.create(kind, key.as_deref())
    }

    /// Hosted: credential present. Ollama: probe answers within 2s.
    pub async fn is_available(&self, kind: ProviderKind, credentials: &dyn CredentialLookup) -> bool {
        match kind.key_name() {
            Some(name) => credentials.has_credential(name),
            None => self.ollama().probe().await,
        }
    }

    /// First usable provider in priority order, or `None` when nothing is
    /// configured.
    pub async fn select_first_available(
        &self,
        credentials: &dyn CredentialLookup,
    ) -> Option<ProviderClient> {
        for kind in ProviderKind::PRIORITY {
            if self.is_available(kind, credentials).await {
                let client = self.create_with(kind, credentials);
                if let Some(client) = &client {
                    info!(provider = %kind, name = client.provider_name(), "Selected provider");
                }
                return client;
            }
            debug!(provider = %kind, "Provider not available");
        }
        None
    }

    /// Use `preferred` if given (without probing), else automatic selection.
    pub async fn select(
        &self,
        preferred: Option<ProviderKind>,
        credentials: &dyn CredentialLookup,
    ) -> Option<ProviderClient> {
        match preferred {
            Some(kind) => {
                let client = self.create_with(kind, credentials);
                if client.is_none() {
                    debug!(provider = %kind, "Preferred provider has no credential");
                }
                client
            }
            None => self.select_first_available(credentials).await,
        }
    }
}
