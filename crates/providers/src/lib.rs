//! LLM provider adapters for SiemGuide.
//!
//! Every adapter implements `siemguide_core::Assistant` and turns any failure
//! into a uniform reply. The registry decides which adapter is usable.

pub mod anthropic;
pub mod groq;
pub mod huggingface;
pub mod ollama;
pub mod registry;
mod transport;

pub use anthropic::AnthropicProvider;
pub use groq::GroqProvider;
pub use huggingface::HuggingFaceProvider;
pub use ollama::OllamaProvider;
pub use registry::{
    ConnectionCheck, PROVIDERS, ProviderClient, ProviderDescriptor, ProviderKind, ProviderRegistry,
    UnknownProvider,
};
