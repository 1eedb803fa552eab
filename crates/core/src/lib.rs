//! # SiemGuide Core
//!
//! Domain types, traits, and error definitions for the SiemGuide onboarding
//! assistant. This crate has **no HTTP or filesystem dependencies**: it
//! defines the model every other crate implements against.
//!
//! ## Design Philosophy
//!
//! Each seam is a trait here; implementations live in their own crates:
//! - [`Assistant`] is implemented by every LLM backend in `siemguide-providers`
//! - [`CredentialLookup`] is implemented by the config layer and by plain maps
//!
//! The prompt builder lives here too so every backend renders the exact same
//! grounding prompt.

pub mod credentials;
pub mod error;
pub mod message;
pub mod prompt;
pub mod provider;

// Re-export key types at crate root for ergonomics
pub use credentials::{CredentialLookup, NoCredentials};
pub use error::{ProviderError, Result};
pub use message::{ChatTurn, Conversation, Role};
pub use provider::{Assistant, AssistantReply};
