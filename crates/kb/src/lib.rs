//! Knowledge base for SiemGuide: which log sources exist and what we know
//! about onboarding them.
//!
//! Layout of a knowledge base directory:
//!
//! ```text
//! kb/
//! ├── palo_alto.md        grounding document, one per source id
//! ├── windows_events.md
//! └── references.json     { "<source id>": { "official_docs": [...], "youtube": [...] } }
//! ```
//!
//! Every lookup is read-only and uncached. A missing document or reference
//! entry is a normal state reported through [`DocumentLoad`] /
//! [`ReferenceLookup`], never a panic or a hard error.

pub mod catalog;
pub mod store;

pub use catalog::{CATALOG, SourceDescriptor};
pub use store::{
    DocumentLoad, KbError, KnowledgeBase, ReferenceLink, ReferenceLookup, SourceReferences,
};
