//! Filesystem-backed knowledge base: grounding documents and reference links.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::catalog::{self, CATALOG, SourceDescriptor};

const REFERENCES_FILE: &str = "references.json";

/// Knowledge base lookup failures.
#[derive(Debug, thiserror::Error)]
pub enum KbError {
    #[error("Knowledge base file not found: {}", .0.display())]
    DocumentNotFound(PathBuf),

    #[error("References file not found: {}", .0.display())]
    ReferencesNotFound(PathBuf),

    #[error("No references found for source: {0}")]
    NoReferences(String),

    #[error("Invalid source identifier: {0:?}")]
    InvalidId(String),

    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("Error parsing references JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Outcome of loading a grounding document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentLoad {
    pub success: bool,
    /// Document text (empty on failure)
    pub content: String,
    pub message: String,
}

impl From<Result<String, KbError>> for DocumentLoad {
    fn from(result: Result<String, KbError>) -> Self {
        match result {
            Ok(content) => Self {
                success: true,
                content,
                message: "KB content loaded successfully".into(),
            },
            Err(e) => Self {
                success: false,
                content: String::new(),
                message: e.to_string(),
            },
        }
    }
}

/// A titled link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceLink {
    pub title: String,
    pub url: String,
}

/// Categorized links for one source, as stored in `references.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceReferences {
    #[serde(default)]
    pub official_docs: Vec<ReferenceLink>,

    #[serde(default)]
    pub youtube: Vec<ReferenceLink>,

    /// Community blogs; optional in the index
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blogs_optional: Vec<ReferenceLink>,
}

impl SourceReferences {
    pub fn is_empty(&self) -> bool {
        self.official_docs.is_empty() && self.youtube.is_empty() && self.blogs_optional.is_empty()
    }
}

/// Outcome of a reference lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceLookup {
    pub success: bool,
    /// Links (empty on failure)
    pub data: SourceReferences,
    pub message: String,
}

impl From<Result<SourceReferences, KbError>> for ReferenceLookup {
    fn from(result: Result<SourceReferences, KbError>) -> Self {
        match result {
            Ok(data) => Self {
                success: true,
                data,
                message: "References loaded successfully".into(),
            },
            Err(e) => Self {
                success: false,
                data: SourceReferences::default(),
                message: e.to_string(),
            },
        }
    }
}

/// Read-only view over a knowledge base directory.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    root: PathBuf,
}

impl KnowledgeBase {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All supported sources, in stable catalog order.
    pub fn list_sources(&self) -> &'static [SourceDescriptor] {
        CATALOG
    }

    /// Catalog entry for `id`.
    pub fn source(&self, id: &str) -> Option<&'static SourceDescriptor> {
        catalog::find(id)
    }

    pub fn source_exists(&self, id: &str) -> bool {
        self.source(id).is_some()
    }

    /// Path of the grounding document for `id`.
    pub fn document_path(&self, id: &str) -> PathBuf {
        self.root.join(format!("{id}.md"))
    }

    pub fn references_path(&self) -> PathBuf {
        self.root.join(REFERENCES_FILE)
    }

    /// Whether a grounding document exists for `id`.
    pub fn document_exists(&self, id: &str) -> bool {
        validate_id(id).is_ok() && self.document_path(id).is_file()
    }

    /// Load the grounding document for `id`.
    pub fn load_document(&self, id: &str) -> DocumentLoad {
        self.read_document(id).into()
    }

    /// Typed variant of [`load_document`](Self::load_document).
    pub fn read_document(&self, id: &str) -> Result<String, KbError> {
        validate_id(id)?;
        let path = self.document_path(id);
        if !path.is_file() {
            debug!(source = id, path = %path.display(), "Grounding document missing");
            return Err(KbError::DocumentNotFound(path));
        }
        std::fs::read_to_string(&path).map_err(|source| KbError::Io {
            context: "Error loading KB content",
            source,
        })
    }

    /// Reference links for `id`.
    pub fn get_references(&self, id: &str) -> ReferenceLookup {
        self.read_references(id).into()
    }

    /// Typed variant of [`get_references`](Self::get_references).
    ///
    /// A malformed entry for one source does not affect the others.
    pub fn read_references(&self, id: &str) -> Result<SourceReferences, KbError> {
        let path = self.references_path();
        if !path.is_file() {
            return Err(KbError::ReferencesNotFound(path));
        }
        let raw = std::fs::read_to_string(&path).map_err(|source| KbError::Io {
            context: "Error loading references",
            source,
        })?;

        let mut index: HashMap<String, serde_json::Value> =
            serde_json::from_str(&raw).inspect_err(|e| {
                warn!(path = %path.display(), error = %e, "Reference index is malformed");
            })?;

        let entry = index
            .remove(id)
            .ok_or_else(|| KbError::NoReferences(id.to_string()))?;
        Ok(serde_json::from_value(entry)?)
    }

    /// `##` and `###` headings of a source's document, in order.
    ///
    /// Empty when the document cannot be loaded.
    pub fn sections(&self, id: &str) -> Vec<String> {
        let Ok(content) = self.read_document(id) else {
            return Vec::new();
        };
        content
            .lines()
            .filter_map(|line| {
                line.strip_prefix("## ")
                    .or_else(|| line.strip_prefix("### "))
                    .map(|heading| heading.trim().to_string())
            })
            .collect()
    }
}

/// Source ids become file names; refuse anything that could leave the root.
fn validate_id(id: &str) -> Result<(), KbError> {
    let ok = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if ok {
        Ok(())
    } else {
        Err(KbError::InvalidId(id.to_string()))
    }
}
