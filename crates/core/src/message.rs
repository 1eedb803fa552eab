//! Chat turn and Conversation domain types.
//!
//! A [`Conversation`] is owned by the caller (CLI, UI, tests) and threaded
//! explicitly into every request. The core never stores one.

use serde::{Deserialize, Serialize};

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The security engineer asking questions
    User,
    /// The model's answer
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A single turn in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    /// Create a user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant turn.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Caller-owned chat context: which source is being discussed and what has
/// been said so far.
///
/// Holding it by `&mut` for the duration of a request is what keeps a single
/// question in flight per conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    /// Identifier of the selected log source, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,

    /// Completed turns, oldest first
    #[serde(default)]
    pub turns: Vec<ChatTurn>,
}

impl Conversation {
    /// Create a new empty conversation with no source selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a conversation already scoped to a source.
    pub fn for_source(source_id: impl Into<String>) -> Self {
        let mut conv = Self::new();
        conv.source_id = Some(source_id.into());
        conv
    }

    /// Select a source. Switching to a different source clears the history,
    /// since earlier answers were grounded in another document.
    ///
    /// Returns `true` when the history was reset.
    pub fn select_source(&mut self, source_id: &str) -> bool {
        if self.source_id.as_deref() == Some(source_id) {
            return false;
        }
        self.source_id = Some(source_id.to_string());
        let had_turns = !self.turns.is_empty();
        self.clear();
        had_turns
    }

    /// Drop every turn.
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Append a turn.
    pub fn push(&mut self, turn: ChatTurn) {
        self.turns.push(turn);
    }

    /// Completed history, to be passed to an adapter as context.
    pub fn history(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
