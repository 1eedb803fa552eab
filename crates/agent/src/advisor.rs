//! Answering one question against the selected source's grounding document.

use siemguide_core::message::{ChatTurn, Conversation};
use siemguide_core::{Assistant, AssistantReply};
use siemguide_kb::KnowledgeBase;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Grounding text used when a source has no document on disk.
pub const NO_KB_CONTENT: &str = "No KB content available for this source.";

const EMPTY_QUESTION: &str = "Please enter a question.";
const NO_SOURCE: &str = "Please select a log source first.";

/// Routes questions to an assistant, grounded in the knowledge base.
pub struct Advisor {
    kb: KnowledgeBase,
    assistant: Arc<dyn Assistant>,
}

impl Advisor {
    pub fn new(kb: KnowledgeBase, assistant: Arc<dyn Assistant>) -> Self {
        Self { kb, assistant }
    }

    pub fn provider_name(&self) -> &str {
        self.assistant.provider_name()
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.kb
    }

    /// Ask `question` within `conversation`.
    ///
    /// The assistant sees the turns recorded so far, never the question
    /// being asked. Only a successful exchange is appended; a failed call
    /// leaves the conversation exactly as it was.
    pub async fn ask(&self, conversation: &mut Conversation, question: &str) -> AssistantReply {
        let question = question.trim();
        if question.is_empty() {
            return AssistantReply::failure(EMPTY_QUESTION);
        }

        let Some(source_id) = conversation.source_id.as_deref() else {
            return AssistantReply::failure(NO_SOURCE);
        };
        let Some(source) = self.kb.source(source_id) else {
            return AssistantReply::failure(format!("Unknown log source: {source_id}"));
        };

        let load = self.kb.load_document(source.id);
        let kb_content = if load.success {
            load.content
        } else {
            warn!(source = source.id, reason = %load.message, "Answering without grounding document");
            NO_KB_CONTENT.to_string()
        };

        debug!(
            source = source.id,
            provider = self.assistant.provider_name(),
            history = conversation.len(),
            "Asking assistant"
        );

        let reply = self
            .assistant
            .get_response(question, &kb_content, source.display_name, conversation.history())
            .await;

        if reply.success {
            conversation.push(ChatTurn::user(question));
            conversation.push(ChatTurn::assistant(reply.response.clone()));
            info!(source = source.id, turns = conversation.len(), "Answer recorded");
        } else {
            warn!(source = source.id, message = %reply.message, "Assistant call failed");
        }

        reply
    }
}
