//! Multi-turn advisor sessions against a scripted assistant.

use std::sync::{Arc, Mutex};

use siemguide_agent::{Advisor, NO_KB_CONTENT};
use siemguide_core::message::{ChatTurn, Conversation};
use siemguide_core::{Assistant, AssistantReply};
use siemguide_kb::KnowledgeBase;

// ── Mock Assistant ────────────────────────────────────────────────────────

/// Replays scripted replies in order and records what it was asked.
struct ScriptedAssistant {
    replies: Mutex<Vec<AssistantReply>>,
    seen: Mutex<Vec<(String, String, Vec<ChatTurn>)>>,
}

impl ScriptedAssistant {
    fn new(replies: Vec<AssistantReply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().rev().collect()),
            seen: Mutex::new(Vec::new()),
        })
    }

    /// (question, grounding, history) per call.
    fn seen(&self) -> Vec<(String, String, Vec<ChatTurn>)> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Assistant for ScriptedAssistant {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    async fn get_response(
        &self,
        question: &str,
        kb_content: &str,
        _source_name: &str,
        history: &[ChatTurn],
    ) -> AssistantReply {
        self.seen
            .lock()
            .unwrap()
            .push((question.into(), kb_content.into(), history.to_vec()));
        self.replies
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| AssistantReply::failure("script exhausted"))
    }
}

fn knowledge_base() -> (tempfile::TempDir, KnowledgeBase) {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("linux.md"),
        "# Linux\n\n## rsyslog\nForward with *.* @@splunk:514\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("cisco_asa.md"),
        "# Cisco ASA\n\n## Logging\nlogging host inside 10.0.0.5\n",
    )
    .unwrap();
    let kb = KnowledgeBase::new(dir.path());
    (dir, kb)
}

#[tokio::test]
async fn history_grows_and_never_contains_the_pending_question() {
    let (_dir, kb) = knowledge_base();
    let assistant = ScriptedAssistant::new(vec![
        AssistantReply::answer("Use rsyslog."),
        AssistantReply::answer("Port 514."),
        AssistantReply::answer("Yes, use TLS on 6514."),
    ]);
    let advisor = Advisor::new(kb, assistant.clone());
    let mut conv = Conversation::for_source("linux");

    for q in ["Which daemon?", "Which port?", "Can I encrypt it?"] {
        assert!(advisor.ask(&mut conv, q).await.success);
    }

    let seen = assistant.seen();
    assert_eq!(seen.len(), 3);
    for (i, (question, grounding, history)) in seen.iter().enumerate() {
        assert_eq!(history.len(), i * 2);
        assert!(history.iter().all(|turn| &turn.content != question));
        assert!(grounding.contains("rsyslog"));
    }
    assert_eq!(
        seen[2].2,
        vec![
            ChatTurn::user("Which daemon?"),
            ChatTurn::assistant("Use rsyslog."),
            ChatTurn::user("Which port?"),
            ChatTurn::assistant("Port 514."),
        ]
    );
    assert_eq!(conv.len(), 6);
}

#[tokio::test]
async fn failed_turn_can_be_retried_cleanly() {
    let (_dir, kb) = knowledge_base();
    let assistant = ScriptedAssistant::new(vec![
        AssistantReply::failure("Request timed out. Please try again."),
        AssistantReply::answer("Use the ASA add-on."),
    ]);
    let advisor = Advisor::new(kb, assistant.clone());
    let mut conv = Conversation::for_source("cisco_asa");

    let first = advisor.ask(&mut conv, "Which add-on?").await;
    assert_eq!(first.message, "Request timed out. Please try again.");
    assert!(conv.is_empty());

    let retry = advisor.ask(&mut conv, "Which add-on?").await;
    assert!(retry.success);

    let seen = assistant.seen();
    assert!(seen[1].2.is_empty(), "retry must not see the failed attempt");
    assert_eq!(conv.len(), 2);
}

#[tokio::test]
async fn switching_sources_resets_context_and_grounding() {
    let (_dir, kb) = knowledge_base();
    let assistant = ScriptedAssistant::new(vec![
        AssistantReply::answer("linux answer"),
        AssistantReply::answer("asa answer"),
        AssistantReply::answer("generic answer"),
    ]);
    let advisor = Advisor::new(kb, assistant.clone());
    let mut conv = Conversation::for_source("linux");

    advisor.ask(&mut conv, "q1").await;

    assert!(!conv.select_source("linux"), "reselecting keeps history");
    assert_eq!(conv.len(), 2);

    assert!(conv.select_source("cisco_asa"));
    advisor.ask(&mut conv, "q2").await;

    conv.select_source("crowdstrike_edr");
    advisor.ask(&mut conv, "q3").await;

    let seen = assistant.seen();
    assert!(seen[1].2.is_empty());
    assert!(seen[1].1.contains("logging host"));
    assert!(seen[2].2.is_empty());
    assert_eq!(seen[2].1, NO_KB_CONTENT);
}

#[tokio::test]
async fn clear_starts_over_on_same_source() {
    let (_dir, kb) = knowledge_base();
    let assistant = ScriptedAssistant::new(vec![
        AssistantReply::answer("a"),
        AssistantReply::answer("b"),
    ]);
    let advisor = Advisor::new(kb, assistant.clone());
    let mut conv = Conversation::for_source("linux");

    advisor.ask(&mut conv, "first").await;
    conv.clear();
    advisor.ask(&mut conv, "second").await;

    assert!(assistant.seen()[1].2.is_empty());
    assert_eq!(conv.source_id.as_deref(), Some("linux"));
    assert_eq!(conv.len(), 2);
}
