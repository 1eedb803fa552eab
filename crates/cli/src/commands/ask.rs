//! `siemguide ask`: One question, one grounded answer.

use siemguide_core::message::Conversation;
use std::path::PathBuf;

pub async fn run(
    kb_override: Option<PathBuf>,
    source_id: &str,
    question: &str,
    provider: Option<&str>,
) -> super::CmdResult {
    let config = super::load_config(kb_override)?;
    let (advisor, source) = super::build_advisor(&config, source_id, provider).await?;

    let mut conversation = Conversation::for_source(source.id);

    eprint!("  Thinking ({})...", advisor.provider_name());
    let reply = advisor.ask(&mut conversation, question).await;
    eprint!("\r{:60}\r", "");

    if !reply.success {
        return Err(reply.message.into());
    }
    println!("{}", reply.response);

    Ok(())
}
