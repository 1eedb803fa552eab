//! `siemguide chat`: Interactive session about one log source.

use siemguide_core::message::Conversation;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

pub async fn run(
    kb_override: Option<PathBuf>,
    source_id: &str,
    provider: Option<&str>,
) -> super::CmdResult {
    let config = super::load_config(kb_override)?;
    let (advisor, source) = super::build_advisor(&config, source_id, provider).await?;
    let mut conversation = Conversation::for_source(source.id);

    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║        SiemGuide — Log Source Onboarding      ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Source:    {} ({})", source.display_name, source.vendor);
    println!("  Provider:  {}", advisor.provider_name());
    if !advisor.knowledge_base().document_exists(source.id) {
        println!("  ⚠️  No KB document for this source; answers will be general.");
    }
    println!();
    println!("  Ask a question and press Enter.");
    println!("  '/clear' resets the conversation, 'exit' or Ctrl+C quits.");
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    prompt()?;
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        match input {
            "" => {}
            "exit" | "quit" => break,
            "/clear" => {
                conversation.clear();
                println!("  History cleared.");
                println!();
            }
            question => {
                eprint!("  ...");
                let reply = advisor.ask(&mut conversation, question).await;
                eprint!("\r     \r");
                println!();
                if reply.success {
                    for line in reply.response.lines() {
                        println!("  Assistant > {line}");
                    }
                } else {
                    eprintln!("  [Error] {}", reply.message);
                }
                println!();
            }
        }
        prompt()?;
    }

    println!();
    println!("  Goodbye! 👋");
    println!();

    Ok(())
}

fn prompt() -> std::io::Result<()> {
    print!("  You > ");
    std::io::stdout().flush()
}
