//! `siemguide show`: Print a source's grounding document.

use std::path::PathBuf;

pub async fn run(kb_override: Option<PathBuf>, source_id: &str, sections: bool) -> super::CmdResult {
    let config = super::load_config(kb_override)?;
    let kb = super::knowledge_base(&config);
    let source = super::require_source(&kb, source_id)?;

    if sections {
        let headings = kb.sections(source.id);
        if headings.is_empty() {
            println!("  No sections found for {}.", source.display_name);
        }
        for heading in headings {
            println!("  • {heading}");
        }
        return Ok(());
    }

    let load = kb.load_document(source.id);
    if !load.success {
        return Err(load.message.into());
    }
    println!("{}", load.content);

    Ok(())
}
