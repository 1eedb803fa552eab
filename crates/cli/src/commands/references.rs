//! `siemguide references`: Print a source's reference links.

use siemguide_kb::ReferenceLink;
use std::path::PathBuf;

pub async fn run(kb_override: Option<PathBuf>, source_id: &str, json: bool) -> super::CmdResult {
    let config = super::load_config(kb_override)?;
    let kb = super::knowledge_base(&config);
    let source = super::require_source(&kb, source_id)?;

    let lookup = kb.get_references(source.id);
    if json {
        println!("{}", serde_json::to_string_pretty(&lookup)?);
        return Ok(());
    }

    if !lookup.success {
        println!("  {}", lookup.message);
        return Ok(());
    }
    let refs = lookup.data;

    println!("🔗 References — {}", source.display_name);
    print_group("Official documentation", &refs.official_docs);
    print_group("Videos", &refs.youtube);
    print_group("Community blogs", &refs.blogs_optional);

    Ok(())
}

fn print_group(title: &str, links: &[ReferenceLink]) {
    if links.is_empty() {
        return;
    }
    println!();
    println!("  {title}:");
    for link in links {
        println!("    • {} — {}", link.title, link.url);
    }
}
