//! `siemguide sources`: List supported log sources.

use siemguide_kb::KnowledgeBase;
use std::path::PathBuf;

pub async fn run(kb_override: Option<PathBuf>, json: bool) -> super::CmdResult {
    let config = super::load_config(kb_override)?;
    let kb = super::knowledge_base(&config);

    if json {
        println!("{}", catalog_json(&kb)?);
        return Ok(());
    }

    println!("📚 Supported Log Sources");
    println!("========================");
    println!();
    println!("  {:<16} {:<32} {:<20} {:<20} KB", "ID", "Name", "Category", "Vendor");
    for source in kb.list_sources() {
        let status = if kb.document_exists(source.id) { "✅" } else { "—" };
        println!(
            "  {:<16} {:<32} {:<20} {:<20} {status}",
            source.id, source.display_name, source.category, source.vendor
        );
    }
    println!();
    println!("  Knowledge base: {}", kb.root().display());

    Ok(())
}

/// Catalog entries plus whether each one has a grounding document.
fn catalog_json(kb: &KnowledgeBase) -> serde_json::Result<String> {
    let rows = kb
        .list_sources()
        .iter()
        .map(|source| {
            let mut row = serde_json::to_value(source)?;
            row["has_document"] = kb.document_exists(source.id).into();
            Ok(row)
        })
        .collect::<serde_json::Result<Vec<_>>>()?;
    serde_json::to_string_pretty(&rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_lists_whole_catalog() {
        let kb = KnowledgeBase::new("/nonexistent/siemguide-kb");
        let rows: Vec<serde_json::Value> =
            serde_json::from_str(&catalog_json(&kb).unwrap()).unwrap();

        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0]["id"], "palo_alto");
        assert_eq!(rows[0]["display_name"], "Palo Alto Firewall");
        assert_eq!(rows[0]["vendor"], "Palo Alto Networks");
        assert!(rows.iter().all(|row| row["has_document"] == false));
    }
}
