//! `siemguide doctor`: Diagnose configuration and knowledge base.

use siemguide_config::AppConfig;
use siemguide_providers::{ProviderKind, ProviderRegistry};
use std::path::PathBuf;

pub async fn run(kb_override: Option<PathBuf>, live: bool) -> super::CmdResult {
    println!("🩺 SiemGuide Doctor — System Diagnostics");
    println!("========================================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_dir().join("config.toml");
    if !config_path.exists() {
        println!("  ⚠️  No config file — using defaults (run `siemguide init`)");
    }
    let config = match super::load_config(kb_override) {
        Ok(config) => {
            println!("  ✅ Configuration valid");
            config
        }
        Err(e) => {
            println!("  ❌ {e}");
            println!("\n  ⚠️  Fix the config file before continuing.");
            return Ok(());
        }
    };

    // Knowledge base
    let kb = super::knowledge_base(&config);
    if kb.root().is_dir() {
        println!("  ✅ Knowledge base directory: {}", kb.root().display());
        let missing: Vec<&str> = kb
            .list_sources()
            .iter()
            .filter(|s| !kb.document_exists(s.id))
            .map(|s| s.id)
            .collect();
        if missing.is_empty() {
            println!("  ✅ Grounding documents present for all sources");
        } else {
            println!("  ⚠️  Missing grounding documents: {}", missing.join(", "));
            issues += 1;
        }
        if kb.references_path().is_file() {
            println!("  ✅ references.json found");
        } else {
            println!("  ⚠️  No references.json");
            issues += 1;
        }
    } else {
        println!("  ❌ Knowledge base directory not found: {}", kb.root().display());
        issues += 1;
    }

    // Providers
    let registry = ProviderRegistry::from_config(&config);
    let credentials = config.credentials();
    let mut usable = Vec::new();
    for kind in ProviderKind::PRIORITY {
        if registry.is_available(kind, &credentials).await {
            usable.push(kind);
        }
    }
    if usable.is_empty() {
        println!("  ❌ No AI provider available — run `siemguide providers` for setup");
        issues += 1;
    } else {
        let ids: Vec<&str> = usable.iter().map(|kind| kind.id()).collect();
        println!("  ✅ Providers available: {}", ids.join(", "));
    }

    if live {
        for &kind in &usable {
            let Some(client) = registry.create_with(kind, &credentials) else {
                continue;
            };
            let check = client.test_connection().await;
            if check.success {
                println!("  ✅ {kind}: {}", check.message);
            } else {
                println!("  ❌ {kind}: {}", check.message);
                issues += 1;
            }
        }
    }

    if let Some(preferred) = &config.default_provider {
        if !usable.iter().any(|kind| kind.id() == preferred.as_str()) {
            println!("  ⚠️  default_provider '{preferred}' is not available");
            issues += 1;
        }
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
