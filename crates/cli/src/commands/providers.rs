//! `siemguide providers`: List AI providers and which are usable.

use siemguide_providers::{ProviderKind, ProviderRegistry};

pub async fn run(json: bool) -> super::CmdResult {
    let config = super::load_config(None)?;
    let registry = ProviderRegistry::from_config(&config);
    let credentials = config.credentials();

    let mut statuses = Vec::new();
    for kind in ProviderKind::PRIORITY {
        let available = registry.is_available(kind, &credentials).await;
        let is_default = config.default_provider.as_deref() == Some(kind.id());
        statuses.push((kind, available, is_default));
    }

    if json {
        println!("{}", providers_json(&statuses)?);
        return Ok(());
    }

    println!("🤖 AI Providers (automatic selection order)");
    println!("===========================================");
    println!();

    for (kind, available, is_default) in statuses {
        let info = kind.descriptor();
        let mark = if available { "✅" } else { "  " };
        let default = if is_default { "  (default)" } else { "" };

        println!("  {mark} {:<12} {}{default}", info.id, info.name);
        println!("       {}", info.description);
        match info.key_name {
            Some(key) => println!("       Key: {key}  —  {}", info.signup_url),
            None => println!("       No key needed  —  {}", info.signup_url),
        }
        println!();
    }

    println!("  Keys are read from the environment first, then [credentials] in");
    println!("  {}", siemguide_config::AppConfig::config_dir().join("config.toml").display());

    Ok(())
}

/// `(kind, available, is_default)` rows rendered as descriptor objects.
fn providers_json(statuses: &[(ProviderKind, bool, bool)]) -> serde_json::Result<String> {
    let rows = statuses
        .iter()
        .map(|&(kind, available, is_default)| {
            let mut row = serde_json::to_value(kind.descriptor())?;
            row["available"] = available.into();
            row["default"] = is_default.into();
            Ok(row)
        })
        .collect::<serde_json::Result<Vec<_>>>()?;
    serde_json::to_string_pretty(&rows)
}
