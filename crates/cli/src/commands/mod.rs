pub mod ask;
pub mod chat;
pub mod doctor;
pub mod init;
pub mod providers;
pub mod references;
pub mod show;
pub mod sources;

use siemguide_agent::Advisor;
use siemguide_config::AppConfig;
use siemguide_core::Assistant;
use siemguide_kb::{KnowledgeBase, SourceDescriptor};
use siemguide_providers::{ProviderKind, ProviderRegistry};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

pub(crate) type CmdResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

fn load_config(kb_override: Option<PathBuf>) -> CmdResult<AppConfig> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    if let Some(path) = kb_override {
        config.kb_path = path;
    }
    Ok(config)
}

fn knowledge_base(config: &AppConfig) -> KnowledgeBase {
    KnowledgeBase::new(&config.kb_path)
}

fn require_source(kb: &KnowledgeBase, id: &str) -> CmdResult<&'static SourceDescriptor> {
    kb.source(id).ok_or_else(|| {
        let known: Vec<&str> = kb.list_sources().iter().map(|s| s.id).collect();
        format!("Unknown log source '{id}'. Known sources: {}", known.join(", ")).into()
    })
}

/// `--provider` wins over `default_provider` in config; neither means
/// automatic selection.
fn preferred_provider(config: &AppConfig, flag: Option<&str>) -> CmdResult<Option<ProviderKind>> {
    match flag.or(config.default_provider.as_deref()) {
        Some(id) => Ok(Some(id.parse::<ProviderKind>()?)),
        None => Ok(None),
    }
}

/// Everything needed to answer questions about one source.
async fn build_advisor(
    config: &AppConfig,
    source_id: &str,
    provider: Option<&str>,
) -> CmdResult<(Advisor, &'static SourceDescriptor)> {
    let kb = knowledge_base(config);
    let source = require_source(&kb, source_id)?;

    let preferred = preferred_provider(config, provider)?;
    let registry = ProviderRegistry::from_config(config);
    let credentials = config.credentials();

    let Some(client) = registry.select(preferred, &credentials).await else {
        print_setup_help(preferred);
        return Err("No AI provider available. See above for setup instructions.".into());
    };

    debug!(source = source.id, provider = %client.kind(), model = client.model(), "Advisor ready");
    let assistant: Arc<dyn Assistant> = Arc::new(client);
    Ok((Advisor::new(kb, assistant), source))
}

fn print_setup_help(preferred: Option<ProviderKind>) {
    eprintln!();
    match preferred {
        Some(kind) => {
            let info = kind.descriptor();
            eprintln!("  ERROR: {} is not configured.", info.name);
            if let Some(key) = info.key_name {
                eprintln!("  Set {key} in your environment or config file.");
            }
            eprintln!("  Get started at: {}", info.signup_url);
        }
        None => {
            eprintln!("  ERROR: No AI provider available!");
            eprintln!();
            eprintln!("  Set one of these (free options first):");
            for info in ProviderRegistry::list_providers() {
                match info.key_name {
                    Some(key) => eprintln!("    {key:<22} {}  ({})", info.name, info.signup_url),
                    None => eprintln!("    {:<22} {}  ({})", "(run Ollama)", info.name, info.signup_url),
                }
            }
        }
    }
    eprintln!();
    eprintln!("  Config file: {}", AppConfig::config_dir().join("config.toml").display());
    eprintln!();
}
