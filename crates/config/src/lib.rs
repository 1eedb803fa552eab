//! Configuration loading, validation, and credential lookup for SiemGuide.
//!
//! Loads configuration from `~/.siemguide/config.toml` with environment
//! variable overrides. Validates settings at startup.

use serde::{Deserialize, Serialize};
use siemguide_core::CredentialLookup;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Provider ids accepted in `default_provider` and `[providers.<id>]`.
pub const KNOWN_PROVIDER_IDS: &[&str] = &["groq", "huggingface", "claude", "ollama"];

/// Default address of a local Ollama daemon.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// The root configuration structure.
///
/// Maps directly to `~/.siemguide/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory holding `<source>.md` documents and `references.json`
    #[serde(default = "default_kb_path")]
    pub kb_path: PathBuf,

    /// Provider to use instead of automatic selection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_provider: Option<String>,

    /// Base URL of the local Ollama daemon
    #[serde(default = "default_ollama_url")]
    pub ollama_url: String,

    /// Per-provider endpoint and model overrides
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    /// API keys by key name (e.g. `GROQ_API_KEY`). Environment wins.
    #[serde(default)]
    pub credentials: HashMap<String, String>,
}

fn default_kb_path() -> PathBuf {
    PathBuf::from("kb")
}
fn default_ollama_url() -> String {
    DEFAULT_OLLAMA_URL.into()
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let credentials: Vec<(&String, &str)> = self
            .credentials
            .keys()
            .map(|k| (k, "[REDACTED]"))
            .collect();
        f.debug_struct("AppConfig")
            .field("kb_path", &self.kb_path)
            .field("default_provider", &self.default_provider)
            .field("ollama_url", &self.ollama_url)
            .field("providers", &self.providers)
            .field("credentials", &credentials)
            .finish()
    }
}

/// Endpoint/model override for one provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl AppConfig {
    /// Load configuration from the default path (~/.siemguide/config.toml).
    ///
    /// Environment overrides:
    /// - `SIEMGUIDE_KB_PATH`
    /// - `SIEMGUIDE_PROVIDER`
    /// - `OLLAMA_BASE_URL` (beats both `ollama_url` and `[providers.ollama].api_url`)
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides resolved through `var`.
    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(path) = var("SIEMGUIDE_KB_PATH") {
            self.kb_path = PathBuf::from(path);
        }
        if let Some(provider) = var("SIEMGUIDE_PROVIDER") {
            self.default_provider = Some(provider);
        }
        if let Some(url) = var("OLLAMA_BASE_URL") {
            if let Some(section) = self.providers.get_mut("ollama") {
                section.api_url = Some(url.clone());
            }
            self.ollama_url = url;
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".siemguide")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(provider) = &self.default_provider {
            if !KNOWN_PROVIDER_IDS.contains(&provider.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "unknown default_provider '{provider}' (expected one of: {})",
                    KNOWN_PROVIDER_IDS.join(", ")
                )));
            }
        }

        check_url("ollama_url", &self.ollama_url)?;

        for (name, provider) in &self.providers {
            if !KNOWN_PROVIDER_IDS.contains(&name.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "unknown provider section [providers.{name}]"
                )));
            }
            if let Some(url) = &provider.api_url {
                check_url(&format!("providers.{name}.api_url"), url)?;
            }
        }

        Ok(())
    }

    /// Override block for a provider id, if configured.
    pub fn provider(&self, id: &str) -> Option<&ProviderConfig> {
        self.providers.get(id)
    }

    /// Credential store backed by the environment and this config's
    /// `[credentials]` table.
    pub fn credentials(&self) -> ConfigCredentials {
        ConfigCredentials {
            table: self.credentials.clone(),
            read_env: true,
        }
    }

    /// Generate a starter config TOML string (for the `init` command).
    pub fn default_toml() -> String {
        let mut config = Self::default();
        config
            .credentials
            .insert("GROQ_API_KEY".into(), String::new());
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            kb_path: default_kb_path(),
            default_provider: None,
            ollama_url: default_ollama_url(),
            providers: HashMap::new(),
            credentials: HashMap::new(),
        }
    }
}

fn check_url(field: &str, url: &str) -> Result<(), ConfigError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(format!(
            "{field} must be an http(s) URL, got '{url}'"
        )))
    }
}

/// Credential lookup: environment variable first, then the config table.
#[derive(Clone)]
pub struct ConfigCredentials {
    table: HashMap<String, String>,
    read_env: bool,
}

impl ConfigCredentials {
    /// A store that only consults `table` (no environment).
    pub fn from_table(table: HashMap<String, String>) -> Self {
        Self {
            table,
            read_env: false,
        }
    }
}

impl std::fmt::Debug for ConfigCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigCredentials")
            .field("keys", &self.table.keys().collect::<Vec<_>>())
            .field("read_env", &self.read_env)
            .finish()
    }
}

impl CredentialLookup for ConfigCredentials {
    fn lookup_credential(&self, name: &str) -> Option<String> {
        let from_env = if self.read_env {
            std::env::var(name).ok().filter(|v| !v.trim().is_empty())
        } else {
            None
        };
        from_env.or_else(|| self.table.get(name).cloned())
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.kb_path, PathBuf::from("kb"));
        assert_eq!(config.ollama_url, DEFAULT_OLLAMA_URL);
        assert!(config.default_provider.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_roundtrip_toml() {
        let toml_str = r#"
kb_path = "/srv/kb"
default_provider = "groq"
ollama_url = "http://gpu-box:11434"

[providers.groq]
model = "llama-3.1-8b-instant"

[credentials]
GROQ_API_KEY = "gsk_test"
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.kb_path, PathBuf::from("/srv/kb"));
        assert_eq!(config.default_provider.as_deref(), Some("groq"));
        assert_eq!(
            config.provider("groq").and_then(|p| p.model.as_deref()),
            Some("llama-3.1-8b-instant")
        );
        assert!(config.provider("claude").is_none());
    }

    #[test]
    fn unknown_default_provider_rejected() {
        let config = AppConfig {
            default_provider: Some("openrouter".into()),
            ..AppConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn non_http_url_rejected() {
        let config = AppConfig {
            ollama_url: "localhost:11434".into(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());

        let mut providers = HashMap::new();
        providers.insert(
            "claude".to_string(),
            ProviderConfig {
                api_url: Some("ftp://proxy".into()),
                model: None,
            },
        );
        let config = AppConfig {
            providers,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_ok());
        assert_eq!(result.unwrap().ollama_url, DEFAULT_OLLAMA_URL);
    }

    #[test]
    fn invalid_file_reports_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "kb_path = [").unwrap();
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "default_provider = \"ollama\"\n").unwrap();
        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.default_provider.as_deref(), Some("ollama"));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("kb_path"));
        assert!(toml_str.contains("GROQ_API_KEY"));
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert!(!parsed.credentials().has_credential("SIEMGUIDE_UNSET_TEST_KEY"));
    }

    #[test]
    fn debug_redacts_credentials() {
        let mut config = AppConfig::default();
        config
            .credentials
            .insert("ANTHROPIC_API_KEY".into(), "sk-ant-secret".into());
        let debug = format!("{config:?}");
        assert!(debug.contains("ANTHROPIC_API_KEY"));
        assert!(!debug.contains("sk-ant-secret"));
        assert!(!format!("{:?}", config.credentials()).contains("sk-ant-secret"));
    }

    #[test]
    fn table_credentials_treat_blank_as_absent() {
        let mut table = HashMap::new();
        table.insert("GROQ_API_KEY".to_string(), "".to_string());
        table.insert("HUGGINGFACE_API_KEY".to_string(), "hf_abc".to_string());
        let creds = ConfigCredentials::from_table(table);
        assert!(!creds.has_credential("GROQ_API_KEY"));
        assert_eq!(creds.credential("HUGGINGFACE_API_KEY").as_deref(), Some("hf_abc"));
    }

    #[test]
    fn environment_overrides_table() {
        let key = "SIEMGUIDE_TEST_ENV_OVERRIDE_KEY";
        // SAFETY: test-unique variable name, not read by other tests
        unsafe { std::env::set_var(key, "from-env") };
        let mut config = AppConfig::default();
        config.credentials.insert(key.into(), "from-table".into());
        assert_eq!(config.credentials().credential(key).as_deref(), Some("from-env"));
        unsafe { std::env::remove_var(key) };
        assert_eq!(config.credentials().credential(key).as_deref(), Some("from-table"));
    }

    #[test]
    fn ollama_env_url_beats_provider_section() {
        let toml_str = r#"
ollama_url = "http://file-top:11434"

[providers.ollama]
api_url = "http://file-section:11434"
model = "mistral"
"#;
        let mut config: AppConfig = toml::from_str(toml_str).unwrap();
        config.apply_env(|name| (name == "OLLAMA_BASE_URL").then(|| "http://env-box:11434".into()));

        assert!(config.validate().is_ok());
        assert_eq!(config.ollama_url, "http://env-box:11434");
        let section = config.provider("ollama").unwrap();
        assert_eq!(section.api_url.as_deref(), Some("http://env-box:11434"));
        assert_eq!(section.model.as_deref(), Some("mistral"));
    }

    #[test]
    fn env_overrides_leave_unset_fields_alone() {
        let mut config = AppConfig::default();
        config.apply_env(|name| match name {
            "SIEMGUIDE_KB_PATH" => Some("/opt/kb".into()),
            "SIEMGUIDE_PROVIDER" => Some("ollama".into()),
            _ => None,
        });
        assert_eq!(config.kb_path, PathBuf::from("/opt/kb"));
        assert_eq!(config.default_provider.as_deref(), Some("ollama"));
        assert_eq!(config.ollama_url, DEFAULT_OLLAMA_URL);
        assert!(config.provider("ollama").is_none());
    }
}
