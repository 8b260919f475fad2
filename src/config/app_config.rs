use std::path::PathBuf;

use serde::Deserialize;

use crate::domain::{CragConfig, DomainError};
use crate::infrastructure::knowledge_base::DEFAULT_EMBEDDING_DIMENSIONS;
use crate::infrastructure::llm::DEFAULT_OPENAI_BASE_URL;
use crate::infrastructure::web_search::DEFAULT_TAVILY_BASE_URL;

/// Well-known environment variables and the keys they override
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("OPENAI_API_KEY", "llm.api_key"),
    ("OPENAI_BASE_URL", "llm.base_url"),
    ("OPENAI_EVAL_MODEL", "llm.eval_model"),
    ("OPENAI_GEN_MODEL", "llm.gen_model"),
    ("OPENAI_REWRITE_MODEL", "llm.rewrite_model"),
    ("TAVILY_API_KEY", "web_search.api_key"),
    ("CRAG_UPPER_THRESHOLD", "crag.upper_threshold"),
    ("CRAG_LOWER_THRESHOLD", "crag.lower_threshold"),
    ("RETRIEVER_K", "crag.retriever_k"),
    ("SEARCH_K", "crag.search_k"),
];

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub crag: CragConfig,
    pub llm: LlmConfig,
    pub web_search: WebSearchConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Chat model access; without an API key the engine runs on its fallbacks
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub eval_model: String,
    pub gen_model: String,
    pub rewrite_model: String,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebSearchConfig {
    pub api_key: Option<String>,
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub embedding_dimensions: usize,
    /// Markdown file loaded into the store at startup
    pub seed_file: Option<PathBuf>,
    /// JSON snapshot loaded at startup and rewritten after each ingestion
    pub persist_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            eval_model: "gpt-4o-mini".to_string(),
            gen_model: "gpt-4o".to_string(),
            rewrite_model: "gpt-4o".to_string(),
            timeout_ms: 60_000,
        }
    }
}

impl LlmConfig {
    /// The API key, if set and non-empty
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.trim().is_empty())
    }
}

impl Default for WebSearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_TAVILY_BASE_URL.to_string(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            embedding_dimensions: DEFAULT_EMBEDDING_DIMENSIONS,
            seed_file: None,
            persist_path: None,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            );

        let builder = apply_env_overrides(builder, |name| std::env::var(name).ok())?;

        builder.build()?.try_deserialize()
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), DomainError> {
        self.crag.validate()?;

        if self.store.embedding_dimensions == 0 {
            return Err(DomainError::configuration(
                "store.embedding_dimensions must be at least 1",
            ));
        }

        if self.llm.timeout_ms == 0 {
            return Err(DomainError::configuration("llm.timeout_ms must be at least 1"));
        }

        Ok(())
    }
}

/// Apply the well-known provider variables on top of the file and `APP__` sources
fn apply_env_overrides<F>(
    mut builder: config::ConfigBuilder<config::builder::DefaultState>,
    lookup: F,
) -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    for (variable, key) in ENV_OVERRIDES {
        let value = lookup(variable)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        builder = builder.set_override_option(*key, value)?;
    }

    Ok(builder)
}
