use querypilot_tools::DatabaseConfig;
use serde::Deserialize;
use std::path::Path;

/// Full runner configuration, loaded from a TOML file:
///
/// ```toml
/// [model]
/// api_key = "sk-..."
/// model = "gpt-4o-mini"
/// # base_url = "https://my-compatible-endpoint.example"
///
/// [database]
/// host = "localhost"
/// port = 5432
/// dbname = "app"
/// user = "app"
/// password = "secret"
/// schema = "public"
/// ```
#[derive(Debug, Deserialize)]
pub struct Config {
    pub model: ModelConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    pub api_key: String,
    pub model: String,
    #[serde(default)]
    pub base_url: Option<String>,
}

pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}
