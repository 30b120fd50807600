use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings read from `bigram.toml`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BigramConfig {
    pub database: Option<String>,
    pub lowercase: Option<bool>,
}

impl BigramConfig {
    /// Database path, preferring an explicit override
    pub fn database_path(&self, cli_override: Option<&Path>) -> PathBuf {
        cli_override
            .map(Path::to_path_buf)
            .or_else(|| self.database.as_ref().map(PathBuf::from))
            .unwrap_or_else(default_database_path)
    }

    pub fn lowercase(&self) -> bool {
        self.lowercase.unwrap_or(true)
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("bigram.toml")
}

pub fn default_database_path() -> PathBuf {
    PathBuf::from("bigrams.db")
}

/// Load the config file; a missing file yields `None`
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<BigramConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: BigramConfig = toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("invalid config {}: {}", path.display(), e))?;
    Ok(Some(config))
}
