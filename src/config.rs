/// Ledger configuration loader - parses ledger.toml
///
/// Separates the initial ledger state (authorized providers, per-location
/// flood thresholds) and host settings from code, so zones can be added or
/// thresholds adjusted without recompiling.

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

use crate::logging::LogLevel;

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "ledger.toml";

/// Environment variable naming an alternate configuration file.
pub const CONFIG_PATH_ENV: &str = "LEDGER_CONFIG";

/// Root configuration structure for TOML parsing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LedgerConfig {
    #[serde(default)]
    pub host: HostSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default, rename = "provider")]
    pub providers: Vec<ProviderConfig>,
    #[serde(default, rename = "location")]
    pub locations: Vec<LocationConfig>,
}

/// Host chain settings
#[derive(Debug, Clone, Deserialize)]
pub struct HostSettings {
    #[serde(default = "default_initial_block_height")]
    pub initial_block_height: u64,
    /// Mine one block after every successful mutating call
    #[serde(default = "default_auto_mine")]
    pub auto_mine: bool,
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            initial_block_height: default_initial_block_height(),
            auto_mine: default_auto_mine(),
        }
    }
}

fn default_initial_block_height() -> u64 {
    100
}

fn default_auto_mine() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default)]
    pub level: LogLevel,
    pub file: Option<String>,
    #[serde(default)]
    pub timestamps: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            file: None,
            timestamps: false,
        }
    }
}

/// A data provider authorized at startup
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    pub id: String,
    pub description: Option<String>,
}

/// Flood thresholds for one monitored location
#[derive(Debug, Clone, Deserialize)]
pub struct LocationConfig {
    pub location_code: String,
    pub name: Option<String>,
    pub river_level_threshold: u64,
    pub rainfall_threshold: u64,
    pub combined_threshold: u64,
}

impl LocationConfig {
    /// Human-readable label for logs: the configured name, else the code.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.location_code)
    }
}

impl ProviderConfig {
    pub fn display_name(&self) -> &str {
        self.description.as_deref().unwrap_or(&self.id)
    }
}

/// Parses configuration from a TOML string.
pub fn parse_config(contents: &str) -> Result<LedgerConfig, Box<dyn std::error::Error>> {
    let config: LedgerConfig = toml::from_str(contents)?;

    let mut seen = std::collections::HashSet::new();
    for location in &config.locations {
        if location.location_code.is_empty() {
            return Err("location_code must not be empty".into());
        }
        if !seen.insert(location.location_code.as_str()) {
            return Err(format!("duplicate location_code {}", location.location_code).into());
        }
    }
    if config.providers.iter().any(|p| p.id.is_empty()) {
        return Err("provider id must not be empty".into());
    }

    Ok(config)
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<LedgerConfig, Box<dyn std::error::Error>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    parse_config(&contents).map_err(|e| format!("Failed to parse {}: {}", path.display(), e).into())
}

/// Load configuration from the default location (ledger.toml)
pub fn load_config_default() -> Result<LedgerConfig, Box<dyn std::error::Error>> {
    load_config(DEFAULT_CONFIG_PATH)
}

/// Resolves the config path: explicit argument, then `LEDGER_CONFIG` (a
/// `.env` file is honoured), then the default.
pub fn resolve_config_path(explicit: Option<&str>) -> String {
    if let Some(path) = explicit {
        return path.to_string();
    }
    dotenv::dotenv().ok();
    env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}
