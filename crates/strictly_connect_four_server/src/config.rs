//! Gateway configuration loaded from TOML.
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 3000
//!
//! [oracle]
//! program = "cargo"
//! args = ["run", "--release", "--quiet", "--"]
//! side_flag = "--next"
//! budget_flag = "--num-try"   # "" leaves the budget off the command line
//! timeout_ms = 30000
//! default_budget = 200
//!
//! [oracle.sentinels]
//! "Game Over" = "draw"
//! ```

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use strictly_connect_four::{Outcome, SearchBudget, SentinelTable};
use tracing::{debug, info, instrument};

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct GatewayConfig {
    /// HTTP listener settings.
    #[serde(default)]
    server: ServerConfig,

    /// Oracle process settings.
    #[serde(default)]
    oracle: OracleConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_", into)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    host: String,

    /// Port to bind to.
    #[serde(default = "default_port")]
    port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// How to launch the oracle and read its replies.
#[derive(Debug, Clone, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_", into)]
pub struct OracleConfig {
    /// Oracle executable. It may be a wrapper such as `cargo`; on timeout
    /// its whole process group is killed.
    #[serde(default = "default_program")]
    program: String,

    /// Arguments placed before the side and budget flags.
    #[serde(default)]
    args: Vec<String>,

    /// Flag preceding the side token.
    #[serde(default = "default_side_flag")]
    side_flag: String,

    /// Flag preceding the search budget. Empty to omit the budget.
    #[serde(default = "default_budget_flag")]
    budget_flag: String,

    /// Wall-clock limit for one oracle call, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    timeout_ms: u64,

    /// Budget used when a request names none.
    #[serde(default = "default_budget")]
    default_budget: u32,

    /// Extra sentinel literals understood by this oracle build.
    #[serde(default)]
    sentinels: BTreeMap<String, Outcome>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_program() -> String {
    "connect-four-engine".to_string()
}

fn default_side_flag() -> String {
    "--next".to_string()
}

fn default_budget_flag() -> String {
    "--num-try".to_string()
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_budget() -> u32 {
    SearchBudget::DEFAULT
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self::new(default_program())
    }
}

impl OracleConfig {
    /// Creates an oracle configuration for `program` with default flags.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            side_flag: default_side_flag(),
            budget_flag: default_budget_flag(),
            timeout_ms: default_timeout_ms(),
            default_budget: default_budget(),
            sentinels: BTreeMap::new(),
        }
    }

    /// Wall-clock limit for one oracle call.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// The configured default budget, validated.
    pub fn search_budget(&self) -> Result<SearchBudget, ConfigError> {
        SearchBudget::new(self.default_budget)
            .map_err(|e| ConfigError::new(format!("Invalid default_budget: {}", e.message)))
    }

    /// Built-in sentinels plus the configured extras.
    pub fn sentinel_table(&self) -> SentinelTable {
        let mut table = SentinelTable::default();
        for (literal, outcome) in &self.sentinels {
            table.insert(literal.clone(), *outcome);
        }
        table
    }
}

impl GatewayConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;

        info!(program = %config.oracle.program, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise falls back to defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.oracle.program.trim().is_empty() {
            return Err(ConfigError::new("oracle.program must not be empty".to_string()));
        }
        if self.oracle.timeout_ms == 0 {
            return Err(ConfigError::new("oracle.timeout_ms must be positive".to_string()));
        }
        self.oracle.search_budget()?;
        Ok(())
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
