//! Runtime configuration for recipe-forge.
//!
//! Configuration is loaded from a JSON file or constructed programmatically.
//! The completion API credential is never read from the file: it is resolved
//! from the environment once at startup and carried in [`UpstreamConfig::api_key`].

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

/// Command-line arguments.
#[derive(Parser, Debug, Clone)]
#[command(name = "recipe-forge", about = "LLM-backed recipe generation service")]
pub struct Cli {
    /// Path to configuration file (JSON).
    #[arg(short, long, default_value = "config.json")]
    pub config: PathBuf,

    /// HTTP listen address (overrides the config file).
    #[arg(long)]
    pub listen: Option<String>,

    /// Enable verbose logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines.
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the HTTP server (default).
    Serve,

    /// Generate a single recipe and print it to stdout.
    Generate {
        /// Available ingredients, comma separated.
        #[arg(short, long, required = true, value_delimiter = ',')]
        ingredients: Vec<String>,

        /// Maximum cooking time.
        #[arg(short, long, default_value = "30 minutes")]
        time: String,

        /// Meal type (Breakfast, Lunch, Dinner, Snack, Dessert).
        #[arg(short, long, default_value = "Dinner")]
        meal: String,

        /// Dietary preferences, comma separated.
        #[arg(short, long, value_delimiter = ',')]
        diet: Vec<String>,

        /// Print the raw recipe JSON instead of a card.
        #[arg(long)]
        json: bool,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,

    /// Completion API configuration.
    pub upstream: UpstreamConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address (e.g. "0.0.0.0:8080").
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Completion API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the OpenAI-compatible API; `/chat/completions` is appended.
    pub base_url: String,

    /// Model identifier sent with every request.
    pub model: String,

    /// Name of the environment variable holding the bearer token.
    pub api_key_env: String,

    /// Bearer token. Populated by [`Config::resolve_credentials`], never serialized.
    #[serde(skip)]
    pub api_key: Option<String>,

    /// Per-attempt timeout in seconds.
    pub timeout_secs: u64,

    /// Additional attempts after a transport error, timeout or 5xx status.
    pub max_retries: u32,

    /// Backoff before the first retry; doubles on each further retry.
    pub retry_backoff_ms: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://ai.gateway.lovable.dev/v1".to_string(),
            model: "google/gemini-2.5-flash".to_string(),
            api_key_env: "LOVABLE_API_KEY".to_string(),
            api_key: None,
            timeout_secs: 60,
            max_retries: 0,
            retry_backoff_ms: 500,
        }
    }
}

impl UpstreamConfig {
    /// Full URL of the chat completion endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Backoff before retry number `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u64 << attempt.saturating_sub(1).min(16);
        Duration::from_millis(self.retry_backoff_ms.saturating_mul(factor))
    }
}

impl Config {
    /// Load configuration from a JSON file, falling back to defaults for missing fields.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if path.exists() {
            let data = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&data)?;
            Ok(config)
        } else {
            tracing::warn!("Config file not found at {:?}, using defaults", path);
            Ok(Config::default())
        }
    }

    /// Read the completion API credential from the configured environment variable.
    ///
    /// A missing or empty variable leaves `api_key` unset; requests then fail with
    /// a configuration error instead of the process refusing to start.
    pub fn resolve_credentials(&mut self) {
        self.upstream.api_key = std::env::var(&self.upstream.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty());

        if self.upstream.api_key.is_none() {
            tracing::warn!(
                env = self.upstream.api_key_env,
                "Completion API key is not set; recipe requests will fail"
            );
        }
    }
}
