// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Concierge.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Concierge configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConciergeConfig {
    /// Agent identity and logging settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Tool worker process settings.
    #[serde(default)]
    pub worker: WorkerConfig,

    /// Groq (OpenAI-compatible) provider settings.
    #[serde(default)]
    pub groq: GroqConfig,

    /// Session context store settings.
    #[serde(default)]
    pub session: SessionConfig,

    /// Refund business-rule settings.
    #[serde(default)]
    pub refund: RefundConfig,

    /// Record store backend settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Agent identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the agent.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "concierge".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Tool worker process configuration.
///
/// The worker is a child process reached only through its stdio pipes; it
/// hosts the classification model and the order-database lookup.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WorkerConfig {
    /// Executable to spawn for the tool worker.
    #[serde(default = "default_worker_command")]
    pub command: String,

    /// Arguments passed to the worker executable.
    #[serde(default)]
    pub args: Vec<String>,

    /// Seconds a single invoke may wait for its response.
    #[serde(default = "default_invoke_timeout_secs")]
    pub invoke_timeout_secs: u64,

    /// Seconds to wait for the worker's ready frame at startup.
    #[serde(default = "default_handshake_timeout_secs")]
    pub handshake_timeout_secs: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            command: default_worker_command(),
            args: Vec::new(),
            invoke_timeout_secs: default_invoke_timeout_secs(),
            handshake_timeout_secs: default_handshake_timeout_secs(),
        }
    }
}

fn default_worker_command() -> String {
    "concierge-worker".to_string()
}

fn default_invoke_timeout_secs() -> u64 {
    30
}

fn default_handshake_timeout_secs() -> u64 {
    20
}

/// Groq provider configuration (OpenAI-compatible chat completions).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GroqConfig {
    /// Groq API key. `None` requires the `CONCIERGE_GROQ_API_KEY` env var.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Chat completions endpoint URL.
    #[serde(default = "default_groq_base_url")]
    pub base_url: String,

    /// Model identifier for both dispatch-loop calls.
    #[serde(default = "default_groq_model")]
    pub model: String,

    /// Maximum tokens to generate per response.
    #[serde(default = "default_groq_max_tokens")]
    pub max_tokens: u32,
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_groq_base_url(),
            model: default_groq_model(),
            max_tokens: default_groq_max_tokens(),
        }
    }
}

fn default_groq_base_url() -> String {
    "https://api.groq.com/openai/v1/chat/completions".to_string()
}

fn default_groq_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_groq_max_tokens() -> u32 {
    1024
}

/// Session context store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Hours of inactivity after which a user's next message starts a new
    /// session and forces fresh classification.
    #[serde(default = "default_gap_hours")]
    pub gap_hours: u64,

    /// Upper bound on tracked sessions; idle entries are evicted past this.
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// Number of prior chat turns included in the provider prompt.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            gap_hours: default_gap_hours(),
            max_entries: default_max_entries(),
            history_limit: default_history_limit(),
        }
    }
}

fn default_gap_hours() -> u64 {
    24
}

fn default_max_entries() -> usize {
    10_000
}

fn default_history_limit() -> usize {
    20
}

/// Refund business-rule configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RefundConfig {
    /// Product categories that can never be refunded (perishable and
    /// consumable goods, per health and safety policy).
    #[serde(default = "default_non_refundable_categories")]
    pub non_refundable_categories: Vec<String>,

    /// Fraction of the order value withheld as the shipping fee.
    #[serde(default = "default_shipping_fee_rate")]
    pub shipping_fee_rate: f64,
}

impl Default for RefundConfig {
    fn default() -> Self {
        Self {
            non_refundable_categories: default_non_refundable_categories(),
            shipping_fee_rate: default_shipping_fee_rate(),
        }
    }
}

fn default_non_refundable_categories() -> Vec<String> {
    [
        "Fruits & Vegetables",
        "Beverages",
        "Snacks",
        "Grocery",
        "Dairy",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_shipping_fee_rate() -> f64 {
    0.05
}

/// Record store backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("concierge").join("concierge.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("concierge.db"))
        .to_string_lossy()
        .into_owned()
}
