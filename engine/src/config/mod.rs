//! Configuration management
//!
//! Loading and validation of the Steward configuration, stored as TOML at
//! ~/.steward/config.toml.
//!
//! # Configuration Sections
//!
//! - **agent**: Name, description, system prompt, iteration cap
//! - **llm**: Default provider, sampling settings, per-provider endpoints
//! - **memory**: Short-term capacity
//! - **tools**: Built-in tool enablement flags
//! - **telemetry**: Log level
//!
//! API keys may live in the config file or in the environment; the
//! `*_API_KEY` variables are consulted when the file has no key.

use sdk::EngineError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Agent identity and loop settings
    #[serde(default)]
    pub agent: AgentConfig,

    /// Model provider configuration
    #[serde(default)]
    pub llm: LlmConfig,

    /// Memory configuration
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Built-in tool enablement
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Agent identity and loop settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Agent name, used in prompts and event envelopes
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// One-line description of what this agent is for
    #[serde(default)]
    pub description: String,

    /// Custom system prompt; a default is composed from name and
    /// description when absent
    #[serde(default)]
    pub system_prompt: Option<String>,

    /// Upper bound on model calls per conversation turn
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
}

/// Model provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider to use (ollama, openai, anthropic, openrouter)
    #[serde(default = "default_provider")]
    pub default_provider: String,

    /// Sampling temperature passed to every provider
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Completion token cap passed to every provider
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Ollama provider settings
    #[serde(default)]
    pub ollama: OllamaConfig,

    /// OpenAI provider settings
    #[serde(default)]
    pub openai: OpenAIConfig,

    /// Anthropic provider settings
    #[serde(default)]
    pub anthropic: AnthropicConfig,

    /// OpenRouter provider settings
    #[serde(default)]
    pub openrouter: OpenRouterConfig,
}

/// Ollama provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Base URL for the Ollama API
    #[serde(default = "default_ollama_base_url")]
    pub base_url: String,

    /// Model name
    #[serde(default = "default_ollama_model")]
    pub model: String,
}

/// OpenAI provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIConfig {
    /// API key; OPENAI_API_KEY is used when absent
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL for the OpenAI API
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,

    /// Model name
    #[serde(default = "default_openai_model")]
    pub model: String,
}

/// Anthropic provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnthropicConfig {
    /// API key; ANTHROPIC_API_KEY is used when absent
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL for the Anthropic API
    #[serde(default = "default_anthropic_base_url")]
    pub base_url: String,

    /// Model name
    #[serde(default = "default_anthropic_model")]
    pub model: String,
}

/// OpenRouter provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenRouterConfig {
    /// API key; OPENROUTER_API_KEY is used when absent
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL for the OpenRouter API
    #[serde(default = "default_openrouter_base_url")]
    pub base_url: String,

    /// Model name
    #[serde(default = "default_openrouter_model")]
    pub model: String,
}

/// Memory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Entries kept in short-term memory before eviction
    #[serde(default = "default_short_term_capacity")]
    pub short_term_capacity: usize,
}

/// Built-in tool enablement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Enable the arithmetic calculator
    #[serde(default = "default_true")]
    pub calculator: bool,

    /// Enable the in-memory note store
    #[serde(default = "default_true")]
    pub notes: bool,

    /// Enable the mock web search
    #[serde(default)]
    pub web_search: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// Default value functions
fn default_agent_name() -> String {
    "assistant".to_string()
}

fn default_max_iterations() -> u32 {
    10
}

fn default_provider() -> String {
    "ollama".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_ollama_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.1:8b".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_anthropic_base_url() -> String {
    "https://api.anthropic.com/v1".to_string()
}

fn default_anthropic_model() -> String {
    "claude-3-5-sonnet-20241022".to_string()
}

fn default_openrouter_base_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_openrouter_model() -> String {
    "openai/gpt-4o-mini".to_string()
}

fn default_short_term_capacity() -> usize {
    crate::memory::DEFAULT_CAPACITY
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            agent: AgentConfig::default(),
            llm: LlmConfig::default(),
            memory: MemoryConfig::default(),
            tools: ToolsConfig::default(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            description: String::new(),
            system_prompt: None,
            max_iterations: default_max_iterations(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            ollama: OllamaConfig::default(),
            openai: OpenAIConfig::default(),
            anthropic: AnthropicConfig::default(),
            openrouter: OpenRouterConfig::default(),
        }
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: default_ollama_base_url(),
            model: default_ollama_model(),
        }
    }
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_openai_base_url(),
            model: default_openai_model(),
        }
    }
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_anthropic_base_url(),
            model: default_anthropic_model(),
        }
    }
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_openrouter_base_url(),
            model: default_openrouter_model(),
        }
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            short_term_capacity: default_short_term_capacity(),
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            calculator: true,
            notes: true,
            web_search: false,
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl OpenAIConfig {
    /// Key from the file, falling back to OPENAI_API_KEY
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.is_empty())
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
    }
}

impl AnthropicConfig {
    /// Key from the file, falling back to ANTHROPIC_API_KEY
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.is_empty())
            .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok())
    }
}

impl OpenRouterConfig {
    /// Key from the file, falling back to OPENROUTER_API_KEY
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.is_empty())
            .or_else(|| std::env::var("OPENROUTER_API_KEY").ok())
    }
}

impl Config {
    /// Load configuration from the default location (~/.steward/config.toml)
    ///
    /// Creates and saves a default configuration when the file does not
    /// exist yet.
    pub fn load_or_create() -> Result<Self, EngineError> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            Self::load_from_path(&config_path)
        } else {
            Self::create_default(&config_path)
        }
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, EngineError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| EngineError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Create default configuration and save it to `path`
    fn create_default(path: &Path) -> Result<Self, EngineError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                EngineError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let config = Self::default();
        config.validate()?;

        let toml_string = toml::to_string_pretty(&config)
            .map_err(|e| EngineError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, toml_string)
            .map_err(|e| EngineError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(config)
    }

    /// Default configuration file path (~/.steward/config.toml)
    fn default_config_path() -> Result<PathBuf, EngineError> {
        let home = dirs::home_dir()
            .ok_or_else(|| EngineError::Config("Could not determine home directory".to_string()))?;

        Ok(home.join(".steward").join("config.toml"))
    }

    /// Validate configuration values
    ///
    /// Checks fields whose bad values would otherwise only surface deep in
    /// a run: the selected provider must be known and, for the hosted
    /// providers, resolvable to an API key.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.agent.name.trim().is_empty() {
            return Err(EngineError::Config(
                "agent.name must not be empty".to_string(),
            ));
        }

        if self.agent.max_iterations == 0 {
            return Err(EngineError::Config(
                "agent.max_iterations must be at least 1".to_string(),
            ));
        }

        if self.memory.short_term_capacity == 0 {
            return Err(EngineError::Config(
                "memory.short_term_capacity must be at least 1".to_string(),
            ));
        }

        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.telemetry.log_level.as_str()) {
            return Err(EngineError::Config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.telemetry.log_level,
                valid_log_levels.join(", ")
            )));
        }

        let valid_providers = ["ollama", "openai", "anthropic", "openrouter"];
        if !valid_providers.contains(&self.llm.default_provider.as_str()) {
            return Err(EngineError::Config(format!(
                "Invalid default provider '{}'. Must be one of: {}",
                self.llm.default_provider,
                valid_providers.join(", ")
            )));
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(EngineError::Config(
                "llm.temperature must be between 0.0 and 2.0".to_string(),
            ));
        }

        let missing_key = match self.llm.default_provider.as_str() {
            "openai" => self.llm.openai.resolved_api_key().is_none(),
            "anthropic" => self.llm.anthropic.resolved_api_key().is_none(),
            "openrouter" => self.llm.openrouter.resolved_api_key().is_none(),
            _ => false,
        };
        if missing_key {
            return Err(EngineError::Config(format!(
                "No API key configured for provider '{}'",
                self.llm.default_provider
            )));
        }

        Ok(())
    }
}
