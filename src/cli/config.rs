//! Configuration discovery and loading
//!
//! This module handles the configuration discovery hierarchy:
//! 1. Current directory: ./gemchat.toml or ./.gemchat/config.toml
//! 2. User config: ~/.gemchat/config.toml
//! 3. System config: /etc/gemchat/config.toml
//! 4. Built-in defaults
//!
//! Configuration is read once at start-up.

use crate::chat::{RateLimitConfig, SessionOptions};
use crate::env;
use crate::llm::GeminiConfig;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::env as std_env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitSettings {
    pub max_requests: u32,
    pub window_seconds: u64,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            max_requests: env::rate_limit::MAX_REQUESTS,
            window_seconds: env::rate_limit::WINDOW_SECONDS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// Identifiers tried in order
    pub fallback: Vec<String>,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            fallback: env::gemini::MODEL_FALLBACK_CHAIN
                .iter()
                .map(|m| m.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonaSettings {
    pub enabled: bool,
    pub greeting: bool,
}

impl Default for PersonaSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            greeting: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackSettings {
    pub log_path: PathBuf,
}

impl Default for FeedbackSettings {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from(env::feedback::LOG_FILE_NAME),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub base_url: String,
    pub api_version: String,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        let gemini = GeminiConfig::default();
        Self {
            base_url: gemini.base_url,
            api_version: gemini.api_version,
        }
    }
}

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub provider: ProviderSettings,
    pub rate_limit: RateLimitSettings,
    pub models: ModelSettings,
    pub persona: PersonaSettings,
    pub feedback: FeedbackSettings,
}

impl ChatConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would disable or break rate limiting
    pub fn validate(&self) -> Result<()> {
        let limits = &self.rate_limit;
        if limits.max_requests == 0 {
            bail!("rate_limit.max_requests must be at least 1");
        }
        if limits.window_seconds == 0 {
            bail!("rate_limit.window_seconds must be at least 1");
        }
        if chrono::Duration::from_std(Duration::from_secs(limits.window_seconds)).is_err() {
            bail!(
                "rate_limit.window_seconds is out of range: {}",
                limits.window_seconds
            );
        }
        Ok(())
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }

    /// Load from TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        Self::from_toml_str(&content).with_context(|| format!("Invalid config file {:?}", path))
    }

    /// Save to TOML file
    pub fn to_toml_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_toml_string()?)
            .with_context(|| format!("Failed to write config file {:?}", path))
    }

    pub fn gemini_config(&self) -> GeminiConfig {
        GeminiConfig {
            base_url: self.provider.base_url.clone(),
            api_version: self.provider.api_version.clone(),
        }
    }

    pub fn rate_limit_config(&self) -> RateLimitConfig {
        RateLimitConfig {
            max_requests: self.rate_limit.max_requests,
            window: Duration::from_secs(self.rate_limit.window_seconds),
        }
    }

    pub fn session_options(&self) -> SessionOptions {
        let defaults = SessionOptions::default();
        SessionOptions {
            persona: defaults.persona.filter(|_| self.persona.enabled),
            greeting: defaults.greeting.filter(|_| self.persona.greeting),
        }
    }
}

/// Configuration discovery system
pub struct ConfigDiscovery;

impl ConfigDiscovery {
    /// Discover and load configuration using the hierarchy
    pub fn discover_config() -> Result<ChatConfig> {
        if let Some(config_path) = Self::find_config_file() {
            info!("Loading configuration from: {:?}", config_path);
            return ChatConfig::from_toml_file(config_path);
        }

        info!("No configuration file found, using defaults");
        Ok(ChatConfig::default())
    }

    /// Find configuration file using discovery hierarchy
    pub fn find_config_file() -> Option<PathBuf> {
        for candidate in Self::get_config_candidates() {
            debug!("Checking for config file: {:?}", candidate);
            if candidate.is_file() {
                debug!("Found config file: {:?}", candidate);
                return Some(candidate);
            }
        }

        debug!("No config file found in discovery hierarchy");
        None
    }

    /// Get list of configuration file candidates in priority order
    fn get_config_candidates() -> Vec<PathBuf> {
        let mut candidates = Vec::new();

        if let Ok(current_dir) = std_env::current_dir() {
            candidates.push(current_dir.join(env::LOCAL_CONFIG_FILE_NAME));
            candidates.push(env::local_config_file_path(&current_dir));
        }

        if let Some(home_dir) = Self::get_home_dir() {
            candidates.push(env::user_config_file_path(&home_dir));
        }

        #[cfg(unix)]
        candidates.push(PathBuf::from("/etc/gemchat/config.toml"));

        #[cfg(windows)]
        if let Ok(program_data) = std_env::var("PROGRAMDATA") {
            candidates.push(PathBuf::from(program_data).join("gemchat").join("config.toml"));
        }

        candidates
    }

    fn get_home_dir() -> Option<PathBuf> {
        std_env::var("HOME")
            .ok()
            .or_else(|| std_env::var("USERPROFILE").ok())
            .map(PathBuf::from)
    }

    /// Create a default config file in the user's home directory
    pub fn create_default_user_config() -> Result<PathBuf> {
        let home_dir = Self::get_home_dir().context("Could not determine home directory")?;

        let config_dir = env::user_config_dir_path(&home_dir);
        let config_path = env::user_config_file_path(&home_dir);

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create {:?}", config_dir))?;
            info!("Created configuration directory: {:?}", config_dir);
        }

        if !config_path.exists() {
            ChatConfig::default().to_toml_file(&config_path)?;
            info!("Created default configuration file: {:?}", config_path);
        } else {
            warn!("Configuration file already exists: {:?}", config_path);
        }

        Ok(config_path)
    }

    /// Show configuration discovery information for debugging
    pub fn show_discovery_info() {
        println!("Configuration Discovery Hierarchy:");
        println!();

        for (i, candidate) in Self::get_config_candidates().iter().enumerate() {
            let status = if candidate.exists() {
                if candidate.is_file() {
                    "✓ EXISTS"
                } else {
                    "✗ NOT A FILE"
                }
            } else {
                "✗ NOT FOUND"
            };

            println!("  {}. {:?} - {}", i + 1, candidate, status);
        }

        println!();
        if let Some(found) = Self::find_config_file() {
            println!("Active configuration: {:?}", found);
        } else {
            println!("Active configuration: Built-in defaults");
        }
    }
}
