//! Command line argument parsing
//!
//! This module handles CLI argument parsing with subcommands:
//! - `chat`: Interactive conversation (default when no subcommand is given)
//! - `ask`: Send a single prompt and print the reply
//! - `show-config`: Show configuration discovery information
//! - `init-config`: Write a default user configuration file

use crate::env;
use crate::llm::ApiKey;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug)]
pub enum ExecutionMode {
    Interactive(InteractiveConfig),
    OneShot(OneShotConfig),
    ShowConfig,
    InitConfig,
}

/// Settings shared by every mode that talks to the model
#[derive(Debug, Clone, Default)]
pub struct SessionArgs {
    pub config_override: Option<PathBuf>,
    pub api_key: Option<String>,
    pub feedback_log: Option<PathBuf>,
    pub verbose: bool,
}

#[derive(Debug)]
pub struct InteractiveConfig {
    pub session: SessionArgs,
    pub show_system: bool,
}

#[derive(Debug)]
pub struct OneShotConfig {
    pub session: SessionArgs,
    pub prompt: String,
}

#[derive(Debug, Parser)]
#[command(name = "gemchat")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A friendly terminal chat assistant powered by Google Gemini")]
#[command(long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start an interactive conversation
    Chat {
        /// Configuration file path
        #[arg(short = 'c', long = "config")]
        config: Option<PathBuf>,
        /// Gemini API key (defaults to $GEMINI_API_KEY)
        #[arg(short = 'k', long = "api-key")]
        api_key: Option<String>,
        /// Feedback log file
        #[arg(long = "feedback-log", value_name = "FILE")]
        feedback_log: Option<PathBuf>,
        /// Also render the persona/system messages
        #[arg(long = "show-system")]
        show_system: bool,
        /// Enable verbose output
        #[arg(short = 'v', long = "verbose")]
        verbose: bool,
    },
    /// Send one prompt and print the reply
    Ask {
        /// The prompt to send
        prompt: String,
        /// Configuration file path
        #[arg(short = 'c', long = "config")]
        config: Option<PathBuf>,
        /// Gemini API key (defaults to $GEMINI_API_KEY)
        #[arg(short = 'k', long = "api-key")]
        api_key: Option<String>,
        /// Enable verbose output
        #[arg(short = 'v', long = "verbose")]
        verbose: bool,
    },
    /// Show configuration discovery information
    ShowConfig,
    /// Create ~/.gemchat/config.toml with default settings
    InitConfig,
}

impl Args {
    pub fn parse() -> Self {
        Parser::parse()
    }

    pub fn mode(&self) -> ExecutionMode {
        match &self.command {
            Some(Commands::Chat {
                config,
                api_key,
                feedback_log,
                show_system,
                verbose,
            }) => ExecutionMode::Interactive(InteractiveConfig {
                session: SessionArgs {
                    config_override: config.clone(),
                    api_key: api_key.clone(),
                    feedback_log: feedback_log.clone(),
                    verbose: *verbose,
                },
                show_system: *show_system,
            }),
            Some(Commands::Ask {
                prompt,
                config,
                api_key,
                verbose,
            }) => ExecutionMode::OneShot(OneShotConfig {
                session: SessionArgs {
                    config_override: config.clone(),
                    api_key: api_key.clone(),
                    feedback_log: None,
                    verbose: *verbose,
                },
                prompt: prompt.clone(),
            }),
            Some(Commands::ShowConfig) => ExecutionMode::ShowConfig,
            Some(Commands::InitConfig) => ExecutionMode::InitConfig,
            None => ExecutionMode::Interactive(InteractiveConfig {
                session: SessionArgs::default(),
                show_system: false,
            }),
        }
    }
}

/// Pick the API key: explicit argument first, then the environment.
/// Blank values count as absent.
pub fn resolve_api_key(explicit: Option<&str>) -> Option<ApiKey> {
    explicit
        .and_then(ApiKey::new)
        .or_else(|| std::env::var(env::API_KEY_ENV_VAR).ok().and_then(ApiKey::new))
}
