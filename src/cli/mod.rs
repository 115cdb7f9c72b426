//! CLI-specific functionality for gemchat
//!
//! This module contains all CLI-related code including argument parsing
//! and configuration discovery.

pub mod args;
pub mod config;

pub use args::{Args, ExecutionMode, InteractiveConfig, OneShotConfig, SessionArgs, resolve_api_key};
pub use config::{ChatConfig, ConfigDiscovery};
