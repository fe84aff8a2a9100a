// Configuration module for reading DeepBox.toml
// This module provides OOP-style configuration management for the player

use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::strategy::Strategy;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub timing: TimingConfig,
    pub alpha_beta: AlphaBetaConfig,
    pub mcts: MctsConfig,
    pub strategy: StrategyConfig,
    pub server: ServerConfig,
    pub debug: DebugConfig,
}

/// Time budgets
#[derive(Debug, Deserialize, Clone)]
pub struct TimingConfig {
    /// Turn time used when a request does not carry one
    pub turn_time_ms: u64,
    /// Wall-clock limit on the alpha-beta root loop
    pub alpha_beta_deadline_ms: u64,
}

impl TimingConfig {
    pub fn turn_time(&self) -> Duration {
        Duration::from_millis(self.turn_time_ms)
    }

    pub fn alpha_beta_deadline(&self) -> Duration {
        Duration::from_millis(self.alpha_beta_deadline_ms)
    }
}

/// Alpha-beta search constants
#[derive(Debug, Deserialize, Clone)]
pub struct AlphaBetaConfig {
    /// Depth used when alpha-beta is selected directly
    pub max_depth: u32,
}

/// Monte Carlo tree search constants
#[derive(Debug, Deserialize, Clone)]
pub struct MctsConfig {
    pub exploration_constant: f64,
    /// Stops after this many iterations even with time left
    #[serde(default)]
    pub max_iterations: Option<u64>,
    /// Fixed RNG seed for reproducible searches
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Strategy selection constants
#[derive(Debug, Deserialize, Clone)]
pub struct StrategyConfig {
    pub default: Strategy,
    /// DeepBox plays alpha-beta at or below this many free edges
    pub alpha_beta_max_free_edges: usize,
    /// Depth of the DeepBox alpha-beta phase
    pub alpha_beta_depth: u32,
    /// DeepBox plays MCTS at or below this many free edges
    pub mcts_max_free_edges: usize,
}

/// Identity and match coordinator address
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub player_name: String,
    pub coordinator_address: String,
    pub coordinator_port: u16,
}

/// Debug configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the DeepBox.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Loads default configuration from DeepBox.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("DeepBox.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in DeepBox.toml
    pub fn default_hardcoded() -> Self {
        Config {
            timing: TimingConfig {
                turn_time_ms: 5000,
                alpha_beta_deadline_ms: 10000,
            },
            alpha_beta: AlphaBetaConfig { max_depth: 20 },
            mcts: MctsConfig {
                exploration_constant: 0.7,
                max_iterations: None,
                seed: None,
            },
            strategy: StrategyConfig {
                default: Strategy::DeepBox,
                alpha_beta_max_free_edges: 14,
                alpha_beta_depth: 14,
                mcts_max_free_edges: 40,
            },
            server: ServerConfig {
                player_name: "DeepBox".to_string(),
                coordinator_address: "localhost".to_string(),
                coordinator_port: 12345,
            },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "deepbox_debug.jsonl".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default()
            .unwrap_or_else(|e| {
                log::warn!("Could not load DeepBox.toml ({}), using hardcoded defaults", e);
                Self::default_hardcoded()
            })
    }
}
