use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use common::config::{ConfigManager, FileContentConfigProvider, Validate, YamlConfigSerializer};
use common::tictactoe::{GameMode, SearchAlgorithm};
use serde::{Deserialize, Serialize};

const CONFIG_FILE_NAME: &str = "tictactoe_server_config.yaml";
const MAX_COMPUTER_DELAY_MS: u64 = 10_000;

pub fn default_config_path() -> PathBuf {
    if let Ok(exe_path) = std::env::current_exe()
        && let Some(exe_dir) = exe_path.parent()
    {
        return exe_dir.join(CONFIG_FILE_NAME);
    }
    PathBuf::from(CONFIG_FILE_NAME)
}

pub fn get_config_manager(
    path: Option<PathBuf>,
) -> ConfigManager<FileContentConfigProvider, ServerConfig, YamlConfigSerializer> {
    ConfigManager::from_yaml_file(path.unwrap_or_else(default_config_path))
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct WebConfig {
    pub bind_address: String,
    pub static_files_path: String,
}

impl WebConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        self.bind_address
            .parse()
            .map_err(|e| format!("Invalid bind address '{}': {}", self.bind_address, e))
    }
}

impl Validate for WebConfig {
    fn validate(&self) -> Result<(), String> {
        self.socket_addr()?;
        if self.static_files_path.is_empty() {
            return Err("static_files_path must not be empty".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct GameConfig {
    pub computer_delay_ms: u64,
    pub default_mode: GameMode,
    #[serde(default)]
    pub search: SearchAlgorithm,
}

impl GameConfig {
    pub fn computer_delay(&self) -> Duration {
        Duration::from_millis(self.computer_delay_ms)
    }
}

impl Validate for GameConfig {
    fn validate(&self) -> Result<(), String> {
        if self.computer_delay_ms > MAX_COMPUTER_DELAY_MS {
            return Err(format!(
                "computer_delay_ms must not exceed {}",
                MAX_COMPUTER_DELAY_MS
            ));
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            computer_delay_ms: 500,
            default_mode: GameMode::Computer,
            search: SearchAlgorithm::Minimax,
        }
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    pub web: WebConfig,
    pub game: GameConfig,
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), String> {
        self.web.validate()?;
        self.game.validate()?;
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            web: WebConfig {
                bind_address: "0.0.0.0:5000".to_string(),
                static_files_path: "web".to_string(),
            },
            game: GameConfig::default(),
        }
    }
}
