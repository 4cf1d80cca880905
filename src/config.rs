use crate::callrecord::history::DEFAULT_HISTORY_LIMIT;
use anyhow::Result;
use clap::Parser;
use serde::Deserialize;

#[derive(Parser, Debug)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file; defaults apply when omitted.
    #[clap(long)]
    pub conf: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default = "default_http_addr")]
    pub http_addr: String,
    pub log_level: Option<String>,
    pub log_file: Option<String>,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    #[serde(default = "default_static_path")]
    pub static_path: String,
}

fn default_http_addr() -> String {
    "0.0.0.0:5000".to_string()
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

fn default_static_path() -> String {
    "static".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_addr: default_http_addr(),
            log_level: None,
            log_file: None,
            history_limit: default_history_limit(),
            static_path: default_static_path(),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Config> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }
}
