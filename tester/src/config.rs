use anyhow::{anyhow, Result};
use std::env;
use std::fs;
use std::str::FromStr;
use std::time::Duration;
use toml::Value;

pub const DEFAULT_URL: &str = "http://192.168.4.1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub url: String,
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            url: DEFAULT_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// File first, then URL / TESTER_TIMEOUT from the environment.
pub fn read_tester_config(config_path: &str) -> Result<Settings> {
    let mut settings = match fs::read_to_string(config_path) {
        Ok(s) => parse_settings(&s)?,
        Err(_) => {
            log::info!("File {} not found, using default settings", config_path);
            Settings::default()
        }
    };
    apply_env(
        &mut settings,
        env::var("URL").ok(),
        env::var("TESTER_TIMEOUT").ok(),
    );
    Ok(settings)
}

pub fn parse_settings(content: &str) -> Result<Settings> {
    let table = Value::from_str(content)
        .map_err(|e| anyhow!("tester config is not valid toml: {}", e))?;
    let mut settings = Settings::default();
    if let Some(url) = table.get("url") {
        let url = url
            .as_str()
            .ok_or_else(|| anyhow!("url must be a string"))?;
        settings.url = url.to_string();
    }
    if let Some(timeout) = table.get("timeout_secs") {
        let timeout = timeout
            .as_integer()
            .filter(|t| *t > 0)
            .ok_or_else(|| anyhow!("timeout_secs must be a positive integer"))?;
        settings.timeout_secs = timeout as u64;
    }
    Ok(settings)
}

fn apply_env(settings: &mut Settings, url: Option<String>, timeout: Option<String>) {
    if let Some(url) = url.filter(|u| !u.is_empty()) {
        settings.url = url;
    }
    if let Some(t) = timeout.and_then(|t| t.parse::<u64>().ok()) {
        if t > 0 {
            settings.timeout_secs = t;
        }
    }
}
