//! CLI configuration
//!
//! Profiles live in `~/.netdesk/config.toml` or `~/.netdesk/config.<profile>.toml`.
//! Flags and environment variables win over the file, the file wins over
//! built-in defaults.

use crate::output::OutputFormat;
use anyhow::{anyhow, bail, Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Keys accepted by `config set` / `config get`
pub const KEYS: [&str; 4] = ["api_url", "api_token", "default_format", "timeout_secs"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub api_url: Option<String>,
    pub api_token: Option<String>,
    pub default_format: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// `~/.netdesk`, home of config and session files.
pub fn netdesk_home() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow!("cannot find home directory"))?;
    Ok(home.join(".netdesk"))
}

impl Config {
    pub fn load_from(dir: &Path, profile: Option<&str>) -> Result<Self> {
        let path = Self::path_in(dir, profile);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn save_to(&self, dir: &Path, profile: Option<&str>) -> Result<PathBuf> {
        let path = Self::path_in(dir, profile);
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        fs::write(&path, toml::to_string_pretty(self)?)
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(path)
    }

    pub fn path_in(dir: &Path, profile: Option<&str>) -> PathBuf {
        let filename = match profile {
            Some(p) => format!("config.{p}.toml"),
            None => "config.toml".to_string(),
        };
        dir.join(filename)
    }

    /// Set one key, validating the value.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api_url" => {
                url::Url::parse(value).with_context(|| format!("invalid api_url: {value}"))?;
                self.api_url = Some(value.to_string());
            }
            "api_token" => self.api_token = Some(value.to_string()),
            "default_format" => {
                OutputFormat::from_str(value, true)
                    .map_err(|_| anyhow!("default_format must be table, json or yaml"))?;
                self.default_format = Some(value.to_ascii_lowercase());
            }
            "timeout_secs" => {
                let secs: u64 = value
                    .parse()
                    .with_context(|| format!("timeout_secs must be a number, got {value}"))?;
                if secs == 0 {
                    bail!("timeout_secs must be positive");
                }
                self.timeout_secs = Some(secs);
            }
            _ => bail!("unknown config key: {key} (expected one of {})", KEYS.join(", ")),
        }
        Ok(())
    }

    /// Display value for a key; tokens are masked.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value = match key {
            "api_url" => self.api_url.clone(),
            "api_token" => self.api_token.as_deref().map(mask),
            "default_format" => self.default_format.clone(),
            "timeout_secs" => self.timeout_secs.map(|s| s.to_string()),
            _ => bail!("unknown config key: {key}"),
        };
        Ok(value)
    }
}

fn mask(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    format!("{visible}****")
}

/// Effective settings after applying precedence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub api_token: Option<String>,
    pub format: OutputFormat,
    pub timeout: Duration,
}

impl Settings {
    pub fn resolve(
        config: &Config,
        api_url: Option<String>,
        api_token: Option<String>,
        format: Option<OutputFormat>,
    ) -> Result<Self> {
        let api_url = api_url
            .or_else(|| config.api_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        url::Url::parse(&api_url).with_context(|| format!("invalid API URL: {api_url}"))?;

        let format = match (format, config.default_format.as_deref()) {
            (Some(f), _) => f,
            (None, Some(name)) => OutputFormat::from_str(name, true)
                .map_err(|_| anyhow!("invalid default_format in config: {name}"))?,
            (None, None) => OutputFormat::Table,
        };

        Ok(Self {
            api_url,
            api_token: api_token.or_else(|| config.api_token.clone()),
            format,
            timeout: Duration::from_secs(config.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        })
    }
}
