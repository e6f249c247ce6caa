//! Config commands

use crate::ConfigCommands;
use anyhow::Result;
use netdesk::config::{Config, KEYS};
use netdesk::output;
use std::path::Path;
use std::process::ExitCode;

pub fn handle(action: ConfigCommands, home: &Path, profile: Option<&str>) -> Result<ExitCode> {
    match action {
        ConfigCommands::Init => {
            let path = Config::default().save_to(home, profile)?;
            output::success(&format!("Configuration initialized at {}", path.display()));
        }
        ConfigCommands::Set { key, value } => {
            let mut config = Config::load_from(home, profile)?;
            config.set(&key, &value)?;
            config.save_to(home, profile)?;
            output::success(&format!("Set {key}"));
        }
        ConfigCommands::Get { key } => {
            let config = Config::load_from(home, profile)?;
            let value = config.get(&key)?;
            println!("{}: {}", key, value.unwrap_or_else(|| "(not set)".into()));
        }
        ConfigCommands::List => {
            let config = Config::load_from(home, profile)?;
            for key in KEYS {
                let value = config.get(key)?;
                println!("{}: {}", key, value.unwrap_or_else(|| "(not set)".into()));
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
