use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::state::ensure_finz_home;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub chat: ChatSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSection {
    /// Turns kept per chat session before the oldest are dropped
    pub max_history_turns: usize,
    /// Idle minutes before a chat session is evicted
    pub session_ttl_minutes: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chat: ChatSection {
                max_history_turns: 20,
                session_ttl_minutes: 30,
            },
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_finz_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    Ok(toml::from_str(&s).context("parse config.toml")?)
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}
