use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use finz_store::Ledger;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Owner label for the single-user CLI ledger.
pub const LOCAL_OWNER: &str = "local";

pub fn finz_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".finz"))
}

pub fn ensure_finz_home() -> Result<PathBuf> {
    let dir = finz_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Profile {
    pub created_at_utc: Option<String>,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_timezone() -> String {
    "America/Sao_Paulo".to_string()
}

fn default_currency() -> String {
    "BRL".to_string()
}

impl Profile {
    /// Today's date in the profile timezone; transactions recorded without
    /// an explicit date are stamped with this.
    pub fn today(&self) -> NaiveDate {
        match self.timezone.parse::<Tz>() {
            Ok(tz) => Utc::now().with_timezone(&tz).date_naive(),
            Err(_) => Utc::now().date_naive(),
        }
    }
}

pub fn profile_path() -> Result<PathBuf> {
    Ok(ensure_finz_home()?.join("profile.json"))
}

pub fn write_profile(profile: &Profile) -> Result<()> {
    let p = profile_path()?;
    let json = serde_json::to_string_pretty(profile)?;
    fs::write(&p, json).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn read_profile() -> Result<Profile> {
    let p = profile_path()?;
    if !p.exists() {
        return Ok(Profile {
            created_at_utc: None,
            timezone: default_timezone(),
            currency: default_currency(),
        });
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    Ok(serde_json::from_str(&s)?)
}

pub fn ledger_path() -> Result<PathBuf> {
    Ok(ensure_finz_home()?.join("ledger.json"))
}

pub fn load_ledger() -> Result<Ledger> {
    let p = ledger_path()?;
    if !p.exists() {
        return Ok(Ledger::new(LOCAL_OWNER));
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    Ok(serde_json::from_str(&s)?)
}

pub fn save_ledger(ledger: &Ledger) -> Result<()> {
    let p = ledger_path()?;
    let json = serde_json::to_string_pretty(ledger)?;
    fs::write(&p, json).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}
