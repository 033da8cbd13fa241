use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::{default_store_path, ensure_taskline_home, taskline_home};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreSection,
    pub shell: ShellSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    /// Task store file. Defaults to ~/.taskline/tasks.json
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellSection {
    /// Persist right after a delete in the interactive shell.
    /// Off by default: the menu only saves after add/update and on exit.
    pub save_after_delete: bool,
}

impl Config {
    /// `--store` flag wins over the config file, which wins over the default.
    pub fn resolve_store_path(&self, flag: Option<PathBuf>) -> Result<PathBuf> {
        match flag.or_else(|| self.store.path.clone()) {
            Some(p) => Ok(p),
            None => default_store_path(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(taskline_home()?.join("config.toml"))
}

/// Read config.toml without creating anything. Without HOME there is no
/// config file, so defaults apply; the store path then has to come from --store.
pub fn load_config() -> Result<Config> {
    match taskline_home() {
        Ok(home) => load_config_in(&home),
        Err(e) => {
            tracing::debug!("no config home: {e:#}");
            Ok(Config::default())
        }
    }
}

pub fn load_config_in(home: &Path) -> Result<Config> {
    load_config_from(&home.join("config.toml"))
}

pub fn load_config_from(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config_to(cfg: &Config, p: &Path) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = ensure_taskline_home()?.join("config.toml");
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config_to(&Config::default(), &p)?;
    println!("Wrote {}", p.display());
    Ok(())
}
