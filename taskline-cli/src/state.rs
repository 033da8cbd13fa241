use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

pub fn taskline_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".taskline"))
}

pub fn ensure_taskline_home() -> Result<PathBuf> {
    let dir = taskline_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn default_store_path() -> Result<PathBuf> {
    Ok(ensure_taskline_home()?.join("tasks.json"))
}
