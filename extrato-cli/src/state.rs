use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// `$EXTRATO_HOME`, or `~/.extrato`.
pub fn extrato_home() -> Result<PathBuf> {
    home_from(std::env::var("EXTRATO_HOME").ok(), std::env::var("HOME").ok())
}

fn home_from(override_dir: Option<String>, home: Option<String>) -> Result<PathBuf> {
    if let Some(dir) = override_dir.filter(|d| !d.trim().is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    match home {
        Some(home) if !home.is_empty() => Ok(PathBuf::from(home).join(".extrato")),
        _ => bail!("HOME is not set (or set EXTRATO_HOME)"),
    }
}

pub fn ensure_extrato_home() -> Result<PathBuf> {
    let dir = extrato_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// Relative paths are taken from the state dir; absolute ones are kept.
pub fn resolve_in(home: &Path, file: &str) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        home.join(p)
    }
}
