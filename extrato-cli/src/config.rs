use anyhow::{Context, Result};
use extrato_ingest::OcrSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::{ensure_extrato_home, resolve_in};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ocr: OcrSection,
    #[serde(default)]
    pub storage: StorageSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrSection {
    pub enabled: bool,
    /// Tesseract language code (default: "por")
    pub language: String,
    pub dpi: u32,
    pub pdftoppm_command: String,
    pub tesseract_command: String,
}

impl Default for OcrSection {
    fn default() -> Self {
        let s = OcrSettings::default();
        Self {
            enabled: s.enabled,
            language: s.language,
            dpi: s.dpi,
            pdftoppm_command: s.pdftoppm_command,
            tesseract_command: s.tesseract_command,
        }
    }
}

impl OcrSection {
    pub fn to_settings(&self) -> OcrSettings {
        OcrSettings {
            enabled: self.enabled,
            language: self.language.clone(),
            dpi: self.dpi,
            pdftoppm_command: self.pdftoppm_command.clone(),
            tesseract_command: self.tesseract_command.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    /// Relative to the state dir unless absolute.
    pub ledger_file: String,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            ledger_file: "ledger.json".to_string(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_extrato_home()?.join("config.toml"))
}

pub fn ledger_path(cfg: &Config) -> Result<PathBuf> {
    Ok(resolve_in(&ensure_extrato_home()?, &cfg.storage.ledger_file))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
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
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config_to(&Config::default(), &p)?;
    println!("Wrote {}", p.display());
    Ok(())
}

pub fn show_config() -> Result<()> {
    let p = config_path()?;
    let cfg = load_config_from(&p)?;
    let source = if p.exists() { "file" } else { "defaults" };
    println!("# {} ({})", p.display(), source);
    print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
    Ok(())
}
