//! OCR fallback for scanned statements.
//!
//! Pages are rasterized with `pdftoppm` into a scratch directory and each
//! image is read back with `tesseract`. Both programs must be on `PATH`;
//! availability is checked once when the capability is resolved.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;
use tracing::{debug, info};

use crate::error::{IngestError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrSettings {
    pub enabled: bool,
    /// Tesseract language code.
    pub language: String,
    pub dpi: u32,
    pub pdftoppm_command: String,
    pub tesseract_command: String,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            language: "por".to_string(),
            dpi: 300,
            pdftoppm_command: "pdftoppm".to_string(),
            tesseract_command: "tesseract".to_string(),
        }
    }
}

/// Whether OCR can run on this machine, resolved once per process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OcrCapability {
    Available(OcrEngine),
    Unavailable { reason: String },
}

impl OcrCapability {
    pub fn detect(settings: &OcrSettings) -> Self {
        if !settings.enabled {
            return Self::unavailable("disabled in configuration");
        }
        let pdftoppm = match which::which(&settings.pdftoppm_command) {
            Ok(p) => p,
            Err(_) => {
                return Self::unavailable(format!("{} not found on PATH", settings.pdftoppm_command));
            }
        };
        let tesseract = match which::which(&settings.tesseract_command) {
            Ok(p) => p,
            Err(_) => {
                return Self::unavailable(format!("{} not found on PATH", settings.tesseract_command));
            }
        };

        info!(pdftoppm = %pdftoppm.display(), tesseract = %tesseract.display(), "OCR available");
        Self::Available(OcrEngine {
            pdftoppm,
            tesseract,
            language: settings.language.clone(),
            dpi: settings.dpi,
        })
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable { reason: reason.into() }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}

/// Resolved OCR toolchain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrEngine {
    pdftoppm: PathBuf,
    tesseract: PathBuf,
    language: String,
    dpi: u32,
}

impl OcrEngine {
    /// Recognize every page and return its text lines in page order.
    pub fn extract_lines(&self, bytes: &[u8]) -> Result<Vec<String>> {
        let scratch = TempDir::new()?;
        let pdf_path = scratch.path().join("statement.pdf");
        fs::write(&pdf_path, bytes)?;

        let images = self.rasterize(&pdf_path, scratch.path())?;
        debug!(pages = images.len(), dpi = self.dpi, "rasterized statement");

        let mut lines = Vec::new();
        for image in &images {
            let text = self.recognize(image)?;
            lines.extend(text.lines().map(str::to_string));
        }
        Ok(lines)
    }

    fn rasterize(&self, pdf_path: &Path, out_dir: &Path) -> Result<Vec<PathBuf>> {
        let output = Command::new(&self.pdftoppm)
            .arg("-png")
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg(pdf_path)
            .arg(out_dir.join("page"))
            .output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(IngestError::tool("pdftoppm", stderr.trim()));
        }

        let mut images: Vec<PathBuf> = fs::read_dir(out_dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "png"))
            .collect();
        // pdftoppm zero-pads page numbers, so name order is page order.
        images.sort();

        if images.is_empty() {
            return Err(IngestError::tool("pdftoppm", "no page images produced"));
        }
        Ok(images)
    }

    fn recognize(&self, image: &Path) -> Result<String> {
        let output = Command::new(&self.tesseract)
            .arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(IngestError::tool("tesseract", stderr.trim()));
        }
        Ok(String::from_utf8_lossy(&output.stdout).replace('\u{0000}', ""))
    }
}
