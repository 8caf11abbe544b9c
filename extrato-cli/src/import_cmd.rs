use anyhow::Result;
use extrato_finance::Ledger;
use extrato_ingest::{ingest_paths, DocumentOutcome, OcrCapability, Pipeline};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::config::{ledger_path, Config};

pub fn run(cfg: &Config, files: &[PathBuf], no_ocr: bool) -> Result<()> {
    let mut settings = cfg.ocr.to_settings();
    if no_ocr {
        settings.enabled = false;
    }
    let ocr = OcrCapability::detect(&settings);
    if let OcrCapability::Unavailable { reason } = &ocr {
        info!(%reason, "OCR fallback unavailable");
    }

    let pipeline = Pipeline::standard(ocr);
    debug!(strategies = ?pipeline.strategies(), "extraction order");
    let report = ingest_paths(&pipeline, files);

    for doc in &report.documents {
        match &doc.outcome {
            DocumentOutcome::Imported { transactions, strategy } => {
                println!("{}: {} transactions ({})", doc.name, transactions.len(), strategy);
            }
            DocumentOutcome::NoTransactions { attempts } => {
                println!("{}: no transactions found", doc.name);
                for a in attempts {
                    println!("  {}: {}", a.strategy, a.status);
                }
            }
            DocumentOutcome::Skipped => println!("{}: skipped (not a PDF)", doc.name),
            DocumentOutcome::Failed { error } => println!("{}: failed: {}", doc.name, error),
        }
    }

    let imported = report.imported_count();
    if imported == 0 {
        println!("\nNothing imported.");
        return Ok(());
    }

    let path = ledger_path(cfg)?;
    let mut ledger = Ledger::load(&path)?;
    let stored = ledger.record(report.transactions().cloned());
    ledger.save(&path)?;

    println!("\nImported {} transactions into {}", stored, path.display());
    Ok(())
}
