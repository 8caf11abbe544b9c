//! Batch import of statement files.
//!
//! Each document is processed on its own: a file that cannot be read, is
//! not a PDF or blows up the pipeline gets its own outcome and the rest of
//! the batch carries on.

use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use extrato_core::Transaction;
use tracing::{info, warn};

use crate::pipeline::{panic_message, AttemptRecord, Pipeline};
use crate::types::Strategy;

/// An uploaded statement: display name plus raw bytes.
#[derive(Debug, Clone)]
pub struct StatementFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl StatementFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { name: name.into(), bytes }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DocumentOutcome {
    Imported {
        transactions: Vec<Transaction>,
        strategy: Strategy,
    },
    NoTransactions {
        attempts: Vec<AttemptRecord>,
    },
    /// Not a PDF by name; never handed to the pipeline.
    Skipped,
    Failed {
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentReport {
    pub name: String,
    pub outcome: DocumentOutcome,
}

#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub documents: Vec<DocumentReport>,
}

impl BatchReport {
    /// All imported transactions, in document order.
    pub fn transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.documents.iter().flat_map(|doc| match &doc.outcome {
            DocumentOutcome::Imported { transactions, .. } => transactions.as_slice(),
            _ => &[][..],
        })
    }

    pub fn imported_count(&self) -> usize {
        self.transactions().count()
    }
}

pub fn is_pdf_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

fn ingest_one(pipeline: &Pipeline, file: &StatementFile) -> DocumentOutcome {
    if !is_pdf_name(&file.name) {
        warn!(file = %file.name, "skipping non-PDF file");
        return DocumentOutcome::Skipped;
    }

    let report = match panic::catch_unwind(AssertUnwindSafe(|| pipeline.run(&file.bytes))) {
        Ok(report) => report,
        Err(payload) => {
            let error = panic_message(payload);
            warn!(file = %file.name, %error, "pipeline panicked");
            return DocumentOutcome::Failed { error };
        }
    };

    match report.strategy {
        Some(strategy) => {
            info!(file = %file.name, %strategy, transactions = report.transactions.len(), "imported");
            DocumentOutcome::Imported { transactions: report.transactions, strategy }
        }
        None => {
            warn!(file = %file.name, "no transactions found");
            DocumentOutcome::NoTransactions { attempts: report.attempts }
        }
    }
}

/// Run the pipeline over every file, sequentially.
pub fn ingest_batch(pipeline: &Pipeline, files: &[StatementFile]) -> BatchReport {
    let documents = files
        .iter()
        .map(|file| DocumentReport {
            name: file.name.clone(),
            outcome: ingest_one(pipeline, file),
        })
        .collect();
    BatchReport { documents }
}

/// Read and ingest files from disk; unreadable files become `Failed`.
pub fn ingest_paths(pipeline: &Pipeline, paths: &[PathBuf]) -> BatchReport {
    let documents = paths
        .iter()
        .map(|path| {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());

            let outcome = if !is_pdf_name(&name) {
                warn!(file = %name, "skipping non-PDF file");
                DocumentOutcome::Skipped
            } else {
                match fs::read(path) {
                    Ok(bytes) => ingest_one(pipeline, &StatementFile::new(name.clone(), bytes)),
                    Err(e) => {
                        warn!(file = %path.display(), error = %e, "could not read file");
                        DocumentOutcome::Failed { error: format!("read {}: {e}", path.display()) }
                    }
                }
            };
            DocumentReport { name, outcome }
        })
        .collect();
    BatchReport { documents }
}
