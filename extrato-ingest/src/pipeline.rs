//! Ordered fallback over the extraction strategies.
//!
//! Attempts run in order until one produces transactions. Errors and
//! panics inside an attempt are recorded and treated as an empty result,
//! so a single bad document never aborts the caller.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use extrato_core::Transaction;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{IngestError, Result};
use crate::ocr::OcrCapability;
use crate::parsers::{parse_table_rows, parse_text_lines};
use crate::table_extractor::extract_table_rows;
use crate::text_extractor::extract_text_lines;
use crate::types::Strategy;

/// What one attempt found.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    Transactions(Vec<Transaction>),
    Empty,
    /// The strategy cannot run here (e.g. OCR tools missing).
    Unsupported { reason: String },
}

impl AttemptOutcome {
    fn from_transactions(txns: Vec<Transaction>) -> Self {
        if txns.is_empty() {
            AttemptOutcome::Empty
        } else {
            AttemptOutcome::Transactions(txns)
        }
    }
}

/// One extraction strategy: PDF bytes in, transactions out.
pub trait ExtractionAttempt {
    fn strategy(&self) -> Strategy;
    fn attempt(&self, bytes: &[u8]) -> Result<AttemptOutcome>;
}

/// Table extraction followed by header-driven row parsing.
pub struct TableAttempt;

impl ExtractionAttempt for TableAttempt {
    fn strategy(&self) -> Strategy {
        Strategy::Table
    }

    fn attempt(&self, bytes: &[u8]) -> Result<AttemptOutcome> {
        let rows = extract_table_rows(bytes)?;
        debug!(rows = rows.len(), "table rows extracted");
        Ok(AttemptOutcome::from_transactions(parse_table_rows(&rows)))
    }
}

/// Text-layer extraction followed by line parsing.
pub struct TextLineAttempt;

impl ExtractionAttempt for TextLineAttempt {
    fn strategy(&self) -> Strategy {
        Strategy::TextLines
    }

    fn attempt(&self, bytes: &[u8]) -> Result<AttemptOutcome> {
        let lines = extract_text_lines(bytes)?;
        debug!(lines = lines.len(), "text lines extracted");
        Ok(AttemptOutcome::from_transactions(parse_text_lines(&lines)))
    }
}

/// OCR followed by line parsing.
pub struct OcrAttempt {
    capability: OcrCapability,
}

impl OcrAttempt {
    pub fn new(capability: OcrCapability) -> Self {
        Self { capability }
    }
}

impl ExtractionAttempt for OcrAttempt {
    fn strategy(&self) -> Strategy {
        Strategy::Ocr
    }

    fn attempt(&self, bytes: &[u8]) -> Result<AttemptOutcome> {
        match &self.capability {
            OcrCapability::Unavailable { reason } => Ok(AttemptOutcome::Unsupported {
                reason: reason.clone(),
            }),
            OcrCapability::Available(engine) => {
                let lines = engine.extract_lines(bytes)?;
                debug!(lines = lines.len(), "OCR lines recognized");
                Ok(AttemptOutcome::from_transactions(parse_text_lines(&lines)))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum AttemptStatus {
    Produced(usize),
    Empty,
    Unsupported(String),
    Failed(String),
}

impl std::fmt::Display for AttemptStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttemptStatus::Produced(n) => write!(f, "produced {n}"),
            AttemptStatus::Empty => f.write_str("empty"),
            AttemptStatus::Unsupported(reason) => write!(f, "unsupported ({reason})"),
            AttemptStatus::Failed(message) => write!(f, "failed: {message}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptRecord {
    pub strategy: Strategy,
    pub status: AttemptStatus,
}

/// Result of running the pipeline over one document.
#[derive(Debug, Clone, Default)]
pub struct PipelineReport {
    pub transactions: Vec<Transaction>,
    /// Strategy that produced the transactions, if any did.
    pub strategy: Option<Strategy>,
    pub attempts: Vec<AttemptRecord>,
}

impl PipelineReport {
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

pub struct Pipeline {
    attempts: Vec<Box<dyn ExtractionAttempt>>,
}

impl Pipeline {
    pub fn new(attempts: Vec<Box<dyn ExtractionAttempt>>) -> Self {
        Self { attempts }
    }

    /// Table, then text lines, then OCR.
    pub fn standard(ocr: OcrCapability) -> Self {
        Self::new(vec![
            Box::new(TableAttempt),
            Box::new(TextLineAttempt),
            Box::new(OcrAttempt::new(ocr)),
        ])
    }

    pub fn strategies(&self) -> Vec<Strategy> {
        self.attempts.iter().map(|a| a.strategy()).collect()
    }

    pub fn run(&self, bytes: &[u8]) -> PipelineReport {
        let mut report = PipelineReport::default();

        for attempt in &self.attempts {
            let strategy = attempt.strategy();
            let result = panic::catch_unwind(AssertUnwindSafe(|| attempt.attempt(bytes)))
                .unwrap_or_else(|payload| Err(IngestError::Panicked(panic_message(payload))));

            let status = match result {
                Ok(AttemptOutcome::Transactions(txns)) => {
                    let status = AttemptStatus::Produced(txns.len());
                    info!(%strategy, transactions = txns.len(), "extraction succeeded");
                    report.transactions = txns;
                    report.strategy = Some(strategy);
                    status
                }
                Ok(AttemptOutcome::Empty) => {
                    debug!(%strategy, "no transactions");
                    AttemptStatus::Empty
                }
                Ok(AttemptOutcome::Unsupported { reason }) => {
                    debug!(%strategy, %reason, "strategy unsupported");
                    AttemptStatus::Unsupported(reason)
                }
                Err(e) => {
                    warn!(%strategy, error = %e, "extraction attempt failed");
                    AttemptStatus::Failed(e.to_string())
                }
            };
            report.attempts.push(AttemptRecord { strategy, status });

            if report.strategy.is_some() {
                break;
            }
        }

        report
    }
}

pub(crate) fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
