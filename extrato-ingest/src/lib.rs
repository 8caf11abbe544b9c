//! extrato-ingest: bank-statement PDF extraction (table, text-line and OCR strategies) and the fallback pipeline.

pub mod batch;
pub mod error;
pub mod layout;
pub mod ocr;
pub mod parsers;
pub mod pipeline;
pub mod table_extractor;
pub mod text_extractor;
pub mod types;

pub use batch::{ingest_batch, ingest_paths, BatchReport, DocumentOutcome, DocumentReport, StatementFile};
pub use error::IngestError;
pub use ocr::{OcrCapability, OcrEngine, OcrSettings};
pub use parsers::{parse_table_rows, parse_text_lines};
pub use pipeline::{
    AttemptOutcome, AttemptRecord, AttemptStatus, ExtractionAttempt, OcrAttempt, Pipeline,
    PipelineReport, TableAttempt, TextLineAttempt,
};
pub use table_extractor::extract_table_rows;
pub use text_extractor::extract_text_lines;
pub use types::{RawRow, Strategy};
