use thiserror::Error;

/// Failure of a single extraction attempt.
///
/// The pipeline records these and moves on to the next strategy; they
/// never reach the caller of [`crate::Pipeline::run`].
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("PDF parsing error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("PDF text extraction error: {0}")]
    Text(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{tool} failed: {message}")]
    Tool { tool: String, message: String },

    #[error("extraction library panicked: {0}")]
    Panicked(String),
}

impl IngestError {
    pub(crate) fn tool(tool: &str, message: impl Into<String>) -> Self {
        IngestError::Tool {
            tool: tool.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
