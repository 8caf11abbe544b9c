use serde::{Deserialize, Serialize};
use std::fmt;

/// One row of a detected PDF table; missing cells are empty strings.
pub type RawRow = Vec<String>;

/// The three extraction strategies, most reliable first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    Table,
    TextLines,
    Ocr,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Table => "table",
            Strategy::TextLines => "text-lines",
            Strategy::Ocr => "ocr",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
