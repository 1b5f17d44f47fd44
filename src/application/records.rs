//! Record file formats.
//!
//! JSON files hold a top-level array of records. TOML files hold an array of
//! tables named `records`:
//!
//! ```toml
//! [[records]]
//! id = 1
//! parent_id = 0
//! name = "Overview"
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::MenuRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    Json,
    Toml,
}

impl RecordFormat {
    /// Detect the format from the file extension.
    pub fn from_path(path: &Path) -> ApplicationResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Self::Toml),
            _ => Err(ApplicationError::UnknownFormat(path.to_path_buf())),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TomlRecords {
    #[serde(default)]
    records: Vec<MenuRecord>,
}

/// Parse `content` in `format`; `path` is only used for error messages.
pub fn parse_records(
    content: &str,
    format: RecordFormat,
    path: &Path,
) -> ApplicationResult<Vec<MenuRecord>> {
    let parse_err = |message: String| ApplicationError::Parse {
        path: path.to_path_buf(),
        message,
    };
    match format {
        RecordFormat::Json => serde_json::from_str(content).map_err(|e| parse_err(e.to_string())),
        RecordFormat::Toml => toml::from_str::<TomlRecords>(content)
            .map(|file| file.records)
            .map_err(|e| parse_err(e.to_string())),
    }
}
