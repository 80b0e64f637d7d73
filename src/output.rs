//! Result of a successful conversion.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What a finished conversion produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// Path of the written PDF.
    pub pdf_path: PathBuf,
    /// Size of the PDF in bytes.
    pub bytes_written: u64,
    /// Wall-clock time for the whole job, in milliseconds.
    pub duration_ms: u64,
    /// Carried from the config; the host decides whether to open the file.
    pub open_after_conversion: bool,
}
