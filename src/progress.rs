//! Progress-callback trait for conversion stage events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events as a job moves through its stages. A host editor forwards them to
//! its notification surface; the CLI drives a terminal progress bar.
//!
//! Stages always arrive in the same order and their increments add up to 100,
//! so a callback can feed them straight into a percentage bar:
//!
//! | Stage | Label | Increment |
//! |-------|-------|-----------|
//! | [`Stage::Reading`] | `Reading file…` | 20 |
//! | [`Stage::GeneratingHtml`] | `Generating HTML…` | 30 |
//! | [`Stage::CreatingPdf`] | `Creating PDF…` | 30 |
//! | [`Stage::Done`] | `Done!` | 20 |
//!
//! # Example
//!
//! ```rust
//! use markpress::{ConversionProgressCallback, ConversionConfig, Stage};
//! use std::sync::{Arc, atomic::{AtomicU32, Ordering}};
//!
//! struct Percent(AtomicU32);
//!
//! impl ConversionProgressCallback for Percent {
//!     fn on_stage(&self, stage: Stage) {
//!         let now = self.0.fetch_add(stage.increment(), Ordering::SeqCst) + stage.increment();
//!         eprintln!("{now:>3}% {}", stage.label());
//!     }
//! }
//!
//! let config = ConversionConfig::builder()
//!     .progress_callback(Arc::new(Percent(AtomicU32::new(0))))
//!     .build()
//!     .unwrap();
//! ```

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Pipeline stages reported to [`ConversionProgressCallback::on_stage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Reading,
    GeneratingHtml,
    CreatingPdf,
    Done,
}

impl Stage {
    /// Human-readable label shown next to the progress indicator.
    pub fn label(self) -> &'static str {
        match self {
            Stage::Reading => "Reading file…",
            Stage::GeneratingHtml => "Generating HTML…",
            Stage::CreatingPdf => "Creating PDF…",
            Stage::Done => "Done!",
        }
    }

    /// Percentage points this stage adds when it begins.
    pub fn increment(self) -> u32 {
        match self {
            Stage::Reading => 20,
            Stage::GeneratingHtml => 30,
            Stage::CreatingPdf => 30,
            Stage::Done => 20,
        }
    }
}

/// Called by the conversion pipeline as a job progresses.
///
/// Implementations must be `Send + Sync`: the callback lives in a shared
/// config and may be invoked from whichever runtime thread is driving the
/// job. All methods have default no-op implementations so callers only
/// override what they care about.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once, before the source file is touched.
    fn on_conversion_start(&self, source: &Path) {
        let _ = source;
    }

    /// Called as each stage begins.
    fn on_stage(&self, stage: Stage) {
        let _ = stage;
    }

    /// Called once the PDF has been written.
    ///
    /// # Arguments
    /// * `output`  — path of the written PDF
    /// * `elapsed` — wall-clock time since `on_conversion_start`
    fn on_conversion_complete(&self, output: &Path, elapsed: Duration) {
        let _ = (output, elapsed);
    }

    /// Called once when the job fails, with the user-facing message.
    fn on_conversion_error(&self, error: &str) {
        let _ = error;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;
