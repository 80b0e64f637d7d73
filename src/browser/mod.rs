//! Headless browser ownership and the seams around it.
//!
//! The print stage needs three things from a browser: open a page, load a
//! document into it, print it. Those are the [`Engine`] and [`PrintPage`]
//! traits. Getting an engine in the first place is split in two: an
//! [`ExecutableLocator`] finds a binary, a [`Launcher`] starts it. The
//! production implementations live in [`chrome`]; tests substitute fakes.
//!
//! [`BrowserSession`] owns at most one live engine and hands it out to every
//! conversion until it is stopped or the engine disconnects.
//!
//! Every trait method here is blocking. Async callers go through
//! `tokio::task::spawn_blocking`.

pub mod chrome;
mod session;

pub use session::{BrowserSession, SessionState};

use crate::config::{Margins, PageFormat};
use crate::error::Md2PdfError;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

// ── Traits ───────────────────────────────────────────────────────────────

/// A running headless browser.
pub trait Engine: Send + Sync {
    /// Whether the browser process still answers.
    fn is_connected(&self) -> bool;

    /// OS process id, when known.
    fn process_id(&self) -> Option<u32>;

    /// Open a fresh page (tab).
    fn new_page(&self) -> Result<Box<dyn PrintPage>, Md2PdfError>;

    /// Shut the browser down. Further calls are no-ops.
    fn close(&self) -> Result<(), Md2PdfError>;
}

/// One page opened on an [`Engine`], used for a single print job.
pub trait PrintPage: Send {
    /// Load `html` and wait until the page is network-idle.
    ///
    /// # Errors
    /// - [`Md2PdfError::LoadTimeout`] if the page is still busy after `timeout`
    /// - [`Md2PdfError::LoadFailed`] if navigation fails outright
    fn load_html(&mut self, html: &str, timeout: Duration) -> Result<(), Md2PdfError>;

    /// Print the loaded document.
    fn print_to_pdf(&mut self, options: &PdfOptions) -> Result<Vec<u8>, Md2PdfError>;

    /// Close the page and release anything it holds.
    fn close(self: Box<Self>) -> Result<(), Md2PdfError>;
}

/// Starts a browser from a located executable.
pub trait Launcher: Send + Sync {
    fn launch(&self, executable: &Path) -> Result<Arc<dyn Engine>, Md2PdfError>;
}

/// Finds the browser executable to launch.
///
/// `Ok(None)` means nothing was found; an `Err` means an explicit override
/// was given and is unusable.
pub trait ExecutableLocator: Send + Sync {
    fn locate(&self) -> Result<Option<PathBuf>, Md2PdfError>;
}

/// Looks in the usual install locations for this OS, then on `PATH`.
///
/// An explicit `override_path` wins, then `CHROME_PATH`.
#[derive(Debug, Clone, Default)]
pub struct SystemLocator {
    pub override_path: Option<PathBuf>,
}

impl SystemLocator {
    pub fn new(override_path: Option<PathBuf>) -> Self {
        Self { override_path }
    }
}

impl ExecutableLocator for SystemLocator {
    fn locate(&self) -> Result<Option<PathBuf>, Md2PdfError> {
        Ok(browser_locate::locate_with_override(
            self.override_path.as_deref(),
        )?)
    }
}

// ── Print options ────────────────────────────────────────────────────────

/// Paper size and margins for one print job, all in inches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdfOptions {
    pub paper_width: f64,
    pub paper_height: f64,
    pub margin_top: f64,
    pub margin_right: f64,
    pub margin_bottom: f64,
    pub margin_left: f64,
}

impl PdfOptions {
    /// Resolve a paper format and CSS margin strings.
    ///
    /// # Errors
    /// [`Md2PdfError::InvalidMargin`] if any margin does not parse.
    pub fn new(format: PageFormat, margins: &Margins) -> Result<Self, Md2PdfError> {
        let (paper_width, paper_height) = format.size_inches();
        let (margin_top, margin_right, margin_bottom, margin_left) = margins.to_inches()?;
        Ok(Self {
            paper_width,
            paper_height,
            margin_top,
            margin_right,
            margin_bottom,
            margin_left,
        })
    }
}
