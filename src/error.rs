//! Error types for the markpress library.
//!
//! Every failure in a conversion is fatal to that conversion: there is no
//! partial PDF worth keeping. A single enum, [`Md2PdfError`], carries them all,
//! and [`Md2PdfError::kind`] folds the variants into the coarse classes a host
//! cares about when deciding what to tell the user:
//!
//! * [`ErrorKind::Input`] — the source file is missing, unreadable, or not
//!   Markdown. Raised before any browser work begins.
//! * [`ErrorKind::Environment`] — no usable browser executable on this host.
//! * [`ErrorKind::Launch`] — an executable was found but would not start.
//! * [`ErrorKind::LoadTimeout`] — the page never went network-idle.
//! * [`ErrorKind::Print`] — opening the page, printing, or writing the file failed.
//!
//! Nothing in the core retries. A fresh conversion is the only retry path and
//! it re-acquires the browser from scratch.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the markpress library.
#[derive(Debug, Error)]
pub enum Md2PdfError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Source file was not found at the given path.
    #[error("Markdown file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The path exists but does not name a `.md` file.
    #[error("'{path}' is not a Markdown (.md) file")]
    NotMarkdown { path: PathBuf },

    /// The file could be opened but not read as UTF-8 text.
    #[error("Failed to read '{path}': {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    // ── Environment errors ────────────────────────────────────────────────
    /// No Chromium-family browser could be located.
    #[error(
        "Chrome, Chromium, or Edge not found.\n\n\
Please install one of these browsers to convert Markdown to PDF, or point\n\
CHROME_PATH (or --chrome-path) at an existing Chromium-based executable."
    )]
    BrowserNotFound,

    /// An explicit executable override names a file that does not exist.
    #[error("Browser executable '{path}' (from {origin}) does not exist")]
    BrowserOverrideMissing { path: PathBuf, origin: &'static str },

    // ── Launch errors ─────────────────────────────────────────────────────
    /// The located executable failed to start as a headless browser.
    #[error("Failed to launch browser '{executable}': {reason}")]
    LaunchFailed { executable: PathBuf, reason: String },

    // ── Load errors ───────────────────────────────────────────────────────
    /// The document did not reach network-idle within the fixed bound.
    #[error("Page did not finish loading within {secs}s\nCheck for remote images or stylesheets that never respond.")]
    LoadTimeout { secs: u64 },

    /// Navigation to the rendered document failed outright.
    #[error("Failed to load document into the browser: {reason}")]
    LoadFailed { reason: String },

    // ── Print errors ──────────────────────────────────────────────────────
    /// Opening or closing a browser page failed.
    #[error("Browser page error: {reason}")]
    PageFailed { reason: String },

    /// The print-to-PDF operation failed.
    #[error("Failed to print PDF: {reason}")]
    PrintFailed { reason: String },

    /// A margin is not a valid CSS length.
    #[error("Invalid margin '{value}': expected a number with unit px, in, cm or mm (e.g. 15mm)")]
    InvalidMargin { value: String },

    /// Could not create or write the output PDF file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse classification of [`Md2PdfError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Input,
    Environment,
    Launch,
    LoadTimeout,
    Print,
    Config,
    Internal,
}

impl Md2PdfError {
    /// Which class of failure this is.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FileNotFound { .. }
            | Self::PermissionDenied { .. }
            | Self::NotMarkdown { .. }
            | Self::ReadFailed { .. } => ErrorKind::Input,
            Self::BrowserNotFound | Self::BrowserOverrideMissing { .. } => ErrorKind::Environment,
            Self::LaunchFailed { .. } => ErrorKind::Launch,
            Self::LoadTimeout { .. } => ErrorKind::LoadTimeout,
            Self::LoadFailed { .. }
            | Self::PageFailed { .. }
            | Self::PrintFailed { .. }
            | Self::InvalidMargin { .. }
            | Self::OutputWriteFailed { .. } => ErrorKind::Print,
            Self::InvalidConfig(_) => ErrorKind::Config,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl From<browser_locate::LocateError> for Md2PdfError {
    fn from(e: browser_locate::LocateError) -> Self {
        match e {
            browser_locate::LocateError::OverrideMissing { path, origin } => {
                Self::BrowserOverrideMissing { path, origin }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn browser_not_found_names_alternatives() {
        let msg = Md2PdfError::BrowserNotFound.to_string();
        assert!(msg.contains("Chrome"), "got: {msg}");
        assert!(msg.contains("Chromium"), "got: {msg}");
        assert!(msg.contains("Edge"), "got: {msg}");
        assert_eq!(Md2PdfError::BrowserNotFound.kind(), ErrorKind::Environment);
    }

    #[test]
    fn load_timeout_display() {
        let e = Md2PdfError::LoadTimeout { secs: 30 };
        assert!(e.to_string().contains("30s"));
        assert_eq!(e.kind(), ErrorKind::LoadTimeout);
    }

    #[test]
    fn launch_failed_carries_reason() {
        let e = Md2PdfError::LaunchFailed {
            executable: PathBuf::from("/usr/bin/chromium"),
            reason: "exit status 127".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("/usr/bin/chromium"), "got: {msg}");
        assert!(msg.contains("exit status 127"), "got: {msg}");
        assert_eq!(e.kind(), ErrorKind::Launch);
    }

    #[test]
    fn write_failure_is_a_print_error() {
        let e = Md2PdfError::OutputWriteFailed {
            path: PathBuf::from("/ro/out.pdf"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        };
        assert_eq!(e.kind(), ErrorKind::Print);
        assert!(e.to_string().contains("read-only"));
    }

    #[test]
    fn locate_override_converts_to_environment_error() {
        let e: Md2PdfError = browser_locate::LocateError::OverrideMissing {
            path: PathBuf::from("/opt/chrome"),
            origin: "CHROME_PATH",
        }
        .into();
        assert_eq!(e.kind(), ErrorKind::Environment);
        assert!(e.to_string().contains("CHROME_PATH"));
    }
}
