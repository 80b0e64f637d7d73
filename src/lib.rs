//! # markpress
//!
//! Convert Markdown documents to paginated PDF by rendering them to styled
//! HTML and printing that HTML through a shared headless Chromium.
//!
//! ## Why a browser?
//!
//! Layout engines written for PDF output rarely agree with what people see in
//! their Markdown preview. Printing through Chrome gives the same CSS
//! pagination, fonts and image handling a browser preview would, and the
//! DevTools print call takes paper size and margins directly.
//!
//! ## Pipeline Overview
//!
//! ```text
//! notes.md
//!  │
//!  ├─ 1. Input    validate the path; derive output, title, base dir
//!  ├─ 2. Render   Markdown → HTML (highlighted code, task lists, autolinks,
//!  │              absolute image paths, inlined stylesheet)
//!  ├─ 3. Browser  get or launch the shared headless Chrome (spawn_blocking)
//!  ├─ 4. Print    fresh page → load → wait for idle → print → close page
//!  └─ 5. Output   notes.pdf written; browser kept for the next job
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use markpress::{BrowserSession, ConversionConfig, Converter, PageFormat};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // One session for the life of the process; CHROME_PATH is honoured.
//!     let converter = Converter::new(Arc::new(BrowserSession::chrome(None)));
//!
//!     let config = ConversionConfig::builder()
//!         .page_format(PageFormat::Letter)
//!         .margin_all("0.75in")
//!         .build()?;
//!
//!     for doc in ["intro.md", "guide.md"] {
//!         let output = converter.convert(doc, &config).await?;
//!         eprintln!("{} ({} bytes)", output.pdf_path.display(), output.bytes_written);
//!     }
//!
//!     converter.shutdown().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `md2pdf` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! markpress = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod browser;
pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod styles;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use browser::{BrowserSession, SessionState};
pub use config::{ConversionConfig, ConversionConfigBuilder, Length, LengthUnit, Margins, PageFormat};
pub use convert::{convert, convert_sync, Converter};
pub use error::{ErrorKind, Md2PdfError};
pub use output::ConversionOutput;
pub use pipeline::markdown::MarkdownRenderer;
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback, Stage};
