//! HTML → PDF through the shared browser session.
//!
//! One print job opens its own page, loads the document, prints it and
//! closes the page again, whatever happened in between. The browser itself
//! is left running for the next job; only [`BrowserSession::stop`] ends it.

use crate::browser::{BrowserSession, Engine, PdfOptions};
use crate::config::{Margins, PageFormat};
use crate::error::Md2PdfError;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Upper bound on waiting for a document to go network-idle.
pub const LOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Print `html` to a PDF at `output`.
///
/// Creates the output's parent directory if needed. Returns the number of
/// bytes written.
///
/// # Errors
/// - Session errors from [`BrowserSession::get_or_start`]
/// - [`Md2PdfError::InvalidMargin`] if a margin does not parse
/// - [`Md2PdfError::LoadTimeout`] / [`Md2PdfError::LoadFailed`] from loading
/// - [`Md2PdfError::PrintFailed`] / [`Md2PdfError::PageFailed`] from the page
/// - [`Md2PdfError::OutputWriteFailed`] if the file cannot be written
pub async fn print_to_pdf(
    session: &BrowserSession,
    html: &str,
    output: &Path,
    format: PageFormat,
    margins: &Margins,
) -> Result<u64, Md2PdfError> {
    let options = PdfOptions::new(format, margins)?;
    let engine = session.get_or_start().await?;

    let html = html.to_string();
    let pdf = tokio::task::spawn_blocking(move || print_blocking(engine, &html, &options))
        .await
        .map_err(|e| Md2PdfError::Internal(format!("Print task panicked: {}", e)))??;

    write_output(output, &pdf).await?;
    info!("Wrote {} ({} bytes)", output.display(), pdf.len());
    Ok(pdf.len() as u64)
}

/// Open a page, load, print, and always close the page.
fn print_blocking(
    engine: Arc<dyn Engine>,
    html: &str,
    options: &PdfOptions,
) -> Result<Vec<u8>, Md2PdfError> {
    let mut page = engine.new_page()?;

    let result = page
        .load_html(html, LOAD_TIMEOUT)
        .and_then(|()| page.print_to_pdf(options));

    if let Err(e) = page.close() {
        warn!("Failed to close print page: {}", e);
    }

    let pdf = result?;
    debug!("Printed {} bytes", pdf.len());
    Ok(pdf)
}

async fn write_output(path: &Path, pdf: &[u8]) -> Result<(), Md2PdfError> {
    let write_failed = |source| Md2PdfError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(write_failed)?;
    }
    tokio::fs::write(path, pdf).await.map_err(write_failed)
}
