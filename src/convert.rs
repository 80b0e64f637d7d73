//! Conversion entry points.
//!
//! [`Converter`] is the long-lived service: it owns the Markdown renderer and
//! shares a [`BrowserSession`] across every job it runs. A host constructs
//! one at startup, calls [`Converter::convert`] per user request and
//! [`Converter::shutdown`] once on exit.
//!
//! [`convert`] and [`convert_sync`] are one-shot wrappers for scripts and
//! tests: they build a throwaway session, run a single job, and stop the
//! browser again.

use crate::browser::BrowserSession;
use crate::config::ConversionConfig;
use crate::error::Md2PdfError;
use crate::output::ConversionOutput;
use crate::pipeline::input::ConversionRequest;
use crate::pipeline::markdown::MarkdownRenderer;
use crate::pipeline::print;
use crate::progress::{ProgressCallback, Stage};
use crate::styles::DEFAULT_STYLESHEET;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// Runs conversions against a shared browser session.
pub struct Converter {
    renderer: MarkdownRenderer,
    session: Arc<BrowserSession>,
}

impl Converter {
    pub fn new(session: Arc<BrowserSession>) -> Self {
        Self {
            renderer: MarkdownRenderer::new(),
            session,
        }
    }

    /// Use a custom renderer, e.g. one with extra list-item rules.
    pub fn with_renderer(mut self, renderer: MarkdownRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn session(&self) -> &Arc<BrowserSession> {
        &self.session
    }

    /// Convert one Markdown file to PDF.
    ///
    /// Every failure is fatal to this job only; the browser session survives
    /// it. The progress callback, if any, sees the stages in order and then
    /// exactly one of `on_conversion_complete` / `on_conversion_error`.
    ///
    /// # Errors
    /// Input errors are raised before any browser work. After that, any
    /// session, load, print or write error from [`print::print_to_pdf`].
    pub async fn convert(
        &self,
        source: impl AsRef<Path>,
        config: &ConversionConfig,
    ) -> Result<ConversionOutput, Md2PdfError> {
        let source = source.as_ref();
        let started = Instant::now();
        let progress = config.progress_callback.as_ref();
        info!("Starting conversion: {}", source.display());

        if let Some(cb) = progress {
            cb.on_conversion_start(source);
        }

        let result = self.run(source, config, progress, started).await;

        match &result {
            Ok(out) => {
                info!(
                    "Conversion complete: {} ({} bytes, {}ms)",
                    out.pdf_path.display(),
                    out.bytes_written,
                    out.duration_ms
                );
                if let Some(cb) = progress {
                    cb.on_conversion_complete(&out.pdf_path, started.elapsed());
                }
            }
            Err(e) => {
                error!("Conversion of {} failed: {}", source.display(), e);
                if let Some(cb) = progress {
                    cb.on_conversion_error(&e.to_string());
                }
            }
        }
        result
    }

    async fn run(
        &self,
        source: &Path,
        config: &ConversionConfig,
        progress: Option<&ProgressCallback>,
        started: Instant,
    ) -> Result<ConversionOutput, Md2PdfError> {
        let stage = |s: Stage| {
            debug!("{}", s.label());
            if let Some(cb) = progress {
                cb.on_stage(s);
            }
        };

        // ── Step 1: Read ─────────────────────────────────────────────────
        stage(Stage::Reading);
        config.validate()?;
        let request = ConversionRequest::new(source, config)?;
        let markdown = request.read_source().await?;

        // ── Step 2: Render HTML ──────────────────────────────────────────
        stage(Stage::GeneratingHtml);
        let html = self.render(&request, &markdown, config);

        // ── Step 3: Print ────────────────────────────────────────────────
        stage(Stage::CreatingPdf);
        let bytes_written = print::print_to_pdf(
            &self.session,
            &html,
            &request.output,
            request.page_format,
            &request.margins,
        )
        .await?;

        stage(Stage::Done);
        Ok(ConversionOutput {
            pdf_path: request.output,
            bytes_written,
            duration_ms: started.elapsed().as_millis() as u64,
            open_after_conversion: request.open_after_conversion,
        })
    }

    /// Render the HTML document a conversion would print, without touching
    /// the browser.
    pub async fn render_html(
        &self,
        source: impl AsRef<Path>,
        config: &ConversionConfig,
    ) -> Result<String, Md2PdfError> {
        let request = ConversionRequest::new(source, config)?;
        let markdown = request.read_source().await?;
        Ok(self.render(&request, &markdown, config))
    }

    fn render(&self, request: &ConversionRequest, markdown: &str, config: &ConversionConfig) -> String {
        let stylesheet = config.stylesheet.as_deref().unwrap_or(DEFAULT_STYLESHEET);
        let html = self
            .renderer
            .render(markdown, &request.title, &request.base_dir, stylesheet);
        debug!("Rendered {} bytes of HTML", html.len());
        html
    }

    /// Stop the shared browser. Errors are logged, never returned.
    pub async fn shutdown(&self) {
        self.session.stop().await;
    }
}

/// Convert one file with a throwaway browser session.
///
/// # Example
/// ```rust,no_run
/// use markpress::{convert, ConversionConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = ConversionConfig::default();
///     let output = convert("README.md", &config).await?;
///     println!("wrote {}", output.pdf_path.display());
///     Ok(())
/// }
/// ```
pub async fn convert(
    source: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Md2PdfError> {
    let session = Arc::new(BrowserSession::chrome(config.chrome_path.clone()));
    let converter = Converter::new(session);
    let result = converter.convert(source, config).await;
    converter.shutdown().await;
    result
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(
    source: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Md2PdfError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Md2PdfError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert(source, config))
}
