//! CLI binary for markpress.
//!
//! A thin shim over the library crate that maps CLI flags (and an optional
//! host settings file) to `ConversionConfig`, drives one conversion through a
//! `Converter`, and opens the result.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use markpress::{
    BrowserSession, ConversionConfig, ConversionOutput, ConversionProgressCallback, Converter,
    Margins, PageFormat, ProgressCallback, Stage,
};
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress: a 0–100 bar advanced by each stage's increment, with
/// the stage label as its message.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(100);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:32.green/238}] {pos:>3}%  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(style);
        bar.set_prefix("Markdown → PDF");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, source: &Path) {
        self.bar.set_message(source.display().to_string());
    }

    fn on_stage(&self, stage: Stage) {
        self.bar.inc(u64::from(stage.increment()));
        self.bar.set_message(stage.label());
    }

    fn on_conversion_complete(&self, output: &Path, elapsed: Duration) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} PDF created in {}  →  {}",
            green("✔"),
            dim(&format!("{:.1}s", elapsed.as_secs_f64())),
            bold(&output.display().to_string()),
        );
    }

    fn on_conversion_error(&self, error: &str) {
        self.bar.abandon();
        eprintln!("{} {}", red("✘"), red(error));
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert next to the source (README.pdf)
  md2pdf README.md

  # Letter paper, one-inch margins, don't open the result
  md2pdf --format letter --margin 1in --no-open notes.md

  # Write somewhere else with a custom stylesheet
  md2pdf report.md -o build/report.pdf --stylesheet print.css

  # Inspect the HTML that would be printed
  md2pdf --html-only report.md -o report.html

  # Reuse an editor's settings block
  md2pdf --config settings.json notes.md

SETTINGS FILE (--config):
  {
    "pageFormat": "A4",
    "margins": { "top": "15mm", "right": "15mm", "bottom": "15mm", "left": "15mm" },
    "openAfterConversion": true
  }
  Command-line flags override values from the file.

BROWSER:
  A Chromium-family browser (Chrome, Chromium, Edge or Brave) must be
  installed. It is found in the usual install locations or on PATH; set
  CHROME_PATH or --chrome-path to use a specific executable.

ENVIRONMENT VARIABLES:
  CHROME_PATH         Browser executable to launch
  RUST_LOG            Log filter (overrides -v / -q)
"#;

/// Convert Markdown files to PDF through a headless browser.
#[derive(Parser, Debug)]
#[command(
    name = "md2pdf",
    version,
    about = "Convert Markdown files to PDF through a headless browser",
    long_about = "Render a Markdown file to styled HTML (syntax-highlighted code, task lists, \
local images) and print it to PDF with headless Chrome, Chromium or Edge.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Markdown file to convert (.md).
    input: PathBuf,

    /// Write the PDF (or HTML with --html-only) here instead of next to the input.
    #[arg(short, long, env = "MD2PDF_OUTPUT")]
    output: Option<PathBuf>,

    /// Paper size.
    #[arg(long, env = "MD2PDF_FORMAT", value_enum)]
    format: Option<FormatArg>,

    /// Margin on all four sides (e.g. 15mm, 0.5in, 2cm, 40px).
    #[arg(long, env = "MD2PDF_MARGIN")]
    margin: Option<String>,

    /// Top margin; overrides --margin.
    #[arg(long, env = "MD2PDF_MARGIN_TOP")]
    margin_top: Option<String>,

    /// Right margin; overrides --margin.
    #[arg(long, env = "MD2PDF_MARGIN_RIGHT")]
    margin_right: Option<String>,

    /// Bottom margin; overrides --margin.
    #[arg(long, env = "MD2PDF_MARGIN_BOTTOM")]
    margin_bottom: Option<String>,

    /// Left margin; overrides --margin.
    #[arg(long, env = "MD2PDF_MARGIN_LEFT")]
    margin_left: Option<String>,

    /// JSON settings file (pageFormat, margins, openAfterConversion).
    #[arg(long, env = "MD2PDF_CONFIG")]
    config: Option<PathBuf>,

    /// CSS file to use instead of the built-in stylesheet.
    #[arg(long, env = "MD2PDF_STYLESHEET")]
    stylesheet: Option<PathBuf>,

    /// Browser executable to launch.
    #[arg(long, env = "CHROME_PATH")]
    chrome_path: Option<PathBuf>,

    /// Don't open the PDF after conversion.
    #[arg(long, env = "MD2PDF_NO_OPEN")]
    no_open: bool,

    /// Write the rendered HTML document instead of printing a PDF.
    #[arg(long, env = "MD2PDF_HTML_ONLY")]
    html_only: bool,

    /// Print the conversion result as JSON on stdout.
    #[arg(long, env = "MD2PDF_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "MD2PDF_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "MD2PDF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "MD2PDF_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    A4,
    Letter,
    Legal,
    A3,
    A5,
}

impl From<FormatArg> for PageFormat {
    fn from(v: FormatArg) -> Self {
        match v {
            FormatArg::A4 => PageFormat::A4,
            FormatArg::Letter => PageFormat::Letter,
            FormatArg::Legal => PageFormat::Legal,
            FormatArg::A3 => PageFormat::A3,
            FormatArg::A5 => PageFormat::A5,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.html_only;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb).await?;

    let session = Arc::new(BrowserSession::chrome(config.chrome_path.clone()));
    let converter = Converter::new(session);

    // ── Run ──────────────────────────────────────────────────────────────
    let result = if cli.html_only {
        write_html(&cli, &converter, &config).await
    } else {
        write_pdf(&cli, &converter, &config).await
    };

    converter.shutdown().await;
    result
}

async fn write_pdf(cli: &Cli, converter: &Converter, config: &ConversionConfig) -> Result<()> {
    let output = converter
        .convert(&cli.input, config)
        .await
        .with_context(|| format!("Failed to convert {}", cli.input.display()))?;

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else if !cli.quiet && config.progress_callback.is_none() {
        eprintln!(
            "{} {}  {}",
            green("✔"),
            bold(&output.pdf_path.display().to_string()),
            dim(&format!("{} bytes, {}ms", output.bytes_written, output.duration_ms)),
        );
    }

    if output.open_after_conversion {
        open_result(&output);
    }
    Ok(())
}

async fn write_html(cli: &Cli, converter: &Converter, config: &ConversionConfig) -> Result<()> {
    let html = converter
        .render_html(&cli.input, config)
        .await
        .with_context(|| format!("Failed to render {}", cli.input.display()))?;

    let path = cli
        .output
        .clone()
        .unwrap_or_else(|| cli.input.with_extension("html"));
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    tokio::fs::write(&path, &html)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    if !cli.quiet {
        eprintln!("{} {}", green("✔"), bold(&path.display().to_string()));
    }
    Ok(())
}

/// Map the settings file and CLI args to `ConversionConfig`.
///
/// Precedence: flag > settings file > default.
async fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let mut config = match cli.config {
        Some(ref path) => {
            let raw = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read settings from {:?}", path))?;
            serde_json::from_str::<ConversionConfig>(&raw)
                .with_context(|| format!("Invalid settings file {:?}", path))?
        }
        None => ConversionConfig::default(),
    };

    if let Some(format) = cli.format {
        config.page_format = format.into();
    }
    config.margins = merge_margins(&config.margins, cli);

    if let Some(ref path) = cli.stylesheet {
        config.stylesheet = Some(
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read stylesheet from {:?}", path))?,
        );
    }
    if cli.chrome_path.is_some() {
        config.chrome_path = cli.chrome_path.clone();
    }
    if !cli.html_only && cli.output.is_some() {
        config.output = cli.output.clone();
    }
    if cli.no_open {
        config.open_after_conversion = false;
    }
    config.progress_callback = progress;

    config.validate().context("Invalid configuration")?;
    debug!("Effective config: {:?}", config);
    Ok(config)
}

/// Apply `--margin` then the per-side flags on top of `base`.
fn merge_margins(base: &Margins, cli: &Cli) -> Margins {
    let mut margins = match cli.margin {
        Some(ref all) => Margins::uniform(all.clone()),
        None => base.clone(),
    };
    let sides = [
        (&mut margins.top, &cli.margin_top),
        (&mut margins.right, &cli.margin_right),
        (&mut margins.bottom, &cli.margin_bottom),
        (&mut margins.left, &cli.margin_left),
    ];
    for (side, flag) in sides {
        if let Some(v) = flag {
            *side = v.clone();
        }
    }
    margins
}

/// Hand the PDF to the platform's default viewer. Failures are only logged.
fn open_result(output: &ConversionOutput) {
    let path = output.pdf_path.as_os_str();
    let mut cmd = if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", ""]);
        c
    } else {
        Command::new("xdg-open")
    };
    cmd.arg(path);

    match cmd.spawn() {
        Ok(_) => debug!("Opened {}", output.pdf_path.display()),
        Err(e) => warn!("Could not open {}: {}", output.pdf_path.display(), e),
    }
}
