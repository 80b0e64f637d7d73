//! Headless Chrome over the DevTools protocol (`headless_chrome`).
//!
//! Every call in this module blocks on a DevTools round trip.

use super::{Engine, Launcher, PdfOptions, PrintPage};
use crate::error::Md2PdfError;
use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::ffi::OsStr;
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tempfile::NamedTempFile;
use tracing::{debug, trace};
use url::Url;

/// Flags for running inside containers and CI without a GPU or a large /dev/shm.
const LAUNCH_ARGS: [&str; 4] = [
    "--no-sandbox",
    "--disable-setuid-sandbox",
    "--disable-gpu",
    "--disable-dev-shm-usage",
];

/// The session decides when the browser goes away, not the transport's
/// idle timer. A browser left idle past this is treated as disconnected and
/// relaunched on next use.
const IDLE_BROWSER_TIMEOUT: Duration = Duration::from_secs(24 * 60 * 60);

/// How often the load-idle probe runs.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// How long the page must stay idle before it counts as loaded.
const QUIET_WINDOW: Duration = Duration::from_millis(500);

/// True once the document has parsed and every image has settled.
const IDLE_PROBE: &str = "document.readyState === 'complete' && \
    Array.from(document.images).every(function (img) { return img.complete; })";

// ── Launcher ─────────────────────────────────────────────────────────────

/// Starts headless Chrome with the sandbox disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromeLauncher;

impl Launcher for ChromeLauncher {
    fn launch(&self, executable: &Path) -> Result<Arc<dyn Engine>, Md2PdfError> {
        let failed = |reason: String| Md2PdfError::LaunchFailed {
            executable: executable.to_path_buf(),
            reason,
        };

        let options = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(false)
            .path(Some(executable.to_path_buf()))
            .args(LAUNCH_ARGS.iter().map(|arg| OsStr::new(*arg)).collect())
            .idle_browser_timeout(IDLE_BROWSER_TIMEOUT)
            .build()
            .map_err(|e| failed(e.to_string()))?;

        let browser = Browser::new(options).map_err(|e| failed(e.to_string()))?;
        debug!("Chrome started (pid {:?})", browser.get_process_id());

        Ok(Arc::new(ChromeEngine {
            browser: Mutex::new(Some(browser)),
        }))
    }
}

// ── Engine ───────────────────────────────────────────────────────────────

/// A launched Chrome process. Dropping the inner [`Browser`] kills it.
pub struct ChromeEngine {
    browser: Mutex<Option<Browser>>,
}

impl ChromeEngine {
    fn browser(&self) -> Option<Browser> {
        self.browser.lock().ok().and_then(|guard| guard.clone())
    }
}

impl Engine for ChromeEngine {
    fn is_connected(&self) -> bool {
        self.browser().is_some_and(|b| b.get_version().is_ok())
    }

    fn process_id(&self) -> Option<u32> {
        self.browser().and_then(|b| b.get_process_id())
    }

    fn new_page(&self) -> Result<Box<dyn PrintPage>, Md2PdfError> {
        let browser = self.browser().ok_or_else(|| Md2PdfError::PageFailed {
            reason: "browser has been closed".into(),
        })?;
        let tab = browser.new_tab().map_err(|e| Md2PdfError::PageFailed {
            reason: e.to_string(),
        })?;
        Ok(Box::new(ChromePage {
            tab,
            document: None,
        }))
    }

    fn close(&self) -> Result<(), Md2PdfError> {
        let taken = self
            .browser
            .lock()
            .map_err(|_| Md2PdfError::Internal("browser handle lock poisoned".into()))?
            .take();
        drop(taken);
        Ok(())
    }
}

// ── Page ─────────────────────────────────────────────────────────────────

/// One tab plus the temp file its document was loaded from.
///
/// The document goes through a `file://` URL rather than a `data:` URL so
/// the page may reference local images.
pub struct ChromePage {
    tab: Arc<Tab>,
    document: Option<NamedTempFile>,
}

impl ChromePage {
    fn write_document(html: &str) -> Result<NamedTempFile, Md2PdfError> {
        let load_failed = |e: std::io::Error| Md2PdfError::LoadFailed {
            reason: format!("could not stage document: {}", e),
        };
        let mut file = tempfile::Builder::new()
            .prefix("markpress-")
            .suffix(".html")
            .tempfile()
            .map_err(load_failed)?;
        file.write_all(html.as_bytes()).map_err(load_failed)?;
        file.flush().map_err(load_failed)?;
        Ok(file)
    }

    fn is_idle(&self) -> bool {
        self.tab
            .evaluate(IDLE_PROBE, false)
            .ok()
            .and_then(|obj| obj.value)
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }
}

impl PrintPage for ChromePage {
    fn load_html(&mut self, html: &str, timeout: Duration) -> Result<(), Md2PdfError> {
        let started = Instant::now();
        let deadline = started + timeout;
        let timed_out = || Md2PdfError::LoadTimeout {
            secs: timeout.as_secs(),
        };

        let file = Self::write_document(html)?;
        let url = Url::from_file_path(file.path()).map_err(|()| Md2PdfError::LoadFailed {
            reason: format!("not an absolute path: {}", file.path().display()),
        })?;
        self.document = Some(file);

        self.tab.set_default_timeout(timeout);
        self.tab
            .navigate_to(url.as_str())
            .map_err(|e| Md2PdfError::LoadFailed {
                reason: e.to_string(),
            })?;
        self.tab.wait_until_navigated().map_err(|e| {
            if Instant::now() >= deadline {
                timed_out()
            } else {
                Md2PdfError::LoadFailed {
                    reason: e.to_string(),
                }
            }
        })?;

        let mut quiet_since: Option<Instant> = None;
        loop {
            let now = Instant::now();
            if self.is_idle() {
                let since = *quiet_since.get_or_insert(now);
                if now.duration_since(since) >= QUIET_WINDOW {
                    trace!("Document idle after {:?}", started.elapsed());
                    return Ok(());
                }
            } else {
                quiet_since = None;
            }

            if now >= deadline {
                return Err(timed_out());
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    }

    fn print_to_pdf(&mut self, options: &PdfOptions) -> Result<Vec<u8>, Md2PdfError> {
        let print = PrintToPdfOptions {
            landscape: Some(false),
            display_header_footer: Some(false),
            print_background: Some(true),
            paper_width: Some(options.paper_width),
            paper_height: Some(options.paper_height),
            margin_top: Some(options.margin_top),
            margin_right: Some(options.margin_right),
            margin_bottom: Some(options.margin_bottom),
            margin_left: Some(options.margin_left),
            prefer_css_page_size: Some(true),
            ..Default::default()
        };

        self.tab
            .print_to_pdf(Some(print))
            .map_err(|e| Md2PdfError::PrintFailed {
                reason: e.to_string(),
            })
    }

    fn close(self: Box<Self>) -> Result<(), Md2PdfError> {
        let ChromePage { tab, document } = *self;
        let closed = tab
            .close(false)
            .map(|_| ())
            .map_err(|e| Md2PdfError::PageFailed {
                reason: e.to_string(),
            });
        // The staged document outlives the tab that loaded it.
        drop(document);
        closed
    }
}
