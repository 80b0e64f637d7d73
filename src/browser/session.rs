//! The process-wide browser session.
//!
//! ## Lifecycle
//!
//! ```text
//!            get_or_start                      stop
//!  Absent ───────────────▶ Launching ──▶ Ready ─────▶ Absent
//!    ▲                         │           │
//!    │        launch error     │           │ process died
//!    └─────────────────────────┘           ▼
//!                                    Disconnected ──get_or_start──▶ Launching
//! ```
//!
//! The slot mutex is held from the liveness check through the launch, so
//! concurrent first callers share one launch instead of racing to start two
//! browsers. Nothing here retries: a failed launch leaves the slot empty and
//! the next caller tries again from scratch.

use super::{chrome::ChromeLauncher, Engine, ExecutableLocator, Launcher, SystemLocator};
use crate::error::Md2PdfError;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Observable state of a [`BrowserSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No browser has been started, or it was stopped.
    Absent,
    /// A launch is in progress.
    Launching,
    /// A browser is running and answering.
    Ready,
    /// A browser handle is held but the process no longer answers.
    Disconnected,
}

/// Owns at most one headless browser and shares it across conversions.
pub struct BrowserSession {
    slot: Mutex<Option<Arc<dyn Engine>>>,
    launching: AtomicBool,
    launcher: Arc<dyn Launcher>,
    locator: Arc<dyn ExecutableLocator>,
}

impl BrowserSession {
    pub fn new(launcher: Arc<dyn Launcher>, locator: Arc<dyn ExecutableLocator>) -> Self {
        Self {
            slot: Mutex::new(None),
            launching: AtomicBool::new(false),
            launcher,
            locator,
        }
    }

    /// A session that launches headless Chrome found on this system.
    ///
    /// `chrome_path` overrides discovery when set.
    pub fn chrome(chrome_path: Option<PathBuf>) -> Self {
        Self::new(
            Arc::new(ChromeLauncher::default()),
            Arc::new(SystemLocator::new(chrome_path)),
        )
    }

    /// Launch the browser ahead of the first conversion.
    pub async fn start(&self) -> Result<(), Md2PdfError> {
        self.get_or_start().await.map(|_| ())
    }

    /// Return the live engine, launching one if there is none or the held one
    /// has disconnected.
    ///
    /// # Errors
    /// - [`Md2PdfError::BrowserNotFound`] if no executable can be located
    /// - [`Md2PdfError::BrowserOverrideMissing`] if an override names a missing file
    /// - [`Md2PdfError::LaunchFailed`] if the executable would not start
    pub async fn get_or_start(&self) -> Result<Arc<dyn Engine>, Md2PdfError> {
        let mut slot = self.slot.lock().await;

        if let Some(engine) = slot.as_ref() {
            let probe = Arc::clone(engine);
            if blocking(move || Ok(probe.is_connected())).await? {
                debug!("Reusing browser (pid {:?})", engine.process_id());
                return Ok(Arc::clone(engine));
            }

            warn!("Browser disconnected; relaunching");
            if let Some(stale) = slot.take() {
                if let Err(e) = blocking(move || stale.close()).await {
                    debug!("Closing disconnected browser failed: {}", e);
                }
            }
        }

        let locator = Arc::clone(&self.locator);
        let executable = blocking(move || locator.locate())
            .await?
            .ok_or(Md2PdfError::BrowserNotFound)?;

        info!("Launching headless browser: {}", executable.display());
        self.launching.store(true, Ordering::SeqCst);
        let launcher = Arc::clone(&self.launcher);
        let launched = blocking(move || launcher.launch(&executable)).await;
        self.launching.store(false, Ordering::SeqCst);

        let engine = launched?;
        info!("Browser ready (pid {:?})", engine.process_id());
        *slot = Some(Arc::clone(&engine));
        Ok(engine)
    }

    /// Close the browser if one is held. Safe to call repeatedly.
    ///
    /// Close errors are logged, never returned; the slot is empty afterwards
    /// either way.
    pub async fn stop(&self) {
        let Some(engine) = self.slot.lock().await.take() else {
            debug!("Browser session already stopped");
            return;
        };

        let pid = engine.process_id();
        match blocking(move || engine.close()).await {
            Ok(()) => info!("Browser closed (pid {:?})", pid),
            Err(e) => warn!("Error closing browser (pid {:?}): {}", pid, e),
        }
    }

    /// Current state. Probes the held engine's liveness.
    pub async fn state(&self) -> SessionState {
        if self.launching.load(Ordering::SeqCst) {
            return SessionState::Launching;
        }

        let engine = match self.slot.lock().await.as_ref() {
            Some(engine) => Arc::clone(engine),
            None => return SessionState::Absent,
        };

        match blocking(move || Ok(engine.is_connected())).await {
            Ok(true) => SessionState::Ready,
            _ => SessionState::Disconnected,
        }
    }
}

impl std::fmt::Debug for BrowserSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrowserSession")
            .field("launching", &self.launching.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Run blocking browser work off the async workers.
async fn blocking<T, F>(f: F) -> Result<T, Md2PdfError>
where
    F: FnOnce() -> Result<T, Md2PdfError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Md2PdfError::Internal(format!("Browser task panicked: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::{PdfOptions, PrintPage};
    use std::path::Path;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    struct DeadPage;

    impl PrintPage for DeadPage {
        fn load_html(&mut self, _: &str, _: Duration) -> Result<(), Md2PdfError> {
            Ok(())
        }
        fn print_to_pdf(&mut self, _: &PdfOptions) -> Result<Vec<u8>, Md2PdfError> {
            Ok(Vec::new())
        }
        fn close(self: Box<Self>) -> Result<(), Md2PdfError> {
            Ok(())
        }
    }

    struct StubEngine {
        alive: AtomicBool,
        fail_close: bool,
        closes: AtomicUsize,
    }

    impl Engine for StubEngine {
        fn is_connected(&self) -> bool {
            self.alive.load(Ordering::SeqCst)
        }
        fn process_id(&self) -> Option<u32> {
            Some(42)
        }
        fn new_page(&self) -> Result<Box<dyn PrintPage>, Md2PdfError> {
            Ok(Box::new(DeadPage))
        }
        fn close(&self) -> Result<(), Md2PdfError> {
            self.closes.fetch_add(1, Ordering::SeqCst);
            self.alive.store(false, Ordering::SeqCst);
            if self.fail_close {
                Err(Md2PdfError::Internal("already gone".into()))
            } else {
                Ok(())
            }
        }
    }

    struct StubLauncher {
        engine: Arc<StubEngine>,
        launches: AtomicUsize,
    }

    impl Launcher for StubLauncher {
        fn launch(&self, _: &Path) -> Result<Arc<dyn Engine>, Md2PdfError> {
            self.launches.fetch_add(1, Ordering::SeqCst);
            self.engine.alive.store(true, Ordering::SeqCst);
            Ok(self.engine.clone())
        }
    }

    struct Fixed(Option<PathBuf>);

    impl ExecutableLocator for Fixed {
        fn locate(&self) -> Result<Option<PathBuf>, Md2PdfError> {
            Ok(self.0.clone())
        }
    }

    fn session(fail_close: bool) -> (BrowserSession, Arc<StubLauncher>) {
        let launcher = Arc::new(StubLauncher {
            engine: Arc::new(StubEngine {
                alive: AtomicBool::new(false),
                fail_close,
                closes: AtomicUsize::new(0),
            }),
            launches: AtomicUsize::new(0),
        });
        let s = BrowserSession::new(
            launcher.clone(),
            Arc::new(Fixed(Some(PathBuf::from("/bin/fake-chrome")))),
        );
        (s, launcher)
    }

    #[tokio::test]
    async fn state_follows_lifecycle() {
        let (s, launcher) = session(false);
        assert_eq!(s.state().await, SessionState::Absent);

        s.start().await.unwrap();
        assert_eq!(s.state().await, SessionState::Ready);

        launcher.engine.alive.store(false, Ordering::SeqCst);
        assert_eq!(s.state().await, SessionState::Disconnected);

        s.stop().await;
        assert_eq!(s.state().await, SessionState::Absent);
    }

    #[tokio::test]
    async fn stop_is_idempotent_and_swallows_close_errors() {
        let (s, launcher) = session(true);
        s.start().await.unwrap();
        s.stop().await;
        s.stop().await;
        assert_eq!(launcher.engine.closes.load(Ordering::SeqCst), 1);
        assert_eq!(s.state().await, SessionState::Absent);
    }

    #[tokio::test]
    async fn nothing_located_is_browser_not_found() {
        let s = BrowserSession::new(
            Arc::new(StubLauncher {
                engine: Arc::new(StubEngine {
                    alive: AtomicBool::new(false),
                    fail_close: false,
                    closes: AtomicUsize::new(0),
                }),
                launches: AtomicUsize::new(0),
            }),
            Arc::new(Fixed(None)),
        );
        let err = s.get_or_start().await.err().unwrap();
        assert!(matches!(err, Md2PdfError::BrowserNotFound));
        assert_eq!(s.state().await, SessionState::Absent);
    }
}
