//! # browser-locate
//!
//! Find an installed Chromium-family browser binary so a headless session can
//! be launched without asking the user where Chrome lives.
//!
//! ## How it works
//!
//! [`locate`] searches, in order:
//!
//! 1. A fixed list of well-known install locations for the current platform
//!    (Chrome, Chrome Canary, Chromium, Edge, Brave). The first path that
//!    exists on disk wins.
//! 2. On non-Windows platforms only, the shell's command resolution for
//!    `google-chrome`, `chromium` and `chrome` (via the `which` crate). The
//!    first name that resolves to an existing file wins.
//!
//! Nothing is downloaded and no network access happens. When nothing is
//! found, [`locate`] returns `None`; turning that into a user-facing error is
//! the caller's job.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use browser_locate::{locate, locate_with_override};
//!
//! // Plain search of the well-known locations and $PATH.
//! if let Some(chrome) = locate() {
//!     println!("found {}", chrome.display());
//! }
//!
//! // Honour an explicit path first, then $CHROME_PATH, then the search.
//! let chrome = locate_with_override(None).expect("override points nowhere");
//! ```
//!
//! ## Platform support
//!
//! | OS      | Searched locations                                           |
//! |---------|--------------------------------------------------------------|
//! | macOS   | `/Applications/*.app/Contents/MacOS/*`                       |
//! | Windows | `Program Files`, `Program Files (x86)`, `%LOCALAPPDATA%`     |
//! | Linux   | `/usr/bin`, `/snap/bin`, then `$PATH`                        |
//!
//! ## Environment variable overrides
//!
//! - `CHROME_PATH` — path to a browser executable; skips the search.

use std::path::{Path, PathBuf};

use thiserror::Error;

// ── Public constants ─────────────────────────────────────────────────────────

/// Environment variable naming an explicit browser executable.
pub const CHROME_PATH_ENV: &str = "CHROME_PATH";

/// Command names tried through shell resolution on non-Windows platforms.
pub const COMMAND_NAMES: &[&str] = &["google-chrome", "chromium", "chrome"];

// ── Error type ───────────────────────────────────────────────────────────────

/// Errors returned when an explicit override cannot be honoured.
///
/// The plain search never fails; it returns `None` instead.
#[derive(Error, Debug)]
pub enum LocateError {
    /// An override was given but no file exists at that path.
    #[error("Browser executable '{path}' (from {origin}) does not exist")]
    OverrideMissing { path: PathBuf, origin: &'static str },
}

// ── Internal: platform metadata ──────────────────────────────────────────────

const MACOS_PATHS: &[&str] = &[
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Google Chrome Canary.app/Contents/MacOS/Google Chrome Canary",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
    "/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge",
    "/Applications/Brave Browser.app/Contents/MacOS/Brave Browser",
];

const WINDOWS_PATHS: &[&str] = &[
    r"C:\Program Files\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files\Microsoft\Edge\Application\msedge.exe",
    r"C:\Program Files (x86)\Microsoft\Edge\Application\msedge.exe",
    r"C:\Program Files\BraveSoftware\Brave-Browser\Application\brave.exe",
];

const LINUX_PATHS: &[&str] = &[
    "/usr/bin/google-chrome",
    "/usr/bin/google-chrome-stable",
    "/usr/bin/chromium",
    "/usr/bin/chromium-browser",
    "/snap/bin/chromium",
    "/usr/bin/microsoft-edge",
    "/usr/bin/brave-browser",
];

/// Per-user Chrome install below `%LOCALAPPDATA%`.
const WINDOWS_USER_CHROME: &str = r"Google\Chrome\Application\chrome.exe";

// ── Public API ───────────────────────────────────────────────────────────────

/// Well-known install locations for the current platform, in search order.
///
/// Unknown platforms get the Linux list.
pub fn candidate_paths() -> Vec<PathBuf> {
    match std::env::consts::OS {
        "macos" => MACOS_PATHS.iter().map(PathBuf::from).collect(),
        "windows" => {
            let mut paths: Vec<PathBuf> = WINDOWS_PATHS.iter().map(PathBuf::from).collect();
            // The per-user install sits after the machine-wide Chrome entries.
            if let Some(local) = dirs::data_local_dir() {
                paths.insert(2, local.join(WINDOWS_USER_CHROME));
            }
            paths
        }
        _ => LINUX_PATHS.iter().map(PathBuf::from).collect(),
    }
}

/// Find a Chromium-family browser executable.
///
/// Returns the first well-known location that exists, then (outside Windows)
/// the first of [`COMMAND_NAMES`] that the shell resolves to an existing file.
pub fn locate() -> Option<PathBuf> {
    if let Some(found) = candidate_paths().into_iter().find(|p| p.is_file()) {
        return Some(found);
    }

    if cfg!(windows) {
        return None;
    }
    resolve_command()
}

/// Like [`locate`], but an explicit path or `$CHROME_PATH` takes precedence.
///
/// An override that names a missing file is reported as
/// [`LocateError::OverrideMissing`] rather than silently ignored, so a typo in
/// configuration does not end up launching some other browser.
pub fn locate_with_override(explicit: Option<&Path>) -> Result<Option<PathBuf>, LocateError> {
    if let Some(path) = explicit {
        return verify(path, "configuration").map(Some);
    }

    if let Some(env_path) = std::env::var_os(CHROME_PATH_ENV).filter(|v| !v.is_empty()) {
        return verify(Path::new(&env_path), CHROME_PATH_ENV).map(Some);
    }

    Ok(locate())
}

// ── Internal helpers ─────────────────────────────────────────────────────────

fn verify(path: &Path, origin: &'static str) -> Result<PathBuf, LocateError> {
    if path.is_file() {
        Ok(path.to_path_buf())
    } else {
        Err(LocateError::OverrideMissing {
            path: path.to_path_buf(),
            origin,
        })
    }
}

fn resolve_command() -> Option<PathBuf> {
    COMMAND_NAMES
        .iter()
        .filter_map(|name| which::which(name).ok())
        .find(|p| p.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidates_cover_every_family() {
        let joined = candidate_paths()
            .iter()
            .map(|p| p.to_string_lossy().to_lowercase())
            .collect::<Vec<_>>()
            .join("\n");
        assert!(joined.contains("chrom"), "got: {joined}");
        assert!(joined.contains("edge"), "got: {joined}");
        assert!(joined.contains("brave"), "got: {joined}");
    }

    #[test]
    fn explicit_override_must_exist() {
        let err = locate_with_override(Some(Path::new("/definitely/not/chrome"))).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("/definitely/not/chrome"), "got: {msg}");
        assert!(msg.contains("configuration"), "got: {msg}");
    }

    #[test]
    fn explicit_override_wins_when_present() {
        let fake = tempfile::NamedTempFile::new().unwrap();
        let found = locate_with_override(Some(fake.path())).unwrap();
        assert_eq!(found.as_deref(), Some(fake.path()));
    }

    #[test]
    fn locate_only_returns_existing_files() {
        // Whatever the host has installed, a hit must be a real file.
        if let Some(path) = locate() {
            assert!(path.is_file(), "{} is not a file", path.display());
        }
    }
}
