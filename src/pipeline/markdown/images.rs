//! Rewrite relative `<img src>` references to absolute `file://` URLs.
//!
//! The rendered document is loaded from a temporary file, so a relative
//! `src="diagram.png"` would resolve against the temp directory rather than
//! the Markdown file's folder. Rewriting against the source's base directory
//! removes any dependence on where the HTML ends up or what the working
//! directory is.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::path::Path;
use url::Url;

static IMG_SRC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)(<img[^>]+src=["'])([^"']+)(["'])"#).unwrap());

/// Rewrite every relative image source in `html` against `base_dir`.
///
/// Sources starting with `http`, `data:` or `file:` (any case) are left as
/// they are. The base directory is percent-encoded; `src` values are already
/// URL-escaped by the renderer and are joined as-is, with `.` and `..`
/// segments collapsed.
pub fn resolve_image_paths(html: &str, base_dir: &Path) -> String {
    let base = std::path::absolute(base_dir).unwrap_or_else(|_| base_dir.to_path_buf());
    let Ok(base_url) = Url::from_directory_path(&base) else {
        tracing::warn!("Cannot express {} as a file URL; image paths left as-is", base.display());
        return html.to_string();
    };

    IMG_SRC
        .replace_all(html, |caps: &Captures| {
            let src = &caps[2];
            if is_absolute_reference(src) {
                return caps[0].to_string();
            }
            match base_url.join(src) {
                Ok(resolved) => format!("{}{}{}", &caps[1], resolved, &caps[3]),
                Err(_) => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn is_absolute_reference(src: &str) -> bool {
    let lower = src.trim_start().to_ascii_lowercase();
    lower.starts_with("http") || lower.starts_with("data:") || lower.starts_with("file:")
}
