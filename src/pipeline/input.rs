//! Input resolution: turn a user-supplied path into a [`ConversionRequest`].
//!
//! Everything here runs before any browser work, so a bad path costs nothing
//! more than a `stat`. The request is immutable once built; every later stage
//! reads from it.

use crate::config::{ConversionConfig, Margins, PageFormat};
use crate::error::Md2PdfError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A validated, immutable description of one conversion job.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    /// The Markdown source.
    pub source: PathBuf,
    /// Where the PDF will be written.
    pub output: PathBuf,
    /// Document title (source file stem).
    pub title: String,
    /// Directory relative image paths are resolved against.
    pub base_dir: PathBuf,
    pub page_format: PageFormat,
    pub margins: Margins,
    pub open_after_conversion: bool,
}

impl ConversionRequest {
    /// Validate `source` and derive output path, title and base directory.
    ///
    /// # Errors
    /// - [`Md2PdfError::NotMarkdown`] if the name does not end in `.md`
    ///   (case-insensitive)
    /// - [`Md2PdfError::FileNotFound`] / [`Md2PdfError::PermissionDenied`]
    ///   if the file cannot be opened
    pub fn new(source: impl AsRef<Path>, config: &ConversionConfig) -> Result<Self, Md2PdfError> {
        let source = source.as_ref().to_path_buf();

        if !is_markdown(&source) {
            return Err(Md2PdfError::NotMarkdown { path: source });
        }

        if !source.is_file() {
            return Err(Md2PdfError::FileNotFound { path: source });
        }

        // Check read permission by attempting to open
        match std::fs::File::open(&source) {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                return Err(Md2PdfError::PermissionDenied { path: source });
            }
            Err(_) => {
                return Err(Md2PdfError::FileNotFound { path: source });
            }
        }

        let output = config
            .output
            .clone()
            .unwrap_or_else(|| source.with_extension("pdf"));
        let title = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let base_dir = source
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        debug!("Resolved request: {} → {}", source.display(), output.display());

        Ok(Self {
            source,
            output,
            title,
            base_dir,
            page_format: config.page_format,
            margins: config.margins.clone(),
            open_after_conversion: config.open_after_conversion,
        })
    }

    /// Read the Markdown source as UTF-8.
    pub async fn read_source(&self) -> Result<String, Md2PdfError> {
        tokio::fs::read_to_string(&self.source)
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => Md2PdfError::FileNotFound {
                    path: self.source.clone(),
                },
                std::io::ErrorKind::PermissionDenied => Md2PdfError::PermissionDenied {
                    path: self.source.clone(),
                },
                _ => Md2PdfError::ReadFailed {
                    path: self.source.clone(),
                    reason: e.to_string(),
                },
            })
    }
}

/// Check the `.md` extension, ignoring case.
pub fn is_markdown(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("md"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_md(dir: &Path, name: &str, body: &str) -> PathBuf {
        let p = dir.join(name);
        std::fs::write(&p, body).unwrap();
        p
    }

    #[test]
    fn test_is_markdown() {
        assert!(is_markdown(Path::new("notes.md")));
        assert!(is_markdown(Path::new("/a/b/README.MD")));
        assert!(!is_markdown(Path::new("notes.markdown.txt")));
        assert!(!is_markdown(Path::new("notes")));
        assert!(!is_markdown(Path::new("")));
    }

    #[test]
    fn derives_output_title_and_base() {
        let dir = tempfile::tempdir().unwrap();
        let src = write_md(dir.path(), "Weekly Report.MD", "# hi");
        let req = ConversionRequest::new(&src, &ConversionConfig::default()).unwrap();

        assert_eq!(req.output, dir.path().join("Weekly Report.pdf"));
        assert_eq!(req.title, "Weekly Report");
        assert_eq!(req.base_dir, dir.path());
        assert_eq!(req.page_format, PageFormat::A4);
        assert!(req.open_after_conversion);
    }

    #[test]
    fn output_override_wins() {
        let dir = tempfile::tempdir().unwrap();
        let src = write_md(dir.path(), "a.md", "");
        let config = ConversionConfig::builder()
            .output(dir.path().join("out/x.pdf"))
            .build()
            .unwrap();
        let req = ConversionRequest::new(&src, &config).unwrap();
        assert_eq!(req.output, dir.path().join("out/x.pdf"));
    }

    #[test]
    fn rejects_non_markdown_before_touching_disk() {
        let err = ConversionRequest::new("/nowhere/file.txt", &ConversionConfig::default())
            .unwrap_err();
        assert!(matches!(err, Md2PdfError::NotMarkdown { .. }), "got: {err:?}");
    }

    #[test]
    fn rejects_missing_file() {
        let err = ConversionRequest::new("/definitely/not/here.md", &ConversionConfig::default())
            .unwrap_err();
        assert!(matches!(err, Md2PdfError::FileNotFound { .. }), "got: {err:?}");
    }

    #[tokio::test]
    async fn reads_utf8_source() {
        let dir = tempfile::tempdir().unwrap();
        let src = write_md(dir.path(), "u.md", "# Grüße");
        let req = ConversionRequest::new(&src, &ConversionConfig::default()).unwrap();
        assert_eq!(req.read_source().await.unwrap(), "# Grüße");
    }

    #[tokio::test]
    async fn invalid_utf8_is_a_read_failure() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("bin.md");
        std::fs::write(&src, [0xff, 0xfe, 0x00]).unwrap();
        let req = ConversionRequest::new(&src, &ConversionConfig::default()).unwrap();
        let err = req.read_source().await.unwrap_err();
        assert!(matches!(err, Md2PdfError::ReadFailed { .. }), "got: {err:?}");
    }
}
