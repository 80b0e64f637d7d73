//! Configuration types for Markdown-to-PDF conversion.
//!
//! All per-job behaviour is controlled through [`ConversionConfig`], built via
//! its [`ConversionConfigBuilder`] or deserialised from a host settings block.
//! The serde field names are camelCase so the JSON a host editor stores
//! (`{"pageFormat": "Letter", "margins": {...}, "openAfterConversion": false}`)
//! maps onto the struct without an adapter layer.
//!
//! Margins stay CSS-style strings (`"15mm"`, `"0.5in"`) in the config, the
//! form users type them in. [`Length`] parses them into inches for the
//! browser's print call.

use crate::error::Md2PdfError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Configuration for a Markdown-to-PDF conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use markpress::{ConversionConfig, PageFormat};
///
/// let config = ConversionConfig::builder()
///     .page_format(PageFormat::Letter)
///     .margin_all("0.75in")
///     .open_after_conversion(false)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConversionConfig {
    /// Paper size. Default: [`PageFormat::A4`].
    ///
    /// A CSS `@page { size: ... }` rule in the stylesheet overrides this.
    pub page_format: PageFormat,

    /// Page margins as CSS lengths. Default: `15mm` on every side.
    pub margins: Margins,

    /// Whether the host should open the PDF once it is written. Default: true.
    ///
    /// The library never opens anything itself; the flag is carried through to
    /// [`crate::output::ConversionOutput`] for the caller to act on.
    pub open_after_conversion: bool,

    /// Stylesheet inlined into the rendered document.
    /// If None, uses [`crate::styles::DEFAULT_STYLESHEET`].
    pub stylesheet: Option<String>,

    /// Explicit browser executable. Takes precedence over `$CHROME_PATH` and
    /// the well-known install locations.
    pub chrome_path: Option<PathBuf>,

    /// Where to write the PDF. If None, the source path with its `.md`
    /// extension replaced by `.pdf`.
    pub output: Option<PathBuf>,

    /// Stage-by-stage progress events for the host's notification surface.
    #[serde(skip)]
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            page_format: PageFormat::default(),
            margins: Margins::default(),
            open_after_conversion: true,
            stylesheet: None,
            chrome_path: None,
            output: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("page_format", &self.page_format)
            .field("margins", &self.margins)
            .field("open_after_conversion", &self.open_after_conversion)
            .field("stylesheet", &self.stylesheet.as_ref().map(|s| s.len()))
            .field("chrome_path", &self.chrome_path)
            .field("output", &self.output)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }

    /// Check constraints serde cannot express (margin syntax).
    pub fn validate(&self) -> Result<(), Md2PdfError> {
        self.margins.to_inches().map(|_| ()).map_err(|e| match e {
            Md2PdfError::InvalidMargin { value } => {
                Md2PdfError::InvalidConfig(format!("margin '{value}' is not a CSS length"))
            }
            other => other,
        })
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn page_format(mut self, format: PageFormat) -> Self {
        self.config.page_format = format;
        self
    }

    pub fn margins(mut self, margins: Margins) -> Self {
        self.config.margins = margins;
        self
    }

    /// Use the same margin on all four sides.
    pub fn margin_all(mut self, margin: impl Into<String>) -> Self {
        self.config.margins = Margins::uniform(margin);
        self
    }

    pub fn open_after_conversion(mut self, v: bool) -> Self {
        self.config.open_after_conversion = v;
        self
    }

    pub fn stylesheet(mut self, css: impl Into<String>) -> Self {
        self.config.stylesheet = Some(css.into());
        self
    }

    pub fn chrome_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.chrome_path = Some(path.into());
        self
    }

    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output = Some(path.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Md2PdfError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

// ── Page geometry ────────────────────────────────────────────────────────

/// Paper sizes accepted by the print stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PageFormat {
    /// 210 × 297 mm (default)
    #[default]
    A4,
    /// 8.5 × 11 in
    Letter,
    /// 8.5 × 14 in
    Legal,
    /// 297 × 420 mm
    A3,
    /// 148 × 210 mm
    A5,
}

impl PageFormat {
    /// Paper `(width, height)` in inches, portrait orientation.
    pub fn size_inches(self) -> (f64, f64) {
        match self {
            PageFormat::A4 => (8.27, 11.7),
            PageFormat::Letter => (8.5, 11.0),
            PageFormat::Legal => (8.5, 14.0),
            PageFormat::A3 => (11.7, 16.54),
            PageFormat::A5 => (5.83, 8.27),
        }
    }
}

impl fmt::Display for PageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PageFormat::A4 => "A4",
            PageFormat::Letter => "Letter",
            PageFormat::Legal => "Legal",
            PageFormat::A3 => "A3",
            PageFormat::A5 => "A5",
        };
        f.write_str(name)
    }
}

/// Page margins, each a CSS-style length string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub top: String,
    pub right: String,
    pub bottom: String,
    pub left: String,
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform("15mm")
    }
}

impl Margins {
    /// The same length on all four sides.
    pub fn uniform(value: impl Into<String>) -> Self {
        let v = value.into();
        Self {
            top: v.clone(),
            right: v.clone(),
            bottom: v.clone(),
            left: v,
        }
    }

    /// Parse all four sides into inches, `(top, right, bottom, left)`.
    pub fn to_inches(&self) -> Result<(f64, f64, f64, f64), Md2PdfError> {
        Ok((
            Length::parse(&self.top)?.to_inches(),
            Length::parse(&self.right)?.to_inches(),
            Length::parse(&self.bottom)?.to_inches(),
            Length::parse(&self.left)?.to_inches(),
        ))
    }
}

/// Units understood in margin strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthUnit {
    Px,
    In,
    Cm,
    Mm,
}

/// A parsed CSS length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length {
    pub value: f64,
    pub unit: LengthUnit,
}

impl Length {
    /// Parse `"15mm"`, `"0.5in"`, `"2cm"`, `"40px"` or a bare number (pixels).
    ///
    /// Units are case-insensitive; whitespace between number and unit is
    /// allowed. Negative and non-finite values are rejected.
    pub fn parse(s: &str) -> Result<Self, Md2PdfError> {
        let invalid = || Md2PdfError::InvalidMargin {
            value: s.to_string(),
        };

        let t = s.trim().to_ascii_lowercase();
        let split = t
            .find(|c: char| c.is_ascii_alphabetic())
            .unwrap_or(t.len());
        let (number, unit) = t.split_at(split);

        let value: f64 = number.trim().parse().map_err(|_| invalid())?;
        if !value.is_finite() || value < 0.0 {
            return Err(invalid());
        }

        let unit = match unit.trim() {
            "" | "px" => LengthUnit::Px,
            "in" => LengthUnit::In,
            "cm" => LengthUnit::Cm,
            "mm" => LengthUnit::Mm,
            _ => return Err(invalid()),
        };

        Ok(Self { value, unit })
    }

    /// Convert to inches (CSS pixels are 1/96 in).
    pub fn to_inches(self) -> f64 {
        match self.unit {
            LengthUnit::Px => self.value / 96.0,
            LengthUnit::In => self.value,
            LengthUnit::Cm => self.value / 2.54,
            LengthUnit::Mm => self.value / 25.4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn defaults_match_host_settings() {
        let c = ConversionConfig::default();
        assert_eq!(c.page_format, PageFormat::A4);
        assert_eq!(c.margins, Margins::uniform("15mm"));
        assert!(c.open_after_conversion);
        assert!(c.stylesheet.is_none());
    }

    #[test]
    fn length_units() {
        assert!(close(Length::parse("25.4mm").unwrap().to_inches(), 1.0));
        assert!(close(Length::parse("2.54cm").unwrap().to_inches(), 1.0));
        assert!(close(Length::parse("1in").unwrap().to_inches(), 1.0));
        assert!(close(Length::parse("96px").unwrap().to_inches(), 1.0));
        assert!(close(Length::parse("96").unwrap().to_inches(), 1.0));
        assert!(close(Length::parse(" 10 MM ").unwrap().to_inches(), 10.0 / 25.4));
    }

    #[test]
    fn length_rejects_garbage() {
        for bad in ["", "mm", "15pt", "-1mm", "abc", "1.2.3in", "NaNmm"] {
            assert!(
                matches!(Length::parse(bad), Err(Md2PdfError::InvalidMargin { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn builder_validates_margins() {
        let err = ConversionConfig::builder()
            .margin_all("wide")
            .build()
            .unwrap_err();
        assert!(matches!(err, Md2PdfError::InvalidConfig(_)), "got: {err:?}");
    }

    #[test]
    fn deserialises_host_settings_block() {
        let json = r#"{
            "pageFormat": "Letter",
            "margins": { "top": "1in", "right": "10mm", "bottom": "1in", "left": "10mm" },
            "openAfterConversion": false
        }"#;
        let c: ConversionConfig = serde_json::from_str(json).unwrap();
        assert_eq!(c.page_format, PageFormat::Letter);
        assert_eq!(c.margins.top, "1in");
        assert_eq!(c.margins.left, "10mm");
        assert!(!c.open_after_conversion);
        c.validate().unwrap();
    }

    #[test]
    fn partial_settings_keep_defaults() {
        let c: ConversionConfig = serde_json::from_str(r#"{"pageFormat":"A5"}"#).unwrap();
        assert_eq!(c.page_format, PageFormat::A5);
        assert_eq!(c.margins, Margins::default());
        assert!(c.open_after_conversion);
    }

    #[test]
    fn missing_margin_sides_default() {
        let c: ConversionConfig =
            serde_json::from_str(r#"{"margins":{"top":"1in"}}"#).unwrap();
        assert_eq!(c.margins.top, "1in");
        assert_eq!(c.margins.bottom, "15mm");
    }

    #[test]
    fn paper_sizes_are_portrait() {
        for f in [
            PageFormat::A4,
            PageFormat::Letter,
            PageFormat::Legal,
            PageFormat::A3,
            PageFormat::A5,
        ] {
            let (w, h) = f.size_inches();
            assert!(w < h, "{f} should be portrait");
        }
    }
}
