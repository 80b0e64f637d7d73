//! Built-in print stylesheet.
//!
//! Inlined into every rendered document unless the caller supplies its own
//! via [`crate::config::ConversionConfig::stylesheet`]. Keeping it in one
//! place lets the renderer tests check the class names it relies on
//! (`hljs-*`, `task-list-item`) without a browser.
//!
//! Highlighted code spans carry one class per syntect scope atom, so the
//! colours below key off the first atom: `hljs-comment`, `hljs-keyword`,
//! `hljs-string` and so on.

/// GitHub-flavoured stylesheet tuned for paged output.
pub const DEFAULT_STYLESHEET: &str = r#"
html { -webkit-print-color-adjust: exact; print-color-adjust: exact; }

body {
  font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif,
    "Apple Color Emoji", "Segoe UI Emoji";
  font-size: 11pt;
  line-height: 1.6;
  color: #24292f;
  background: #ffffff;
  margin: 0;
  word-wrap: break-word;
}

h1, h2, h3, h4, h5, h6 {
  margin-top: 24px;
  margin-bottom: 16px;
  font-weight: 600;
  line-height: 1.25;
  page-break-after: avoid;
  break-after: avoid;
}
h1 { font-size: 2em; padding-bottom: .3em; border-bottom: 1px solid #d0d7de; }
h2 { font-size: 1.5em; padding-bottom: .3em; border-bottom: 1px solid #d0d7de; }
h3 { font-size: 1.25em; }
h4 { font-size: 1em; }
h5 { font-size: .875em; }
h6 { font-size: .85em; color: #57606a; }

p, blockquote, ul, ol, dl, table, pre { margin-top: 0; margin-bottom: 16px; }

a { color: #0969da; text-decoration: none; }

blockquote {
  padding: 0 1em;
  color: #57606a;
  border-left: .25em solid #d0d7de;
}

ul, ol { padding-left: 2em; }
li + li { margin-top: .25em; }

.task-list-item { list-style-type: none; }
.task-list-item input[type="checkbox"] { margin: 0 .35em .25em -1.4em; vertical-align: middle; }
.task-list-item-checked { color: #57606a; }

hr { height: .25em; padding: 0; margin: 24px 0; background-color: #d0d7de; border: 0; }

img { max-width: 100%; box-sizing: content-box; page-break-inside: avoid; }

table {
  border-spacing: 0;
  border-collapse: collapse;
  display: block;
  width: max-content;
  max-width: 100%;
  overflow: auto;
  page-break-inside: avoid;
}
table th { font-weight: 600; }
table th, table td { padding: 6px 13px; border: 1px solid #d0d7de; }
table tr { background-color: #ffffff; border-top: 1px solid #d8dee4; }
table tr:nth-child(2n) { background-color: #f6f8fa; }

code, pre {
  font-family: ui-monospace, SFMono-Regular, "SF Mono", Menlo, Consolas, "Liberation Mono", monospace;
  font-size: 85%;
}
code {
  padding: .2em .4em;
  margin: 0;
  background-color: rgba(175, 184, 193, .2);
  border-radius: 6px;
}
pre {
  padding: 16px;
  overflow: auto;
  line-height: 1.45;
  background-color: #f6f8fa;
  border-radius: 6px;
  page-break-inside: avoid;
}
pre code {
  padding: 0;
  background: transparent;
  font-size: 100%;
  white-space: pre-wrap;
  word-break: normal;
}

.hljs { color: #24292f; background: #f6f8fa; }
.hljs-comment { color: #6e7781; font-style: italic; }
.hljs-keyword, .hljs-storage { color: #cf222e; }
.hljs-string { color: #0a3069; }
.hljs-constant { color: #0550ae; }
.hljs-entity { color: #8250df; }
.hljs-support { color: #0550ae; }
.hljs-variable { color: #953800; }
.hljs-invalid { color: #82071e; }
.hljs-markup.hljs-heading { color: #0550ae; font-weight: 600; }
.hljs-markup.hljs-bold { font-weight: 600; }
.hljs-markup.hljs-italic { font-style: italic; }
.hljs-markup.hljs-inserted { color: #116329; background: #dafbe1; }
.hljs-markup.hljs-deleted { color: #82071e; background: #ffebe9; }
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn styles_the_classes_the_renderer_emits() {
        for class in [
            ".hljs ",
            ".hljs-comment",
            ".hljs-keyword",
            ".hljs-string",
            ".task-list-item ",
            ".task-list-item-checked",
        ] {
            assert!(DEFAULT_STYLESHEET.contains(class), "missing {class}");
        }
    }

    #[test]
    fn has_no_closing_style_tag() {
        assert!(!DEFAULT_STYLESHEET.contains("</style"));
    }
}
