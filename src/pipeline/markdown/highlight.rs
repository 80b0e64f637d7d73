//! Syntax highlighting for fenced code blocks.
//!
//! The set of highlighted languages is closed: [`Language`] enumerates it and
//! [`Language::from_tag`] maps fence tags (including the usual aliases) onto
//! it with a plain `match`. Anything that does not map, or whose grammar fails
//! to tokenize, is rendered as escaped plain text inside the same
//! `<pre class="hljs"><code>` wrapper, so the stylesheet treats both alike.
//!
//! Highlighted spans carry syntect scope atoms prefixed with `hljs-`
//! (`<span class="hljs-keyword hljs-control hljs-rust">`), which is what the
//! built-in stylesheet colours.

use super::escape_html;
use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;
use tracing::debug;

/// Languages with a registered highlighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    JavaScript,
    TypeScript,
    Python,
    Java,
    C,
    Cpp,
    CSharp,
    Go,
    Rust,
    Xml,
    Css,
    Json,
    Bash,
    Yaml,
    Sql,
    Ini,
    Markdown,
}

impl Language {
    /// Every registered language.
    pub const ALL: [Language; 17] = [
        Language::JavaScript,
        Language::TypeScript,
        Language::Python,
        Language::Java,
        Language::C,
        Language::Cpp,
        Language::CSharp,
        Language::Go,
        Language::Rust,
        Language::Xml,
        Language::Css,
        Language::Json,
        Language::Bash,
        Language::Yaml,
        Language::Sql,
        Language::Ini,
        Language::Markdown,
    ];

    /// Map a fence info tag (case-insensitive) to a language.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let lang = match tag.trim().to_ascii_lowercase().as_str() {
            "javascript" | "js" | "jsx" | "mjs" | "cjs" => Language::JavaScript,
            "typescript" | "ts" | "tsx" | "mts" | "cts" => Language::TypeScript,
            "python" | "py" | "gyp" => Language::Python,
            "java" | "jsp" => Language::Java,
            "c" | "h" => Language::C,
            "cpp" | "c++" | "cc" | "cxx" | "hpp" | "hh" | "hxx" => Language::Cpp,
            "csharp" | "cs" | "c#" => Language::CSharp,
            "go" | "golang" => Language::Go,
            "rust" | "rs" => Language::Rust,
            "xml" | "html" | "xhtml" | "rss" | "atom" | "svg" | "xsl" | "plist" => Language::Xml,
            "css" => Language::Css,
            "json" => Language::Json,
            "bash" | "sh" | "shell" | "zsh" => Language::Bash,
            "yaml" | "yml" => Language::Yaml,
            "sql" => Language::Sql,
            "ini" | "toml" | "cfg" | "conf" => Language::Ini,
            "markdown" | "md" | "mkdown" | "mkd" => Language::Markdown,
            _ => return None,
        };
        Some(lang)
    }

    /// Token used to find the bundled grammar.
    ///
    /// The bundled set has no TypeScript or INI grammar; TypeScript uses the
    /// JavaScript grammar and INI uses Java properties (`key = value`).
    fn grammar(self) -> &'static str {
        match self {
            Language::JavaScript | Language::TypeScript => "js",
            Language::Python => "py",
            Language::Java => "java",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::CSharp => "cs",
            Language::Go => "go",
            Language::Rust => "rs",
            Language::Xml => "xml",
            Language::Css => "css",
            Language::Json => "json",
            Language::Bash => "sh",
            Language::Yaml => "yaml",
            Language::Sql => "sql",
            Language::Ini => "properties",
            Language::Markdown => "md",
        }
    }
}

/// Renders fenced code blocks, highlighted when the language is registered.
pub struct Highlighter {
    syntaxes: SyntaxSet,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    /// Load the bundled grammars. Done once per renderer.
    pub fn new() -> Self {
        Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
        }
    }

    /// Render one fenced block as `<pre class="hljs"><code>…</code></pre>`.
    ///
    /// `lang` is the first word of the fence info string, if any.
    pub fn render_block(&self, lang: Option<&str>, code: &str) -> String {
        let inner = lang
            .and_then(Language::from_tag)
            .and_then(|l| self.highlight(l, code))
            .unwrap_or_else(|| escape_html(code));
        format!("<pre class=\"hljs\"><code>{inner}</code></pre>\n")
    }

    fn highlight(&self, lang: Language, code: &str) -> Option<String> {
        let Some(syntax) = self.syntaxes.find_syntax_by_token(lang.grammar()) else {
            debug!("No bundled grammar for {:?}; rendering plain", lang);
            return None;
        };

        let mut generator = ClassedHTMLGenerator::new_with_class_style(
            syntax,
            &self.syntaxes,
            ClassStyle::SpacedPrefixed { prefix: "hljs-" },
        );
        for line in LinesWithEndings::from(code) {
            if let Err(e) = generator.parse_html_for_line_which_includes_newline(line) {
                debug!("Highlighting {:?} failed: {}; rendering plain", lang, e);
                return None;
            }
        }
        Some(generator.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_and_aliases() {
        assert_eq!(Language::from_tag("rust"), Some(Language::Rust));
        assert_eq!(Language::from_tag("RS"), Some(Language::Rust));
        assert_eq!(Language::from_tag("ts"), Some(Language::TypeScript));
        assert_eq!(Language::from_tag("c++"), Some(Language::Cpp));
        assert_eq!(Language::from_tag("c#"), Some(Language::CSharp));
        assert_eq!(Language::from_tag("yml"), Some(Language::Yaml));
        assert_eq!(Language::from_tag("shell"), Some(Language::Bash));
        assert_eq!(Language::from_tag("brainfuck"), None);
        assert_eq!(Language::from_tag(""), None);
    }

    #[test]
    fn registered_language_is_highlighted() {
        let h = Highlighter::new();
        let out = h.render_block(Some("rust"), "fn main() { let x = 1; }\n");
        assert!(out.starts_with("<pre class=\"hljs\"><code>"), "got: {out}");
        assert!(out.contains("<span class=\"hljs-"), "got: {out}");
        assert!(out.ends_with("</code></pre>\n"));
    }

    #[test]
    fn most_languages_find_a_grammar() {
        let h = Highlighter::new();
        for lang in Language::ALL {
            if lang == Language::Ini {
                continue;
            }
            assert!(
                h.syntaxes.find_syntax_by_token(lang.grammar()).is_some(),
                "{lang:?} has no grammar"
            );
        }
    }

    #[test]
    fn unknown_language_is_escaped_plain() {
        let h = Highlighter::new();
        let out = h.render_block(Some("klingon"), "a < b && c > \"d\"\n");
        assert_eq!(
            out,
            "<pre class=\"hljs\"><code>a &lt; b &amp;&amp; c &gt; &quot;d&quot;\n</code></pre>\n"
        );
    }

    #[test]
    fn missing_language_uses_same_wrapper() {
        let h = Highlighter::new();
        let out = h.render_block(None, "<script>alert(1)</script>\n");
        assert!(out.starts_with("<pre class=\"hljs\"><code>"));
        assert!(out.contains("&lt;script&gt;"));
        assert!(!out.contains("<script>"));
    }

    #[test]
    fn highlighted_output_escapes_markup() {
        let h = Highlighter::new();
        let out = h.render_block(Some("js"), "if (a < b && c) {}\n");
        assert!(out.contains("&lt;"), "got: {out}");
        assert!(out.contains("&amp;&amp;"), "got: {out}");
        assert!(!out.contains("a < b"), "got: {out}");
    }
}
