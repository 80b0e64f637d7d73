//! Markdown → self-contained HTML document.
//!
//! [`MarkdownRenderer`] owns everything that is expensive to build (parser
//! options, the bundled grammars, the list-item rule chain) and is reused for
//! every document. Rendering itself keeps no state between calls.
//!
//! ## Pipeline
//!
//! ```text
//! markdown ──▶ parse ──▶ list-item rules ──▶ fences + autolinks ──▶ HTML body
//!                                                                      │
//!                          document shell ◀── image path rewrite ◀─────┘
//! ```
//!
//! Parser setup: raw HTML passes through, bare URLs become links, smart
//! punctuation is on, soft line breaks stay soft. GFM tables and
//! strikethrough are enabled. Task-list markers are *not* handled by the
//! parser; [`task_list::TaskListRule`] does that so the markup matches the
//! stylesheet's `task-list-item` classes.

pub mod highlight;
pub mod images;
pub mod linkify;
pub mod task_list;

use highlight::Highlighter;
use pulldown_cmark::{html, CodeBlockKind, Event, Options, Parser, Tag, TagEnd, TextMergeStream};
use std::path::Path;
use task_list::ListItemRules;

/// Renders Markdown into a complete HTML document.
pub struct MarkdownRenderer {
    options: Options,
    highlighter: Highlighter,
    item_rules: ListItemRules,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

struct Fence {
    lang: Option<String>,
    code: String,
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_SMART_PUNCTUATION);

        Self {
            options,
            highlighter: Highlighter::new(),
            item_rules: ListItemRules::default(),
        }
    }

    /// Replace the list-item rule chain.
    pub fn with_item_rules(mut self, rules: ListItemRules) -> Self {
        self.item_rules = rules;
        self
    }

    /// Render `markdown` into a full document.
    ///
    /// # Arguments
    /// * `title`      — document title; HTML-escaped
    /// * `base_dir`   — directory relative image sources are resolved against
    /// * `stylesheet` — CSS inlined verbatim into a `<style>` block
    pub fn render(&self, markdown: &str, title: &str, base_dir: &Path, stylesheet: &str) -> String {
        let body = self.render_body(markdown);
        let body = images::resolve_image_paths(&body, base_dir);
        assemble_document(title, stylesheet, &body)
    }

    /// Render only the HTML body fragment.
    pub fn render_body(&self, markdown: &str) -> String {
        let mut events: Vec<Event<'_>> =
            TextMergeStream::new(Parser::new_ext(markdown, self.options)).collect();
        self.item_rules.apply(&mut events);
        let events = self.transform(events);

        let mut body = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut body, events.into_iter());
        body
    }

    /// Replace fenced code blocks with highlighted markup and linkify bare
    /// URLs outside links, code blocks and image alt text.
    fn transform<'a>(&self, events: Vec<Event<'a>>) -> Vec<Event<'a>> {
        let mut out = Vec::with_capacity(events.len());
        let mut fence: Option<Fence> = None;
        let mut link_depth = 0usize;
        // Indented code and image alt text; their text is never linkified.
        let mut verbatim_depth = 0usize;

        for event in events {
            if let Some(f) = fence.as_mut() {
                match event {
                    Event::Text(text) => f.code.push_str(&text),
                    Event::End(TagEnd::CodeBlock) => {
                        let block = self.highlighter.render_block(f.lang.as_deref(), &f.code);
                        out.push(Event::Html(block.into()));
                        fence = None;
                    }
                    _ => {}
                }
                continue;
            }

            match event {
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                    fence = Some(Fence {
                        lang: info.split_whitespace().next().map(str::to_string),
                        code: String::new(),
                    });
                }
                Event::Start(Tag::CodeBlock(_)) | Event::Start(Tag::Image { .. }) => {
                    verbatim_depth += 1;
                    out.push(event);
                }
                Event::End(TagEnd::CodeBlock) | Event::End(TagEnd::Image) => {
                    verbatim_depth = verbatim_depth.saturating_sub(1);
                    out.push(event);
                }
                Event::Start(Tag::Link { .. }) => {
                    link_depth += 1;
                    out.push(event);
                }
                Event::End(TagEnd::Link) => {
                    link_depth = link_depth.saturating_sub(1);
                    out.push(event);
                }
                Event::InlineHtml(ref raw) if is_anchor_open(raw) => {
                    link_depth += 1;
                    out.push(event);
                }
                Event::InlineHtml(ref raw) if is_anchor_close(raw) => {
                    link_depth = link_depth.saturating_sub(1);
                    out.push(event);
                }
                Event::Text(text) if link_depth == 0 && verbatim_depth == 0 => {
                    linkify::push_linkified(&mut out, text)
                }
                other => out.push(other),
            }
        }
        out
    }
}

fn is_anchor_open(raw: &str) -> bool {
    let lower = raw.trim_start().to_ascii_lowercase();
    lower.starts_with("<a ") || lower.starts_with("<a>")
}

fn is_anchor_close(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("</a>")
}

/// Wrap a rendered body in the document shell.
pub fn assemble_document(title: &str, stylesheet: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
<html lang=\"en\">\n\
<head>\n\
  <meta charset=\"UTF-8\">\n\
  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
  <title>{}</title>\n\
  <style>{}</style>\n\
</head>\n\
<body>\n\
{}\
</body>\n\
</html>\n",
        escape_html(title),
        stylesheet,
        body
    )
}

/// Escape `&`, `<`, `>` and `"`.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(md: &str) -> String {
        MarkdownRenderer::new().render_body(md)
    }

    #[test]
    fn empty_input_is_a_valid_document() {
        let doc = MarkdownRenderer::new().render("", "t", Path::new("/tmp"), "");
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("<body>\n</body>"), "got: {doc}");
        assert!(doc.ends_with("</html>\n"));
    }

    #[test]
    fn document_shell() {
        let doc = MarkdownRenderer::new().render("# Hello", "Hello", Path::new("/tmp"), "p{color:red}");
        assert!(doc.contains("<meta charset=\"UTF-8\">"));
        assert!(doc.contains("name=\"viewport\""));
        assert!(doc.contains("<title>Hello</title>"));
        assert!(doc.contains("<style>p{color:red}</style>"));
        assert!(doc.contains("<h1>Hello</h1>"));
    }

    #[test]
    fn title_is_escaped_once() {
        let doc = MarkdownRenderer::new().render("", "A & B <\"c\">", Path::new("/"), "");
        assert!(
            doc.contains("<title>A &amp; B &lt;&quot;c&quot;&gt;</title>"),
            "got: {doc}"
        );
        assert!(!doc.contains("&amp;amp;"));
    }

    #[test]
    fn unchecked_task_item() {
        let html = body("- [ ] task");
        assert!(
            html.contains("<li class=\"task-list-item\"><input type=\"checkbox\" disabled> task</li>"),
            "got: {html}"
        );
        assert!(!html.contains("[ ]"));
    }

    #[test]
    fn checked_task_items() {
        for md in ["- [x] done", "- [X] done"] {
            let html = body(md);
            assert!(
                html.contains(
                    "<li class=\"task-list-item task-list-item-checked\"><input type=\"checkbox\" checked disabled> done</li>"
                ),
                "got: {html}"
            );
        }
    }

    #[test]
    fn task_item_in_loose_list() {
        let html = body("- [ ] first\n\n- [x] second\n");
        assert!(html.contains("class=\"task-list-item\""), "got: {html}");
        assert!(
            html.contains("<p><input type=\"checkbox\" disabled> first</p>"),
            "got: {html}"
        );
        assert!(
            html.contains("<p><input type=\"checkbox\" checked disabled> second</p>"),
            "got: {html}"
        );
        assert!(!html.contains("> <p>"), "got: {html}");
    }

    #[test]
    fn ordinary_items_unchanged() {
        let with_rules = body("- buy [ ] milk\n- plain\n");
        let without = MarkdownRenderer::new()
            .with_item_rules(ListItemRules::empty())
            .render_body("- buy [ ] milk\n- plain\n");
        assert_eq!(with_rules, without);
        assert!(with_rules.contains("<li>buy [ ] milk</li>"), "got: {with_rules}");
    }

    #[test]
    fn marker_outside_list_untouched() {
        let html = body("[ ] not a list item");
        assert!(html.contains("<p>[ ] not a list item</p>"), "got: {html}");
        assert!(!html.contains("checkbox"));
    }

    #[test]
    fn fenced_code_registered_language() {
        let html = body("```rust\nfn main() {}\n```\n");
        assert!(html.contains("<pre class=\"hljs\"><code>"), "got: {html}");
        assert!(html.contains("hljs-"), "got: {html}");
    }

    #[test]
    fn fenced_code_unknown_language_is_escaped() {
        let html = body("```nope\n<b> & </b>\n```\n");
        assert!(
            html.contains("<pre class=\"hljs\"><code>&lt;b&gt; &amp; &lt;/b&gt;\n</code></pre>"),
            "got: {html}"
        );
    }

    #[test]
    fn fenced_code_without_language() {
        let html = body("```\nx < y\n```\n");
        assert!(
            html.contains("<pre class=\"hljs\"><code>x &lt; y\n</code></pre>"),
            "got: {html}"
        );
    }

    #[test]
    fn raw_html_passes_through() {
        let html = body("<div class=\"note\">hi</div>\n");
        assert!(html.contains("<div class=\"note\">hi</div>"), "got: {html}");
    }

    #[test]
    fn bare_urls_are_linked() {
        let html = body("Visit https://example.com today");
        assert!(
            html.contains("<a href=\"https://example.com\">https://example.com</a>"),
            "got: {html}"
        );
    }

    #[test]
    fn existing_links_not_double_linked() {
        let html = body("[https://a.example](https://a.example)");
        assert_eq!(html.matches("<a ").count(), 1, "got: {html}");
    }

    #[test]
    fn urls_in_indented_code_stay_text() {
        let html = body("text\n\n    curl https://example.com/x\n");
        assert!(
            html.contains("<pre><code>curl https://example.com/x\n</code></pre>"),
            "got: {html}"
        );
        assert!(!html.contains("<a href"), "got: {html}");
    }

    #[test]
    fn urls_in_fenced_code_stay_text() {
        let plain = body("```\ncurl https://example.com/x\n```\n");
        assert!(
            plain.contains("<pre class=\"hljs\"><code>curl https://example.com/x\n</code></pre>"),
            "got: {plain}"
        );

        let highlighted = body("```sh\ncurl https://example.com/x\n```\n");
        assert!(highlighted.contains("<pre class=\"hljs\">"), "got: {highlighted}");
        assert!(!highlighted.contains("<a href"), "got: {highlighted}");
    }

    #[test]
    fn urls_in_image_alt_stay_text() {
        let html = body("![see https://example.com](a.png)");
        assert!(html.contains("alt=\"see https://example.com\""), "got: {html}");
        assert!(!html.contains("&lt;a"), "got: {html}");
        assert!(!html.contains("<a href"), "got: {html}");
    }

    #[test]
    fn linking_resumes_after_code_and_images() {
        let html = body("![x](a.png)\n\n    code\n\nsee https://example.com\n");
        assert_eq!(html.matches("<a href").count(), 1, "got: {html}");
    }

    #[test]
    fn smart_punctuation() {
        let html = body("\"quoted\" -- dash");
        assert!(html.contains('\u{201c}'), "got: {html}");
        assert!(html.contains('\u{2013}'), "got: {html}");
    }

    #[test]
    fn soft_breaks_stay_soft() {
        let html = body("line one\nline two");
        assert!(!html.contains("<br"), "got: {html}");
    }

    #[cfg(unix)]
    #[test]
    fn images_resolved_against_base() {
        let doc = MarkdownRenderer::new().render(
            "![d](img/d.png) ![r](https://x.org/r.png)",
            "t",
            Path::new("/notes"),
            "",
        );
        assert!(doc.contains("src=\"file:///notes/img/d.png\""), "got: {doc}");
        assert!(doc.contains("src=\"https://x.org/r.png\""), "got: {doc}");
    }

    #[test]
    fn escape_html_set() {
        assert_eq!(escape_html("&<>\"'"), "&amp;&lt;&gt;&quot;'");
    }
}
