//! Turn bare `http(s)://` and `www.` URLs in text runs into links.

use super::escape_html;
use once_cell::sync::Lazy;
use pulldown_cmark::{CowStr, Event};
use regex::Regex;

// Trailing punctuation stays outside the link: "see https://x.org." links "https://x.org".
static RE_BARE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\b(?:https?://|www\.)[^\s<>"]*[^\s<>"'.,;:!?)\]]"#).unwrap()
});

/// Push `text` onto `out`, splitting out any bare URLs as inline links.
pub fn push_linkified<'a>(out: &mut Vec<Event<'a>>, text: CowStr<'a>) {
    if !RE_BARE_URL.is_match(&text) {
        out.push(Event::Text(text));
        return;
    }

    let s: &str = &text;
    let mut last = 0;
    for m in RE_BARE_URL.find_iter(s) {
        if m.start() > last {
            out.push(Event::Text(s[last..m.start()].to_string().into()));
        }
        let href = if m.as_str().to_ascii_lowercase().starts_with("www.") {
            format!("http://{}", m.as_str())
        } else {
            m.as_str().to_string()
        };
        out.push(Event::InlineHtml(
            format!(
                "<a href=\"{}\">{}</a>",
                escape_html(&href),
                escape_html(m.as_str())
            )
            .into(),
        ));
        last = m.end();
    }
    if last < s.len() {
        out.push(Event::Text(s[last..].to_string().into()));
    }
}
