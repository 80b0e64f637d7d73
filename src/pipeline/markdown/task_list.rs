//! List-item rendering rules.
//!
//! A [`ListItemRules`] chain is consulted for every list item. Each
//! [`ListItemRule`] looks at the item's leading text and either claims the
//! item (returning the `<li>` tag, markup to put before the label and how
//! many bytes of marker to strip) or declines. The first rule that claims wins; if none do, the item renders
//! as a plain `<li>`.
//!
//! The default chain holds a single rule, [`TaskListRule`], which turns
//! `[ ] ` / `[x] ` / `[X] ` prefixes into disabled checkboxes.

use pulldown_cmark::{Event, Tag};

/// Opening markup for a claimed list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemOpen {
    /// Replaces the `<li>` tag.
    pub item: &'static str,
    /// Emitted right before the label; inside its `<p>` in a loose list.
    pub lead: &'static str,
    /// Bytes removed from the start of the item's first text run.
    pub marker_len: usize,
}

/// One link in the list-item chain.
pub trait ListItemRule: Send + Sync {
    /// Claim the item by returning its opening markup, or decline with `None`.
    fn open(&self, leading_text: &str) -> Option<ItemOpen>;
}

const UNCHECKED_MARKER: &str = "[ ] ";
const CHECKED_MARKERS: [&str; 2] = ["[x] ", "[X] "];

const UNCHECKED_ITEM: &str = "<li class=\"task-list-item\">";
const CHECKED_ITEM: &str = "<li class=\"task-list-item task-list-item-checked\">";
const UNCHECKED_BOX: &str = "<input type=\"checkbox\" disabled> ";
const CHECKED_BOX: &str = "<input type=\"checkbox\" checked disabled> ";

/// GitHub-style task list items.
///
/// Prefix match on the raw text, case-sensitive except for the `x`/`X`.
pub struct TaskListRule;

impl ListItemRule for TaskListRule {
    fn open(&self, leading_text: &str) -> Option<ItemOpen> {
        if leading_text.starts_with(UNCHECKED_MARKER) {
            return Some(ItemOpen {
                item: UNCHECKED_ITEM,
                lead: UNCHECKED_BOX,
                marker_len: UNCHECKED_MARKER.len(),
            });
        }
        if CHECKED_MARKERS.iter().any(|m| leading_text.starts_with(m)) {
            return Some(ItemOpen {
                item: CHECKED_ITEM,
                lead: CHECKED_BOX,
                marker_len: CHECKED_MARKERS[0].len(),
            });
        }
        None
    }
}

/// Ordered chain of [`ListItemRule`]s.
pub struct ListItemRules {
    rules: Vec<Box<dyn ListItemRule>>,
}

impl Default for ListItemRules {
    fn default() -> Self {
        Self::empty().with_rule(TaskListRule)
    }
}

impl ListItemRules {
    /// A chain with no rules: every item renders as a plain `<li>`.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule. Earlier rules take precedence.
    pub fn with_rule(mut self, rule: impl ListItemRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// First rule that claims `leading_text`, if any.
    pub fn open(&self, leading_text: &str) -> Option<ItemOpen> {
        self.rules.iter().find_map(|r| r.open(leading_text))
    }

    /// Rewrite claimed items in a parsed event stream.
    ///
    /// Only `Start(Item)` events are considered. The item's leading text is
    /// the text run right after it, or right after the paragraph start in a
    /// loose list, where the lead markup goes inside the `<p>` so it stays on
    /// the label's line. Items that start with anything other than text are
    /// left alone.
    pub fn apply(&self, events: &mut [Event<'_>]) {
        if self.rules.is_empty() {
            return;
        }

        for i in 0..events.len() {
            if !matches!(events[i], Event::Start(Tag::Item)) {
                continue;
            }
            let loose = matches!(events.get(i + 1), Some(Event::Start(Tag::Paragraph)));
            let text_idx = if loose { i + 2 } else { i + 1 };
            let Some(Event::Text(text)) = events.get(text_idx) else {
                continue;
            };
            let leading: &str = text;
            let Some(open) = self.open(leading) else {
                continue;
            };

            let rest = leading[open.marker_len..].to_string();
            events[text_idx] = Event::Text(rest.into());
            if loose {
                events[i] = Event::Html(open.item.into());
                events[i + 1] = Event::Html(format!("<p>{}", open.lead).into());
            } else {
                events[i] = Event::Html(format!("{}{}", open.item, open.lead).into());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unchecked_marker() {
        let open = TaskListRule.open("[ ] buy milk").unwrap();
        assert_eq!(open.marker_len, 4);
        assert_eq!(open.item, "<li class=\"task-list-item\">");
        assert!(open.lead.contains("disabled"));
        assert!(!open.lead.contains("checked"));
    }

    #[test]
    fn checked_marker_either_case() {
        for text in ["[x] done", "[X] done"] {
            let open = TaskListRule.open(text).unwrap();
            assert!(open.item.contains("task-list-item task-list-item-checked"));
            assert!(open.lead.contains("checked disabled"));
        }
    }

    #[test]
    fn non_markers_decline() {
        for text in ["buy [ ] milk", "[]", "[ ]", "[y] no", "[x]no-space", " [ ] indented"] {
            assert!(TaskListRule.open(text).is_none(), "{text:?} should decline");
        }
    }

    struct Star;

    impl ListItemRule for Star {
        fn open(&self, leading_text: &str) -> Option<ItemOpen> {
            leading_text.starts_with("* ").then_some(ItemOpen {
                item: "<li class=\"star\">",
                lead: "",
                marker_len: 2,
            })
        }
    }

    #[test]
    fn first_claiming_rule_wins() {
        let rules = ListItemRules::empty().with_rule(Star).with_rule(TaskListRule);
        assert_eq!(rules.open("* x").unwrap().item, "<li class=\"star\">");
        assert!(rules.open("[ ] x").unwrap().item.contains("task-list-item"));
        assert!(rules.open("plain").is_none());
    }

    #[test]
    fn empty_chain_leaves_events_untouched() {
        let mut events = vec![
            Event::Start(Tag::Item),
            Event::Text("[ ] task".into()),
        ];
        ListItemRules::empty().apply(&mut events);
        assert_eq!(events[0], Event::Start(Tag::Item));
        assert_eq!(events[1], Event::Text("[ ] task".into()));
    }

    #[test]
    fn loose_item_checkbox_goes_inside_paragraph() {
        let mut events = vec![
            Event::Start(Tag::Item),
            Event::Start(Tag::Paragraph),
            Event::Text("[x] done".into()),
        ];
        ListItemRules::default().apply(&mut events);
        assert_eq!(
            events[0],
            Event::Html("<li class=\"task-list-item task-list-item-checked\">".into())
        );
        assert_eq!(
            events[1],
            Event::Html("<p><input type=\"checkbox\" checked disabled> ".into())
        );
        assert_eq!(events[2], Event::Text("done".into()));
    }
}
