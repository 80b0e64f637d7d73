//! Pipeline stages for Markdown-to-PDF conversion.
//!
//! Each submodule implements exactly one transformation step, so each can be
//! tested on its own and the browser stage can be swapped out for a fake.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ markdown ──▶ print
//! (.md path)  (HTML doc)   (headless browser → .pdf)
//! ```
//!
//! 1. [`input`]    — validate the source path and derive output, title and
//!    base directory; read the file
//! 2. [`markdown`] — render a self-contained HTML document: highlighted code,
//!    task lists, autolinks, absolute image paths, inlined stylesheet
//! 3. [`print`]    — load the document into the shared browser and print it;
//!    runs in `spawn_blocking` because the DevTools client blocks

pub mod input;
pub mod markdown;
pub mod print;
