//! Markdown rendering and HTML escaping for bubble content.
//!
//! Answers from the backend are trusted to carry markup (`<b>`, `<br>`,
//! tables), so raw HTML in an answer is passed through. User-authored text is
//! not: callers escape it with [`escape_html`] before rendering.

use pulldown_cmark::{html, Options, Parser};
use std::panic;

/// Replace the five markup-significant characters with entities.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Render markdown to HTML.
///
/// Never fails: if the markdown pass panics, the text is returned with line
/// breaks turned into `<br>` and nothing else changed.
pub fn render_markdown(text: &str) -> String {
    match panic::catch_unwind(|| markdown_to_html(text)) {
        Ok(rendered) => rendered,
        Err(_) => {
            log::warn!("Markdown rendering failed, falling back to line breaks");
            fallback_render(text)
        }
    }
}

/// Degraded rendering: newline to `<br>`, no escaping.
pub fn fallback_render(text: &str) -> String {
    text.replace('\n', "<br>")
}

fn markdown_to_html(text: &str) -> String {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    opts.insert(Options::ENABLE_TABLES);

    let parser = Parser::new_ext(text, opts);
    let mut output = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut output, parser);
    output
}
