//! Plain-text renderings of rich-text descriptions

use crate::core::transform::html;

/// Description text for spreadsheet cells
pub fn cell_text(description: &str) -> String {
    html::to_text(&html::parse_fragment(description))
}

/// Description text for an XHTML value in plaintext mode
///
/// All markup is stripped; the text is XML-escaped so it can be placed
/// verbatim inside the value's `div`.
pub fn escaped_text(description: &str) -> String {
    escape(&cell_text(description))
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            other => out.push(other),
        }
    }
    out
}
