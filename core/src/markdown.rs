//! Markdown to HTML helpers.

use pulldown_cmark::{html, Parser};

/// Render a Markdown document to block-level HTML.
pub fn render_block(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut out, Parser::new(text));
    out
}

/// Render a single Markdown line as an inline fragment.
///
/// A plain line renders as `<p>...</p>`; the paragraph wrapper is removed so
/// the result can sit inside `<ins>`/`<del>` and a preformatted container.
/// Other block constructs (headings, list items) are kept as rendered.
pub fn render_inline(line: &str) -> String {
    let rendered = render_block(line);
    let rendered = rendered.trim_end_matches('\n');

    match rendered
        .strip_prefix("<p>")
        .and_then(|inner| inner.strip_suffix("</p>"))
    {
        Some(inner) => inner.to_string(),
        None => rendered.to_string(),
    }
}

/// Escape text for use in HTML element content or a quoted attribute.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_inline_strips_paragraph() {
        assert_eq!(render_inline("Step 1"), "Step 1");
        assert_eq!(render_inline("**Makes:** 4"), "<strong>Makes:</strong> 4");
    }

    #[test]
    fn test_render_inline_keeps_headings() {
        assert_eq!(render_inline("# Soup"), "<h1>Soup</h1>");
    }

    #[test]
    fn test_render_inline_list_item() {
        assert_eq!(render_inline("- salt"), "<ul>\n<li>salt</li>\n</ul>");
    }

    #[test]
    fn test_render_inline_escapes_html() {
        assert_eq!(render_inline("a < b & c"), "a &lt; b &amp; c");
    }

    #[test]
    fn test_render_block() {
        assert_eq!(render_block("# Soup\n\nHot."), "<h1>Soup</h1>\n<p>Hot.</p>\n");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }
}
