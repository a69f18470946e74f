use pulldown_cmark::{Options, Parser, html};
use std::fmt::Debug;

/// Markdown to HTML conversion, treated as a black box by the renderers.
pub trait MarkdownRenderer: Send + Sync + Debug {
    fn to_html(&self, markdown: &str) -> String;
}

/// CommonMark with the usual GitHub-ish extensions. Inline HTML passes through untouched,
/// which the warning highlighter relies on.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommonMark;

impl MarkdownRenderer for CommonMark {
    fn to_html(&self, markdown: &str) -> String {
        let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
        let parser = Parser::new_ext(markdown, options);

        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, parser);
        out
    }
}

/// Escape text for use in element content or a quoted attribute.
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
