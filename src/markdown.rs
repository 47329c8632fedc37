//! Markdown to HTML.

use pulldown_cmark::{Options, Parser, html};

/// Render CommonMark with tables and strikethrough.
///
/// Inline HTML is kept as written.
pub fn to_html(text: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let mut output = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut output, Parser::new_ext(text, options));
    output
}
