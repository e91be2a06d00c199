//! Markdown rendering.
use pulldown_cmark::{Options, Parser, html};

use crate::chat::Message;

fn options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options
}

/// Render Markdown to an HTML fragment. Partial documents, like a
/// response that is still streaming, render as far as they go.
pub fn to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, options());
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Render a whole conversation as a standalone HTML page.
pub fn transcript_to_html(title: &str, messages: &[Message]) -> String {
    let mut body = String::new();
    for msg in messages {
        body.push_str(&format!(
            "<div class=\"message {role}\">\n<div class=\"role\">{role}</div>\n<div class=\"content\">\n{content}</div>\n</div>\n",
            role = msg.role,
            content = to_html(&msg.content)
        ));
    }
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n<body>\n<h1>{title}</h1>\n{body}</body>\n</html>\n",
        title = escape(title),
        body = body
    )
}
