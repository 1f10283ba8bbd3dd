//! Flattens inline nodes into styled runs.

use log::trace;

use crate::ast::Inline;
use crate::style::Run;

/// Translates a block's inline children into runs, in source order.
pub fn runs(inlines: &[Inline]) -> Vec<Run> {
    let mut out = Vec::new();
    collect_runs(inlines, &mut out);
    out
}

fn collect_runs(inlines: &[Inline], out: &mut Vec<Run>) {
    for inline in inlines {
        match inline {
            Inline::Text(text) => out.push(Run::plain(text.as_str())),
            Inline::SoftBreak => out.push(Run::plain(" ")),
            Inline::HardBreak => out.push(Run::line_break()),
            // Nested emphasis is not compounded: the outer node decides the style.
            Inline::Emphasis { level, children } => {
                let text = plain_text(children);
                match level {
                    1 => out.push(Run::italic(text)),
                    2 => out.push(Run::bold(text)),
                    _ => out.push(Run::plain(text)),
                }
            }
            Inline::Code(code) => out.push(Run::code(normalize_whitespace(code))),
            Inline::Link { dest, children } => {
                out.push(Run::link(plain_text(children), dest.as_str()))
            }
            Inline::AutoLink { url, email } => {
                let target = if *email && !url.to_ascii_lowercase().starts_with("mailto:") {
                    format!("mailto:{url}")
                } else {
                    url.clone()
                };
                out.push(Run::link(url.as_str(), target));
            }
            Inline::Image { alt, .. } => out.push(Run::image_placeholder(&plain_text(alt))),
            Inline::Other { children } => collect_runs(children, out),
            Inline::Html(_) | Inline::TaskMarker(_) => {
                trace!("skipping unsupported inline {inline:?}")
            }
        }
    }
}

/// Plain text of an inline subtree with formatting stripped. Code spans count
/// as literal text and images contribute their alt text. Whitespace runs are
/// collapsed to one space and the result is trimmed.
pub fn plain_text(inlines: &[Inline]) -> String {
    let mut out = String::new();
    collect_text(inlines, &mut out);
    normalize_whitespace(&out)
}

fn collect_text(inlines: &[Inline], out: &mut String) {
    for inline in inlines {
        match inline {
            Inline::Text(text) | Inline::Code(text) => out.push_str(text),
            Inline::SoftBreak | Inline::HardBreak => out.push(' '),
            Inline::Emphasis { children, .. }
            | Inline::Link { children, .. }
            | Inline::Other { children } => collect_text(children, out),
            Inline::Image { alt, .. } => collect_text(alt, out),
            Inline::AutoLink { url, .. } => out.push_str(url),
            Inline::Html(_) | Inline::TaskMarker(_) => {}
        }
    }
}

fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
