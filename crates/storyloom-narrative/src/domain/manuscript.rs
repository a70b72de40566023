//! Plain-text measurements of markdown scene bodies.

use pulldown_cmark::{Event, Parser, TagEnd};

/// Counts the words of rendered markdown, ignoring markup.
#[must_use]
pub fn word_count(markdown: &str) -> usize {
    let mut text = String::with_capacity(markdown.len());
    for event in Parser::new(markdown) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak | Event::Rule => text.push(' '),
            Event::End(tag)
                if !matches!(
                    tag,
                    TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link
                ) =>
            {
                text.push(' ');
            }
            _ => {}
        }
    }
    text.split_whitespace().count()
}
