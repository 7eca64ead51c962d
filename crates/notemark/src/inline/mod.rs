//! Inline styling: wraps a fragment's text in Markdown delimiters or HTML tags.

mod html_output;
mod markdown_output;

pub use html_output::{HtmlInlineOutput, html_features, html_style, render_html_inline};
pub use markdown_output::{MarkdownInlineOutput, markdown_features, render_markdown_inline};

use crate::types::Formatting;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineFeature {
    Strikethrough,
    Underline,
    Superscript,
    Subscript,
    Bold,
    Italic,
    BoldItalic,
    /// An inline CSS declaration list.
    Style(String),
}

pub trait InlineOutput {
    type Error;

    fn write_text(&mut self, text: &str) -> Result<(), Self::Error>;
    fn start_feature(&mut self, feature: &InlineFeature) -> Result<(), Self::Error>;
    fn end_feature(&mut self, feature: &InlineFeature) -> Result<(), Self::Error>;
}

/// Write `text` wrapped in `features`, the first feature innermost.
pub fn wrap_features<O: InlineOutput>(
    text: &str,
    features: &[InlineFeature],
    output: &mut O,
) -> Result<(), O::Error> {
    for feature in features.iter().rev() {
        output.start_feature(feature)?;
    }
    output.write_text(text)?;
    for feature in features {
        output.end_feature(feature)?;
    }
    Ok(())
}

/// Links are usually underlined by the source; a linked fragment should not
/// also get an explicit underline.
pub fn contains_link(format: &Formatting, text: &str) -> bool {
    format.link.is_some() || text.starts_with("http")
}
