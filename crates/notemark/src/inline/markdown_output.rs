use super::{InlineFeature, InlineOutput};
use crate::types::{Formatting, FontWeight};
use std::fmt::Write;

pub struct MarkdownInlineOutput<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownInlineOutput<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> InlineOutput for MarkdownInlineOutput<W> {
    type Error = std::fmt::Error;

    fn write_text(&mut self, text: &str) -> Result<(), Self::Error> {
        self.writer.write_str(text)
    }

    fn start_feature(&mut self, feature: &InlineFeature) -> Result<(), Self::Error> {
        self.delimiter(feature)
    }

    fn end_feature(&mut self, feature: &InlineFeature) -> Result<(), Self::Error> {
        self.delimiter(feature)
    }
}

impl<W: Write> MarkdownInlineOutput<W> {
    fn delimiter(&mut self, feature: &InlineFeature) -> Result<(), std::fmt::Error> {
        match feature {
            InlineFeature::Bold => write!(self.writer, "**"),
            InlineFeature::Italic => write!(self.writer, "*"),
            InlineFeature::BoldItalic => write!(self.writer, "***"),
            InlineFeature::Strikethrough => write!(self.writer, "~~"),
            // No markdown equivalent
            InlineFeature::Underline
            | InlineFeature::Superscript
            | InlineFeature::Subscript
            | InlineFeature::Style(_) => Ok(()),
        }
    }
}

/// Emphasis innermost, strikethrough around it.
pub fn markdown_features(format: &Formatting) -> Vec<InlineFeature> {
    let mut features = Vec::new();
    match format.font_weight {
        Some(FontWeight::Bold) => features.push(InlineFeature::Bold),
        Some(FontWeight::Italic) => features.push(InlineFeature::Italic),
        Some(FontWeight::BoldItalic) => features.push(InlineFeature::BoldItalic),
        Some(FontWeight::Regular) | None => {}
    }
    if format.strikethrough {
        features.push(InlineFeature::Strikethrough);
    }
    features
}

pub fn render_markdown_inline(
    text: &str,
    features: &[InlineFeature],
) -> Result<String, std::fmt::Error> {
    let mut output = MarkdownInlineOutput::new(String::new());
    super::wrap_features(text, features, &mut output)?;
    Ok(output.into_inner())
}
