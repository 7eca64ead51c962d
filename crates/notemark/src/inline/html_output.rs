use super::{InlineFeature, InlineOutput};
use crate::types::{Baseline, DEFAULT_EMOJI_FONT, FontWeight, Formatting};
use std::fmt::Write;

/// Inline HTML for styling Markdown can't express. Text is passed through
/// unescaped since it may already hold rendered links.
pub struct HtmlInlineOutput<W: Write> {
    writer: W,
}

impl<W: Write> HtmlInlineOutput<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> InlineOutput for HtmlInlineOutput<W> {
    type Error = std::fmt::Error;

    fn write_text(&mut self, text: &str) -> Result<(), Self::Error> {
        self.writer.write_str(text)
    }

    fn start_feature(&mut self, feature: &InlineFeature) -> Result<(), Self::Error> {
        match feature {
            InlineFeature::Strikethrough => write!(self.writer, "<s>"),
            InlineFeature::Underline => write!(self.writer, "<u>"),
            InlineFeature::Superscript => write!(self.writer, "<sup>"),
            InlineFeature::Subscript => write!(self.writer, "<sub>"),
            InlineFeature::Bold => write!(self.writer, "<b>"),
            InlineFeature::Italic => write!(self.writer, "<i>"),
            InlineFeature::BoldItalic => write!(self.writer, "<b><i>"),
            InlineFeature::Style(css) => {
                write!(self.writer, "<span style=\"")?;
                for c in css.chars() {
                    match c {
                        '"' => self.writer.write_str("&quot;")?,
                        _ => self.writer.write_char(c)?,
                    }
                }
                write!(self.writer, "\">")
            }
        }
    }

    fn end_feature(&mut self, feature: &InlineFeature) -> Result<(), Self::Error> {
        match feature {
            InlineFeature::Strikethrough => write!(self.writer, "</s>"),
            InlineFeature::Underline => write!(self.writer, "</u>"),
            InlineFeature::Superscript => write!(self.writer, "</sup>"),
            InlineFeature::Subscript => write!(self.writer, "</sub>"),
            InlineFeature::Bold => write!(self.writer, "</b>"),
            InlineFeature::Italic => write!(self.writer, "</i>"),
            InlineFeature::BoldItalic => write!(self.writer, "</i></b>"),
            InlineFeature::Style(_) => write!(self.writer, "</span>"),
        }
    }
}

/// Strikethrough innermost, then underline, baseline shift and weight.
pub fn html_features(format: &Formatting, has_link: bool) -> Vec<InlineFeature> {
    let mut features = Vec::new();
    if format.strikethrough {
        features.push(InlineFeature::Strikethrough);
    }
    if format.underlined && !has_link {
        features.push(InlineFeature::Underline);
    }
    match format.superscript {
        Baseline::Super => features.push(InlineFeature::Superscript),
        Baseline::Sub => features.push(InlineFeature::Subscript),
        Baseline::Default => {}
    }
    match format.font_weight {
        Some(FontWeight::Bold) => features.push(InlineFeature::Bold),
        Some(FontWeight::Italic) => features.push(InlineFeature::Italic),
        Some(FontWeight::BoldItalic) => features.push(InlineFeature::BoldItalic),
        Some(FontWeight::Regular) | None => {}
    }
    features
}

/// CSS for font family, size and colour, if any apply.
pub fn html_style(format: &Formatting) -> Option<String> {
    let mut style = String::new();
    if let Some(font) = &format.font {
        if let Some(name) = font.font_name.as_deref().filter(|n| *n != DEFAULT_EMOJI_FONT) {
            let _ = write!(style, "font-family:{name};");
        }
        if let Some(size) = font.point_size {
            let _ = write!(style, "font-size:{size}pt;");
        }
    }
    if let Some(color) = &format.color {
        let _ = write!(style, "color:{};", color.to_hex());
    }
    (!style.is_empty()).then_some(style)
}

pub fn render_html_inline(
    text: &str,
    features: &[InlineFeature],
) -> Result<String, std::fmt::Error> {
    let mut output = HtmlInlineOutput::new(String::new());
    super::wrap_features(text, features, &mut output)?;
    Ok(output.into_inner())
}
