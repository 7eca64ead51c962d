use crate::attachment::format_attachment;
use crate::error::ConvertError;
use crate::fragment::{Fragment, FragmentKind, parse_tokens};
use crate::inline::{
    InlineFeature, contains_link, html_features, html_style, markdown_features,
    render_html_inline, render_markdown_inline,
};
use crate::links::{is_note_uri, resolve_internal_link};
use crate::multi_run::{MultiRun, Transition, finish, transition};
use crate::options::ConvertOptions;
use crate::paragraph::{ListCounter, format_paragraph};
use crate::store::{
    FileResolver, LinkGenerator, Row, RowKind, RowQuery, RowStore, SubDocumentDecoder,
};
use crate::types::{Baseline, Formatting, Note};

/// Longest first line still treated as a title when omitting it.
pub const MAX_TITLE_LENGTH: usize = 70;

/// Collaborators and options shared by every converter of one import.
#[derive(Clone)]
pub struct ConvertContext<'a> {
    pub store: &'a dyn RowStore,
    pub decoder: &'a dyn SubDocumentDecoder,
    pub files: &'a dyn FileResolver,
    pub links: &'a dyn LinkGenerator,
    pub options: ConvertOptions,
}

impl<'a> ConvertContext<'a> {
    pub fn new(
        store: &'a dyn RowStore,
        decoder: &'a dyn SubDocumentDecoder,
        files: &'a dyn FileResolver,
        links: &'a dyn LinkGenerator,
        options: ConvertOptions,
    ) -> Self {
        Self {
            store,
            decoder,
            files,
            links,
            options,
        }
    }

    /// Single-row lookup. Store failures are logged and read as "no row".
    pub async fn query(&self, kind: RowKind, identifier: &str) -> Option<Row> {
        match self.store.query_row(RowQuery::new(kind, identifier)).await {
            Ok(row) => row,
            Err(e) => {
                tracing::warn!("{:?} lookup for {} failed: {}", kind, identifier, e);
                None
            }
        }
    }
}

/// Converts one note's attribute runs to Markdown. Fragments are processed
/// strictly in order: list numbering and open blocks carry from one to the
/// next.
pub struct NoteConverter<'c, 'a> {
    ctx: &'c ConvertContext<'a>,
    list: ListCounter,
    multi_run: MultiRun,
}

impl<'c, 'a> NoteConverter<'c, 'a> {
    pub fn new(ctx: &'c ConvertContext<'a>) -> Self {
        Self {
            ctx,
            list: ListCounter::default(),
            multi_run: MultiRun::None,
        }
    }

    pub async fn format(&mut self, note: &Note) -> Result<String, ConvertError> {
        self.convert(note, false).await
    }

    /// Render a note that lives in a table cell: never drops a title line,
    /// and keeps the result on one Markdown table row.
    pub async fn format_table_cell(&mut self, note: &Note) -> Result<String, ConvertError> {
        self.convert(note, true).await
    }

    async fn convert(&mut self, note: &Note, in_table: bool) -> Result<String, ConvertError> {
        self.list = ListCounter::default();
        self.multi_run = MultiRun::None;

        let fragments = parse_tokens(note);
        let mut skip_title =
            !in_table && self.ctx.options.omit_first_line && note.text.contains('\n');

        let mut converted = String::new();
        for (j, fragment) in fragments.iter().enumerate() {
            if skip_title {
                let ends_title = fragment.text.contains('\n')
                    || fragment.text.chars().count() > MAX_TITLE_LENGTH
                    || fragment.format.attachment_info.is_some();
                if !ends_title {
                    continue;
                }
                skip_title = false;
            }

            let at_line_start = j == 0 || fragments[j - 1].opens_line_for(&fragment.format);

            let Transition { state, prefix } =
                transition(self.multi_run, &fragment.format, &fragment.text);
            if state != self.multi_run {
                tracing::debug!("block {:?} -> {:?}", self.multi_run, state);
                if self.multi_run == MultiRun::Monospaced {
                    fence_on_own_line(&mut converted);
                }
            }
            self.multi_run = state;
            converted.push_str(&prefix);

            let rendered = self.format_fragment(fragment, at_line_start).await?;
            converted.push_str(&rendered);
        }

        if self.multi_run == MultiRun::Monospaced {
            fence_on_own_line(&mut converted);
        }
        converted.push_str(&finish(self.multi_run));
        self.multi_run = MultiRun::None;

        let converted = converted.trim();
        if in_table {
            Ok(converted.replace('\n', "<br>").replace('|', "&#124;"))
        } else {
            Ok(converted.to_string())
        }
    }

    async fn format_fragment(
        &mut self,
        fragment: &Fragment,
        at_line_start: bool,
    ) -> Result<String, ConvertError> {
        let format = &fragment.format;
        let text = fragment.text.as_str();
        let monospaced = self.multi_run == MultiRun::Monospaced;

        match fragment.kind {
            FragmentKind::Spaces if !monospaced => {
                Ok(collapse_spaces(&self.paragraph(format, text, at_line_start)))
            }
            FragmentKind::Newlines if !monospaced => Ok(text.to_string()),
            _ if monospaced => match &format.attachment_info {
                Some(info) if format.is_hashtag() => format_attachment(self.ctx, info).await,
                _ => Ok(text.to_string()),
            },
            FragmentKind::Content => {
                if let Some(info) = &format.attachment_info {
                    format_attachment(self.ctx, info).await
                } else if self.needs_html(format, text) {
                    self.format_html(format, text, at_line_start).await
                } else {
                    self.format_markdown(format, text, at_line_start).await
                }
            }
            _ => {
                if text.contains('\n') {
                    let paragraph = self.paragraph(format, text, at_line_start);
                    if format.style_type().is_bulleted() {
                        Ok(paragraph.replace(' ', ""))
                    } else {
                        Ok(collapse_spaces(&paragraph))
                    }
                } else {
                    Ok(collapse_spaces(text))
                }
            }
        }
    }

    fn needs_html(&self, format: &Formatting, text: &str) -> bool {
        format.superscript != Baseline::Default
            || (format.underlined && !contains_link(format, text))
            || format.color.is_some()
            || format.font.is_some()
            || self.multi_run == MultiRun::Alignment
    }

    /// Inline HTML, for styling plain Markdown cannot carry.
    async fn format_html(
        &mut self,
        format: &Formatting,
        text: &str,
        at_line_start: bool,
    ) -> Result<String, ConvertError> {
        let features = html_features(format, contains_link(format, text));
        let styled = render_html_inline(text, &features).unwrap_or_else(|_| text.to_string());
        let mut rendered = self.format_link(format, styled).await?;

        if let Some(style) = html_style(format) {
            if let Ok(wrapped) = render_html_inline(&rendered, &[InlineFeature::Style(style)]) {
                rendered = wrapped;
            }
        }

        if at_line_start {
            Ok(self.paragraph(format, &rendered, true))
        } else {
            Ok(rendered)
        }
    }

    async fn format_markdown(
        &mut self,
        format: &Formatting,
        text: &str,
        at_line_start: bool,
    ) -> Result<String, ConvertError> {
        let features = markdown_features(format);
        let styled = render_markdown_inline(text, &features).unwrap_or_else(|_| text.to_string());
        let rendered = self.format_link(format, styled).await?;

        if at_line_start {
            Ok(self.paragraph(format, &rendered, true))
        } else if !features.is_empty() {
            // Keep delimiters from fusing with the preceding text.
            Ok(format!(" {rendered}"))
        } else {
            Ok(rendered)
        }
    }

    /// Wrap in a link when the link differs from the visible text. Links to
    /// other notes become vault links instead.
    async fn format_link(
        &self,
        format: &Formatting,
        text: String,
    ) -> Result<String, ConvertError> {
        let Some(link) = format.link.as_deref() else {
            return Ok(text);
        };
        if link == text {
            return Ok(text);
        }
        if is_note_uri(link) {
            resolve_internal_link(self.ctx, link, Some(&text)).await
        } else {
            Ok(format!("[{text}]({link})"))
        }
    }

    fn paragraph(&mut self, format: &Formatting, text: &str, at_line_start: bool) -> String {
        format_paragraph(format, text, at_line_start, self.multi_run, &mut self.list)
    }
}

/// A closing fence only counts at the start of a line.
fn fence_on_own_line(converted: &mut String) {
    if !converted.is_empty() && !converted.ends_with('\n') {
        converted.push('\n');
    }
}

fn collapse_spaces(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_space = false;
    for c in text.chars() {
        if c == ' ' {
            if !last_space {
                out.push(c);
            }
            last_space = true;
        } else {
            out.push(c);
            last_space = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fence_on_own_line() {
        let mut code = String::from("let x");
        fence_on_own_line(&mut code);
        assert_eq!(code, "let x\n");
        fence_on_own_line(&mut code);
        assert_eq!(code, "let x\n");
    }

    #[test]
    fn test_collapse_spaces() {
        assert_eq!(collapse_spaces("a   b  c"), "a b c");
        assert_eq!(collapse_spaces(" \n  "), " \n ");
        assert_eq!(collapse_spaces(""), "");
    }
}
