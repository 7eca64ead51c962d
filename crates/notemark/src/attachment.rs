//! Resolve attachment references (tags, note links, tables, files...) into
//! Markdown.

use crate::converter::ConvertContext;
use crate::error::ConvertError;
use crate::links::resolve_internal_link;
use crate::store::{RowKind, SubDocumentKind};
use crate::types::{AttachmentInfo, AttachmentKind};

pub const ERROR_READING_ATTACHMENT: &str = " **(error reading attachment)**";

pub fn unknown_attachment(type_uti: &str) -> String {
    format!(" **(unknown attachment: {type_uti})** ")
}

pub async fn format_attachment(
    ctx: &ConvertContext<'_>,
    info: &AttachmentInfo,
) -> Result<String, ConvertError> {
    let id = info.attachment_identifier.as_str();
    let kind = info.kind();
    tracing::debug!("resolving {:?} attachment {}", kind, id);

    let (row_id, handwriting) = match kind {
        AttachmentKind::Hashtag | AttachmentKind::Mention => {
            let alt_text = ctx
                .query(RowKind::AltText, id)
                .await
                .and_then(|row| row.alt_text);
            return Ok(alt_text.unwrap_or_else(|| unknown_attachment(&info.type_uti)));
        }
        AttachmentKind::InternalLink => {
            let uri = ctx
                .query(RowKind::TokenContentIdentifier, id)
                .await
                .and_then(|row| row.token_content_identifier);
            return match uri {
                Some(uri) => resolve_internal_link(ctx, &uri, None).await,
                None => Ok(unknown_attachment(&info.type_uti)),
            };
        }
        AttachmentKind::Table => {
            return format_sub_document(ctx, info, SubDocumentKind::Table).await;
        }
        AttachmentKind::Scan => {
            return format_sub_document(ctx, info, SubDocumentKind::Scan).await;
        }
        AttachmentKind::UrlCard => {
            let Some(row) = ctx.query(RowKind::UrlCard, id).await else {
                return Ok(unknown_attachment(&info.type_uti));
            };
            let url = row.url_string.unwrap_or_default();
            let title = row.title.unwrap_or_else(|| url.clone());
            return Ok(format!("[**{title}**]({url})"));
        }
        ref drawing if drawing.is_drawing() => match ctx.query(RowKind::Drawing, id).await {
            Some(row) => (row.primary_key, row.handwriting_summary),
            None => (None, None),
        },
        _ => {
            let media = ctx.query(RowKind::Media, id).await.and_then(|row| row.media);
            (media, None)
        }
    };

    let Some(row_id) = row_id else {
        // No file behind it
        return Ok(unknown_attachment(&info.type_uti));
    };

    let mut link = match ctx.files.resolve_attachment_file(row_id, &info.type_uti).await {
        Some(file) => format!("\n{}\n", ctx.links.generate_link(&file, "/", None)),
        None => {
            tracing::warn!("could not materialise attachment {} ({})", id, row_id);
            ERROR_READING_ATTACHMENT.to_string()
        }
    };

    if let Some(summary) = handwriting.filter(|_| ctx.options.include_handwriting) {
        link = format!(
            "\n> [!Handwriting]-\n> {}{}",
            summary.replace('\n', "\n> "),
            link
        );
    }

    Ok(link)
}

async fn format_sub_document(
    ctx: &ConvertContext<'_>,
    info: &AttachmentInfo,
    kind: SubDocumentKind,
) -> Result<String, ConvertError> {
    let hex = ctx
        .query(RowKind::MergeableData, &info.attachment_identifier)
        .await
        .and_then(|row| row.hex_data);
    let Some(hex) = hex else {
        return Ok(unknown_attachment(&info.type_uti));
    };

    match ctx.decoder.decode(&hex, kind) {
        Ok(converter) => converter.format(ctx).await,
        Err(e) => {
            tracing::warn!(
                "failed to decode {:?} {}: {}",
                kind,
                info.attachment_identifier,
                e
            );
            Ok(ERROR_READING_ATTACHMENT.to_string())
        }
    }
}
