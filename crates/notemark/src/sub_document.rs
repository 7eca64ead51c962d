//! Renderers for documents embedded in a note. Decoding their binary
//! payloads is left to a [`SubDocumentDecoder`](crate::store::SubDocumentDecoder);
//! these turn the decoded shape into Markdown.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::attachment::ERROR_READING_ATTACHMENT;
use crate::converter::{ConvertContext, NoteConverter};
use crate::error::ConvertError;
use crate::store::SubConverter;
use crate::types::Note;

/// A table whose cells are notes of their own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableConverter {
    pub rows: Vec<Vec<Note>>,
}

impl TableConverter {
    pub fn new(rows: Vec<Vec<Note>>) -> Self {
        Self { rows }
    }
}

#[async_trait]
impl SubConverter for TableConverter {
    async fn format(&self, ctx: &ConvertContext<'_>) -> Result<String, ConvertError> {
        if self.rows.is_empty() {
            return Ok(String::new());
        }

        let mut md = String::from("\n");
        for (i, row) in self.rows.iter().enumerate() {
            let mut cells = Vec::with_capacity(row.len());
            for cell in row {
                cells.push(NoteConverter::new(ctx).format_table_cell(cell).await?);
            }
            md.push_str("| ");
            md.push_str(&cells.join(" | "));
            md.push_str(" |\n");

            // Header separator
            if i == 0 {
                md.push('|');
                md.push_str(&" -- |".repeat(row.len()));
                md.push('\n');
            }
        }
        md.push('\n');

        Ok(md)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanPage {
    pub media_id: i64,
    pub type_uti: String,
}

/// A document scan: one embedded image per page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConverter {
    pub pages: Vec<ScanPage>,
}

impl ScanConverter {
    pub fn new(pages: Vec<ScanPage>) -> Self {
        Self { pages }
    }
}

#[async_trait]
impl SubConverter for ScanConverter {
    async fn format(&self, ctx: &ConvertContext<'_>) -> Result<String, ConvertError> {
        let mut md = String::new();
        for page in &self.pages {
            match ctx
                .files
                .resolve_attachment_file(page.media_id, &page.type_uti)
                .await
            {
                Some(file) => {
                    md.push('\n');
                    md.push_str(&ctx.links.generate_link(&file, "/", None));
                    md.push('\n');
                }
                None => md.push_str(ERROR_READING_ATTACHMENT),
            }
        }
        Ok(md)
    }
}
