//! In-memory collaborators for driving the converter end to end.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use notemark::types::{AttachmentInfo, FontWeight, ParagraphStyle, StyleType};
use notemark::{
    AttributeRun, ConvertContext, ConvertOptions, FileHandle, FileResolver, Formatting, Note,
    ObsidianLinkGenerator, Row, RowQuery, RowStore, ScanConverter, StoreError, SubConverter,
    SubDocumentDecoder, SubDocumentKind, TableConverter,
};

#[derive(Debug, Clone)]
pub enum SubDocument {
    Table(TableConverter),
    Scan(ScanConverter),
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    pub rows: HashMap<String, Row>,
    pub sub_documents: HashMap<String, SubDocument>,
    pub attachments: HashMap<i64, PathBuf>,
    pub notes: HashMap<i64, PathBuf>,
    pub broken: bool,
}

impl MemoryStore {
    pub fn with_row(mut self, identifier: &str, row: Row) -> Self {
        self.rows.insert(identifier.to_string(), row);
        self
    }

    pub fn with_sub_document(mut self, hex: &str, doc: SubDocument) -> Self {
        self.sub_documents.insert(hex.to_string(), doc);
        self
    }

    pub fn with_attachment(mut self, id: i64, path: &str) -> Self {
        self.attachments.insert(id, PathBuf::from(path));
        self
    }

    pub fn with_note(mut self, id: i64, path: &str) -> Self {
        self.notes.insert(id, PathBuf::from(path));
        self
    }
}

#[async_trait]
impl RowStore for MemoryStore {
    async fn query_row(&self, query: RowQuery<'_>) -> Result<Option<Row>, StoreError> {
        if self.broken {
            return Err(StoreError::Query(
                query.sql().to_string(),
                "database is locked".into(),
            ));
        }
        Ok(self.rows.get(query.identifier).cloned())
    }
}

impl SubDocumentDecoder for MemoryStore {
    fn decode(
        &self,
        hex: &str,
        kind: SubDocumentKind,
    ) -> Result<Box<dyn SubConverter>, StoreError> {
        match (self.sub_documents.get(hex), kind) {
            (Some(SubDocument::Table(table)), SubDocumentKind::Table) => Ok(Box::new(table.clone())),
            (Some(SubDocument::Scan(scan)), SubDocumentKind::Scan) => Ok(Box::new(scan.clone())),
            _ => Err(StoreError::Decode(format!("no {kind:?} in {hex}"))),
        }
    }
}

#[async_trait]
impl FileResolver for MemoryStore {
    async fn resolve_attachment_file(&self, id: i64, _type_uti: &str) -> Option<FileHandle> {
        self.attachments.get(&id).map(FileHandle::new)
    }

    async fn resolve_note_file(&self, row_id: i64) -> Option<FileHandle> {
        self.notes.get(&row_id).map(FileHandle::new)
    }
}

pub static LINKS: ObsidianLinkGenerator = ObsidianLinkGenerator {
    style: notemark::LinkStyle::Wiki,
};

pub fn context(store: &MemoryStore, options: ConvertOptions) -> ConvertContext<'_> {
    ConvertContext::new(store, store, store, &LINKS, options)
}

pub async fn convert(store: &MemoryStore, note: &Note) -> String {
    convert_with(store, ConvertOptions::default(), note).await
}

pub async fn convert_with(store: &MemoryStore, options: ConvertOptions, note: &Note) -> String {
    let ctx = context(store, options);
    notemark::convert_note(&ctx, note).await.unwrap()
}

/// Build a note from `(text, formatting)` spans, measuring each in UTF-16.
pub fn note(spans: &[(&str, Formatting)]) -> Note {
    let text: String = spans.iter().map(|(t, _)| *t).collect();
    let runs = spans
        .iter()
        .map(|(t, f)| AttributeRun::new(t.encode_utf16().count(), f.clone()))
        .collect();
    Note::new(text, runs)
}

pub fn plain() -> Formatting {
    Formatting::default()
}

pub fn bold() -> Formatting {
    Formatting {
        font_weight: Some(FontWeight::Bold),
        ..Default::default()
    }
}

pub fn styled(style_type: StyleType) -> Formatting {
    paragraph(ParagraphStyle::new(style_type))
}

pub fn paragraph(style: ParagraphStyle) -> Formatting {
    Formatting {
        paragraph_style: Some(style),
        ..Default::default()
    }
}

pub fn attachment(identifier: &str, type_uti: &str) -> Formatting {
    Formatting {
        attachment_info: Some(AttachmentInfo::new(identifier, type_uti)),
        ..Default::default()
    }
}

pub const OBJECT: &str = "\u{fffc}";
