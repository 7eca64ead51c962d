//! A note exported together with every row, sub-document and file it refers
//! to, so it can be converted without the notes database.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use miette::{IntoDiagnostic, Result, WrapErr};
use notemark::{
    FileHandle, FileResolver, Note, Row, RowKind, RowQuery, RowStore, ScanConverter, StoreError,
    SubConverter, SubDocumentDecoder, SubDocumentKind, TableConverter,
};
use serde::Deserialize;

/// An embedded document, already decoded by whatever produced the bundle.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubDocument {
    Table(TableConverter),
    Scan(ScanConverter),
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Bundle {
    pub note: Note,
    /// Lookup rows by attachment identifier.
    pub rows: HashMap<String, Row>,
    /// Uppercased note identifier to note primary key.
    pub note_primary_keys: HashMap<String, i64>,
    /// Sub-documents by the hex payload their row points at.
    pub sub_documents: HashMap<String, SubDocument>,
    pub attachments: HashMap<i64, PathBuf>,
    pub notes: HashMap<i64, PathBuf>,
}

impl Bundle {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let json = tokio::fs::read_to_string(path)
            .await
            .into_diagnostic()
            .wrap_err_with(|| format!("could not read {}", path.display()))?;
        Self::from_json(&json)
            .into_diagnostic()
            .wrap_err_with(|| format!("{} is not a note bundle", path.display()))
    }
}

#[async_trait]
impl RowStore for Bundle {
    async fn query_row(&self, query: RowQuery<'_>) -> Result<Option<Row>, StoreError> {
        if query.kind == RowKind::NotePrimaryKey {
            if let Some(&primary_key) = self.note_primary_keys.get(query.identifier) {
                return Ok(Some(Row {
                    primary_key: Some(primary_key),
                    ..Default::default()
                }));
            }
        }
        Ok(self.rows.get(query.identifier).cloned())
    }
}

impl SubDocumentDecoder for Bundle {
    fn decode(
        &self,
        hex: &str,
        kind: SubDocumentKind,
    ) -> Result<Box<dyn SubConverter>, StoreError> {
        match (self.sub_documents.get(hex), kind) {
            (Some(SubDocument::Table(table)), SubDocumentKind::Table) => {
                Ok(Box::new(table.clone()))
            }
            (Some(SubDocument::Scan(scan)), SubDocumentKind::Scan) => Ok(Box::new(scan.clone())),
            (Some(_), _) => Err(StoreError::Decode(format!(
                "sub-document is not a {kind:?}"
            ))),
            (None, _) => Err(StoreError::Decode(format!(
                "no sub-document for payload of {} bytes",
                hex.len() / 2
            ))),
        }
    }
}

#[async_trait]
impl FileResolver for Bundle {
    async fn resolve_attachment_file(&self, id: i64, type_uti: &str) -> Option<FileHandle> {
        let file = self.attachments.get(&id).map(FileHandle::new);
        if file.is_none() {
            tracing::debug!("bundle has no file for attachment {} ({})", id, type_uti);
        }
        file
    }

    async fn resolve_note_file(&self, row_id: i64) -> Option<FileHandle> {
        self.notes.get(&row_id).map(FileHandle::new)
    }
}
