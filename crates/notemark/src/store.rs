//! Interfaces to the collaborators the converter consults: the source
//! database, the binary sub-document decoders, the vault that materialises
//! attachment files, and the link generator.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::converter::ConvertContext;
use crate::error::{ConvertError, StoreError};

/// The column set a lookup reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowKind {
    AltText,
    TokenContentIdentifier,
    MergeableData,
    UrlCard,
    Drawing,
    Media,
    NotePrimaryKey,
}

impl RowKind {
    /// SQL for stores backed by the source database; binds the identifier
    /// as the single parameter.
    pub fn sql(self) -> &'static str {
        match self {
            Self::AltText => {
                "SELECT zalttext FROM ziccloudsyncingobject WHERE zidentifier = ?1"
            }
            Self::TokenContentIdentifier => {
                "SELECT ztokencontentidentifier FROM ziccloudsyncingobject WHERE zidentifier = ?1"
            }
            Self::MergeableData => {
                "SELECT hex(zmergeabledata1) AS zhexdata FROM ziccloudsyncingobject WHERE zidentifier = ?1"
            }
            Self::UrlCard => {
                "SELECT ztitle, zurlstring FROM ziccloudsyncingobject WHERE zidentifier = ?1"
            }
            Self::Drawing => {
                "SELECT z_pk, zhandwritingsummary FROM (SELECT *, NULL AS zhandwritingsummary FROM ziccloudsyncingobject) WHERE zidentifier = ?1"
            }
            Self::Media => "SELECT zmedia FROM ziccloudsyncingobject WHERE zidentifier = ?1",
            Self::NotePrimaryKey => {
                "SELECT z_pk FROM ziccloudsyncingobject WHERE zidentifier = ?1"
            }
        }
    }
}

/// A keyed single-row lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowQuery<'a> {
    pub kind: RowKind,
    pub identifier: &'a str,
}

impl<'a> RowQuery<'a> {
    pub fn new(kind: RowKind, identifier: &'a str) -> Self {
        Self { kind, identifier }
    }

    pub fn sql(&self) -> &'static str {
        self.kind.sql()
    }
}

/// Columns a lookup may return. Only those named by the query's
/// [`RowKind`] are read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Row {
    pub alt_text: Option<String>,
    pub token_content_identifier: Option<String>,
    pub hex_data: Option<String>,
    pub title: Option<String>,
    pub url_string: Option<String>,
    pub primary_key: Option<i64>,
    pub handwriting_summary: Option<String>,
    pub media: Option<i64>,
}

/// A file in the output vault.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileHandle {
    pub path: PathBuf,
}

impl FileHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_markdown(&self) -> bool {
        self.path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
    }

    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubDocumentKind {
    Table,
    Scan,
}

#[async_trait]
pub trait RowStore: Send + Sync {
    async fn query_row(&self, query: RowQuery<'_>) -> Result<Option<Row>, StoreError>;
}

/// Turns a hex-encoded embedded document into something that can render it.
pub trait SubDocumentDecoder: Send + Sync {
    fn decode(
        &self,
        hex: &str,
        kind: SubDocumentKind,
    ) -> Result<Box<dyn SubConverter>, StoreError>;
}

#[async_trait]
pub trait SubConverter: Send + Sync {
    async fn format(&self, ctx: &ConvertContext<'_>) -> Result<String, ConvertError>;
}

#[async_trait]
pub trait FileResolver: Send + Sync {
    /// Write out or locate the file behind an attachment row.
    async fn resolve_attachment_file(&self, id: i64, type_uti: &str) -> Option<FileHandle>;
    /// Locate the converted file for another note.
    async fn resolve_note_file(&self, row_id: i64) -> Option<FileHandle>;
}

pub trait LinkGenerator: Send + Sync {
    /// A link to `target`, relative to the folder `source_path`.
    fn generate_link(
        &self,
        target: &FileHandle,
        source_path: &str,
        display: Option<&str>,
    ) -> String;
}
