//! Notemark
//!
//! Converts notes stored as flat attribute runs (text plus run-length
//! formatting, as a notes app keeps them in its database) into Markdown with
//! a little inline HTML.
//!
//! The pipeline, per note:
//! - [`fragment`] merges runs with identical formatting and cuts the merged
//!   text wherever whitespace touches a line break or a span edge.
//! - [`multi_run`] tracks the blocks (lists, code fences, aligned
//!   paragraphs) that bracket many fragments.
//! - [`converter`] renders each fragment in turn: inline styles via
//!   [`inline`], paragraph prefixes via [`paragraph`], attachments via
//!   [`attachment`].
//!
//! Everything outside the note itself (database rows, binary sub-documents,
//! attachment files, link syntax) comes through the traits in [`store`].

pub mod attachment;
pub mod converter;
pub mod error;
pub mod fragment;
pub mod inline;
pub mod links;
pub mod multi_run;
pub mod options;
pub mod paragraph;
pub mod store;
pub mod sub_document;
pub mod types;

pub use converter::{ConvertContext, NoteConverter};
pub use error::{ConvertError, StoreError};
pub use links::{LinkStyle, ObsidianLinkGenerator};
pub use options::ConvertOptions;
pub use store::{
    FileHandle, FileResolver, LinkGenerator, Row, RowKind, RowQuery, RowStore, SubConverter,
    SubDocumentDecoder, SubDocumentKind,
};
pub use sub_document::{ScanConverter, ScanPage, TableConverter};
pub use types::{AttributeRun, Formatting, Note};

/// Convert a single note with the given collaborators.
pub async fn convert_note(ctx: &ConvertContext<'_>, note: &Note) -> Result<String, ConvertError> {
    NoteConverter::new(ctx).format(note).await
}
