use miette::Diagnostic;
use thiserror::Error;

/// Conversion failures that abort a note. Missing data never ends up here;
/// it degrades to an inline placeholder instead.
#[derive(Debug, Error, Diagnostic)]
pub enum ConvertError {
    #[error("malformed internal note link: {uri}")]
    #[diagnostic(
        code(notemark::convert::malformed_note_uri),
        help("note links look like applenotes:note/<uuid>")
    )]
    MalformedNoteUri { uri: String },
}

/// Failures reported by the external store and decoders.
#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("row query failed: {0}")]
    #[diagnostic(code(notemark::store::query))]
    Query(String, #[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("failed to decode sub-document: {0}")]
    #[diagnostic(code(notemark::store::decode))]
    Decode(String),
}
