use std::path::PathBuf;

use thiserror::Error;

/// Application error type covering every fatal failure mode.
///
/// Schema violations are deliberately absent: a nonconforming document is a
/// normal validation outcome carried as data in a `ValidationReport`, not an
/// error. Everything here aborts the run before a verdict can be reached.
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("failed to load schema {path}: {details}")]
    SchemaLoad { path: PathBuf, details: String },

    #[error("failed to load document {path}: {details}")]
    DocumentLoad { path: PathBuf, details: String },

    #[error("libxml2 internal error: {details}")]
    Engine { details: String },
}

/// LibXML2-specific error types, raised at the FFI boundary.
#[derive(Error, Debug)]
pub enum LibXml2Error {
    #[error("schema parsing failed: {details}")]
    SchemaParseFailed { details: String },

    #[error("document parsing failed: {details}")]
    DocumentParseFailed { details: String },

    #[error("validation context creation failed")]
    ValidationContextCreationFailed,

    #[error("memory allocation failed in libxml2")]
    MemoryAllocation,

    #[error("validation returned internal error code {code}")]
    InternalError { code: i32 },
}

impl From<LibXml2Error> for CheckError {
    fn from(err: LibXml2Error) -> Self {
        CheckError::Engine {
            details: err.to_string(),
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, CheckError>;

/// LibXML2 result type alias
pub type LibXml2Result<T> = std::result::Result<T, LibXml2Error>;
