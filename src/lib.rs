//! # xsd-check Library
//!
//! Validates an XML document against an XSD schema and renders each
//! violation with its line/column location and a caret pointer into the
//! offending source line. Schema conformance is delegated to libxml2; this
//! crate owns the loaders, the report model, and the diagnostic formatter.

pub mod cli;
pub mod document_loader;
pub mod error;
pub mod libxml2;
pub mod output;
pub mod schema_loader;
pub mod validator;

pub use cli::Cli;
pub use document_loader::DocumentLoader;
pub use error::{CheckError, LibXml2Error, Result};
pub use libxml2::{Diagnostic, LibXml2Wrapper, ValidationResult, XmlDocPtr, XmlSchemaPtr};
pub use output::{SourceLines, format_diagnostic, format_diagnostics};
pub use schema_loader::SchemaLoader;
pub use validator::{ValidationEngine, ValidationReport};
