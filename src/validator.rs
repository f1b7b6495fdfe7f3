//! Validation engine: runs a compiled schema against a parsed document and
//! packages the engine's diagnostics into a report.
//!
//! A nonconforming document is not an error here. Violations are data,
//! returned inside `ValidationReport`; `Err` is reserved for engine-internal
//! faults, which should not occur once both inputs loaded successfully.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::document_loader::DocumentLoader;
use crate::error::Result;
use crate::libxml2::{Diagnostic, LibXml2Wrapper, ValidationResult, XmlDocPtr, XmlSchemaPtr};
use crate::schema_loader::SchemaLoader;

/// Outcome of validating one document against one schema.
///
/// Diagnostics keep the engine's reporting order: document order as libxml2
/// walks the instance, never sorted or deduplicated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
    pub fn valid() -> Self {
        ValidationReport {
            diagnostics: Vec::new(),
        }
    }

    /// A document is valid exactly when the engine reported nothing.
    pub fn is_valid(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.len()
    }
}

impl From<ValidationResult> for ValidationReport {
    fn from(result: ValidationResult) -> Self {
        match result {
            ValidationResult::Valid => ValidationReport::valid(),
            ValidationResult::Invalid { code, diagnostics } => {
                // libxml2 always pairs a nonzero return with at least one
                // structured error; if that ever breaks, keep the verdict
                // honest with an unlocalized diagnostic.
                let diagnostics = if diagnostics.is_empty() {
                    vec![Diagnostic {
                        line: 0,
                        column: 0,
                        message: format!("schema validation failed (libxml2 code {})", code),
                    }]
                } else {
                    diagnostics
                };
                ValidationReport { diagnostics }
            }
            ValidationResult::InternalError { code } => {
                // Filtered out by the wrapper before reaching here.
                ValidationReport {
                    diagnostics: vec![Diagnostic {
                        line: 0,
                        column: 0,
                        message: format!("libxml2 internal error {}", code),
                    }],
                }
            }
        }
    }
}

/// Single-shot validation engine owning the libxml2 wrapper and both
/// loaders. All operations are synchronous and blocking; one run touches
/// two files, each opened once and released as soon as it is read.
pub struct ValidationEngine {
    wrapper: LibXml2Wrapper,
    schema_loader: SchemaLoader,
    document_loader: DocumentLoader,
}

impl ValidationEngine {
    pub fn new() -> Self {
        ValidationEngine {
            wrapper: LibXml2Wrapper::new(),
            schema_loader: SchemaLoader::new(),
            document_loader: DocumentLoader::new(),
        }
    }

    /// Run the full conformance check of `doc` against `schema`: element
    /// and attribute presence and order, types and facets, namespaces,
    /// cardinality.
    pub fn validate(&self, schema: &XmlSchemaPtr, doc: &XmlDocPtr) -> Result<ValidationReport> {
        let result = self.wrapper.validate_document(schema, doc)?;
        Ok(ValidationReport::from(result))
    }

    /// Load both inputs and validate: schema first, so a broken schema
    /// aborts before the document is ever parsed, then document, then the
    /// conformance check.
    pub fn validate_files(&self, xml_path: &Path, xsd_path: &Path) -> Result<ValidationReport> {
        let schema = self.schema_loader.load(xsd_path)?;
        let doc = self.document_loader.load(xml_path)?;
        self.validate(&schema, &doc)
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new()
    }
}
