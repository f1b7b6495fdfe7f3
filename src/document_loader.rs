//! Loading XML documents from the filesystem.

use std::fs;
use std::path::Path;

use crate::error::{CheckError, Result};
use crate::libxml2::{LibXml2Wrapper, XmlDocPtr};

/// Reads an XML file and parses it, checking well-formedness only.
/// Schema conformance is the validator's job.
pub struct DocumentLoader {
    engine: LibXml2Wrapper,
}

impl DocumentLoader {
    pub fn new() -> Self {
        DocumentLoader {
            engine: LibXml2Wrapper::new(),
        }
    }

    /// Load and parse the document at `path`.
    ///
    /// The file is read as raw bytes so the parser owns encoding decisions.
    /// The path is handed to the engine as the document URL, so parse
    /// messages name the file. Missing or unreadable files and
    /// well-formedness failures (unclosed tags, invalid characters,
    /// encoding mismatch) surface as `CheckError::DocumentLoad`.
    pub fn load(&self, path: &Path) -> Result<XmlDocPtr> {
        let bytes = fs::read(path).map_err(|e| CheckError::DocumentLoad {
            path: path.to_path_buf(),
            details: e.to_string(),
        })?;

        let url = path.to_string_lossy();
        self.engine
            .parse_document_from_memory(&bytes, Some(&url))
            .map_err(|e| CheckError::DocumentLoad {
                path: path.to_path_buf(),
                details: e.to_string(),
            })
    }
}

impl Default for DocumentLoader {
    fn default() -> Self {
        Self::new()
    }
}
