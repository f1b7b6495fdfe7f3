//! Loading and compiling XSD schemas from the filesystem.

use std::fs;
use std::path::Path;

use crate::error::{CheckError, Result};
use crate::libxml2::{LibXml2Wrapper, XmlSchemaPtr};

/// Reads an XSD file and compiles it into a reusable schema handle.
pub struct SchemaLoader {
    engine: LibXml2Wrapper,
}

impl SchemaLoader {
    pub fn new() -> Self {
        SchemaLoader {
            engine: LibXml2Wrapper::new(),
        }
    }

    /// Load and compile the schema at `path`.
    ///
    /// The file is read as raw bytes; schema files may declare their own
    /// encoding, so encoding decisions belong to the parser. Missing or
    /// unreadable files, ill-formed XML, and invalid schema definitions all
    /// surface as `CheckError::SchemaLoad` with the engine's detail text.
    pub fn load(&self, path: &Path) -> Result<XmlSchemaPtr> {
        let bytes = fs::read(path).map_err(|e| CheckError::SchemaLoad {
            path: path.to_path_buf(),
            details: e.to_string(),
        })?;

        self.engine
            .parse_schema_from_memory(&bytes)
            .map_err(|e| CheckError::SchemaLoad {
                path: path.to_path_buf(),
                details: e.to_string(),
            })
    }
}

impl Default for SchemaLoader {
    fn default() -> Self {
        Self::new()
    }
}
