//! Safe wrapper around libxml2 FFI for XML parsing and XML Schema validation.
//!
//! The Rust ecosystem has no mature pure-Rust XSD validator, so schema
//! conformance is delegated to libxml2 behind this module. Nothing outside
//! this file touches a raw pointer.
//!
//! ## Thread safety
//!
//! Per the libxml2 documentation (http://xmlsoft.org/threads.html):
//! - global initialization is NOT thread-safe: guarded by `std::sync::Once`;
//! - parsing (documents and schemas) is NOT thread-safe: serialized behind
//!   `PARSE_LOCK`, which also makes the process-global structured error
//!   handler installed during parsing sound;
//! - validation IS thread-safe for distinct validation contexts, and parsed
//!   schema structures are safe to share read-only, hence the Arc-backed
//!   `XmlSchemaPtr`.

use std::ffi::{CStr, CString};
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, Once, PoisonError};

use libc::{c_char, c_int, c_void};
use serde::{Deserialize, Serialize};

use crate::error::{LibXml2Error, LibXml2Result};

/// One-time libxml2 parser initialization.
static LIBXML2_INIT: Once = Once::new();

/// Serializes parse operations; libxml2's parser is not thread-safe and the
/// structured error handler used to capture parse diagnostics is global.
static PARSE_LOCK: Mutex<()> = Mutex::new(());

// Opaque libxml2 structures
#[repr(C)]
pub struct XmlDoc {
    _private: [u8; 0],
}

#[repr(C)]
pub struct XmlSchema {
    _private: [u8; 0],
}

#[repr(C)]
pub struct XmlSchemaParserCtxt {
    _private: [u8; 0],
}

#[repr(C)]
pub struct XmlSchemaValidCtxt {
    _private: [u8; 0],
}

#[cfg_attr(target_os = "windows", link(name = "libxml2"))]
#[cfg_attr(not(target_os = "windows"), link(name = "xml2"))]
unsafe extern "C" {
    pub fn xmlInitParser();

    // Document parsing
    pub fn xmlReadMemory(
        buffer: *const c_char,
        size: c_int,
        url: *const c_char,
        encoding: *const c_char,
        options: c_int,
    ) -> *mut XmlDoc;
    pub fn xmlFreeDoc(doc: *mut XmlDoc);

    // Process-global structured error hook; only touched under PARSE_LOCK
    pub fn xmlSetStructuredErrorFunc(ctx: *mut c_void, handler: XmlStructuredErrorFunc);

    // Schema parsing
    pub fn xmlSchemaNewMemParserCtxt(
        buffer: *const c_char,
        size: c_int,
    ) -> *mut XmlSchemaParserCtxt;
    pub fn xmlSchemaSetParserStructuredErrors(
        ctxt: *mut XmlSchemaParserCtxt,
        serror: XmlStructuredErrorFunc,
        ctx: *mut c_void,
    );
    pub fn xmlSchemaParse(ctxt: *const XmlSchemaParserCtxt) -> *mut XmlSchema;
    pub fn xmlSchemaFreeParserCtxt(ctxt: *mut XmlSchemaParserCtxt);
    pub fn xmlSchemaFree(schema: *mut XmlSchema);

    // Schema validation
    pub fn xmlSchemaNewValidCtxt(schema: *const XmlSchema) -> *mut XmlSchemaValidCtxt;
    pub fn xmlSchemaFreeValidCtxt(ctxt: *mut XmlSchemaValidCtxt);
    pub fn xmlSchemaValidateDoc(ctxt: *mut XmlSchemaValidCtxt, doc: *mut XmlDoc) -> c_int;
    pub fn xmlSchemaSetValidStructuredErrors(
        ctxt: *mut XmlSchemaValidCtxt,
        serror: XmlStructuredErrorFunc,
        ctx: *mut c_void,
    );
}

/// Mirror of libxml2's `xmlError` record. `int2` carries the column.
#[repr(C)]
pub struct xmlError {
    pub domain: c_int,
    pub code: c_int,
    pub message: *const c_char,
    pub level: c_int,
    pub file: *const c_char,
    pub line: c_int,
    pub str1: *const c_char,
    pub str2: *const c_char,
    pub str3: *const c_char,
    pub int1: c_int,
    pub int2: c_int,
    pub ctxt: *mut c_void,
    pub node: *mut c_void,
}

pub type XmlStructuredErrorFunc =
    Option<unsafe extern "C" fn(user_data: *mut c_void, error: *mut xmlError)>;

/// A single engine-reported problem with its location.
///
/// `line` and `column` are exactly what libxml2 reported; `0` means the
/// engine could not localize the error. Diagnostics keep the engine's
/// reporting order and are never deduplicated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub line: i32,
    pub column: i32,
    pub message: String,
}

/// Callback for libxml2 structured error reports.
///
/// `user_data` must point to a live `Vec<Diagnostic>` for the duration of
/// the libxml2 call it is registered on.
unsafe extern "C" fn structured_error_callback(user_data: *mut c_void, error: *mut xmlError) {
    if user_data.is_null() || error.is_null() {
        return;
    }
    let sink = unsafe { &mut *(user_data as *mut Vec<Diagnostic>) };

    let (line, column, message) = unsafe {
        let msg_ptr = (*error).message;
        let message = if msg_ptr.is_null() {
            String::from("unknown libxml2 error")
        } else {
            CStr::from_ptr(msg_ptr).to_string_lossy().trim().to_string()
        };
        ((*error).line, (*error).int2, message)
    };

    sink.push(Diagnostic {
        line,
        column,
        message,
    });
}

/// Render captured parse diagnostics into a one-line `details` string for
/// load errors.
fn join_details(diagnostics: &[Diagnostic]) -> String {
    if diagnostics.is_empty() {
        return String::from("no further detail from libxml2");
    }
    diagnostics
        .iter()
        .map(|d| {
            if d.line > 0 {
                format!("line {}: {}", d.line, d.message)
            } else {
                d.message.clone()
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Thread-safe owner of a compiled libxml2 schema.
///
/// The pointer is freed exactly once when the last clone drops. Parsed
/// schemas are read-only and documented thread-safe, so the wrapper is
/// `Send + Sync` and cheap to clone.
#[derive(Debug)]
pub struct XmlSchemaPtr {
    inner: Arc<XmlSchemaInner>,
}

#[derive(Debug)]
struct XmlSchemaInner {
    ptr: *mut XmlSchema,
    _phantom: PhantomData<XmlSchema>,
}

// Safety: libxml2 schema structures are read-only after parsing.
unsafe impl Send for XmlSchemaInner {}
unsafe impl Sync for XmlSchemaInner {}

impl XmlSchemaPtr {
    /// # Safety
    ///
    /// `ptr` must come from `xmlSchemaParse` and must not be freed elsewhere.
    unsafe fn from_raw(ptr: *mut XmlSchema, details: String) -> LibXml2Result<Self> {
        if ptr.is_null() {
            return Err(LibXml2Error::SchemaParseFailed { details });
        }
        Ok(XmlSchemaPtr {
            inner: Arc::new(XmlSchemaInner {
                ptr,
                _phantom: PhantomData,
            }),
        })
    }

    /// Raw pointer for FFI calls; valid only while `self` is alive.
    pub(crate) fn as_ptr(&self) -> *const XmlSchema {
        self.inner.ptr
    }
}

impl Clone for XmlSchemaPtr {
    fn clone(&self) -> Self {
        XmlSchemaPtr {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Drop for XmlSchemaInner {
    fn drop(&mut self) {
        if !self.ptr.is_null() {
            unsafe {
                xmlSchemaFree(self.ptr);
            }
            self.ptr = std::ptr::null_mut();
        }
    }
}

/// Owner of a parsed libxml2 document.
///
/// Exclusively owned and immutable after creation; freed on drop. Unlike
/// schemas, parsed documents carry no thread-safety guarantee, so this type
/// is neither `Clone` nor `Send`.
#[derive(Debug)]
pub struct XmlDocPtr {
    ptr: *mut XmlDoc,
    _phantom: PhantomData<XmlDoc>,
}

impl XmlDocPtr {
    /// # Safety
    ///
    /// `ptr` must come from `xmlReadMemory` and must not be freed elsewhere.
    unsafe fn from_raw(ptr: *mut XmlDoc, details: String) -> LibXml2Result<Self> {
        if ptr.is_null() {
            return Err(LibXml2Error::DocumentParseFailed { details });
        }
        Ok(XmlDocPtr {
            ptr,
            _phantom: PhantomData,
        })
    }

    pub(crate) fn as_ptr(&self) -> *mut XmlDoc {
        self.ptr
    }
}

impl Drop for XmlDocPtr {
    fn drop(&mut self) {
        if !self.ptr.is_null() {
            unsafe {
                xmlFreeDoc(self.ptr);
            }
            self.ptr = std::ptr::null_mut();
        }
    }
}

/// Outcome of one validation run, from the libxml2 return-code contract:
/// 0 = valid, > 0 = schema violations, < 0 = internal fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid {
        code: i32,
        diagnostics: Vec<Diagnostic>,
    },
    InternalError {
        code: i32,
    },
}

impl ValidationResult {
    pub fn from_code(code: c_int, diagnostics: Vec<Diagnostic>) -> Self {
        match code {
            0 => ValidationResult::Valid,
            n if n > 0 => ValidationResult::Invalid {
                code: n,
                diagnostics,
            },
            n => ValidationResult::InternalError { code: n },
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, ValidationResult::Invalid { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ValidationResult::InternalError { .. })
    }
}

/// Safe entry points into libxml2: schema parsing, document parsing, and
/// document validation.
pub struct LibXml2Wrapper {
    _phantom: PhantomData<()>,
}

impl LibXml2Wrapper {
    /// Initializes libxml2 on first use; safe to call any number of times.
    pub fn new() -> Self {
        LIBXML2_INIT.call_once(|| unsafe {
            xmlInitParser();
        });

        LibXml2Wrapper {
            _phantom: PhantomData,
        }
    }

    /// Parse and compile an XSD schema from a byte buffer.
    ///
    /// Fails with `SchemaParseFailed` when the buffer is not well-formed XML
    /// or not a valid schema (malformed facet, undefined type reference, ...);
    /// `details` carries the engine's own diagnostics.
    pub fn parse_schema_from_memory(&self, schema_data: &[u8]) -> LibXml2Result<XmlSchemaPtr> {
        let mut captured: Vec<Diagnostic> = Vec::new();
        let sink = &mut captured as *mut Vec<Diagnostic> as *mut c_void;

        let _guard = PARSE_LOCK.lock().unwrap_or_else(PoisonError::into_inner);

        let schema_ptr = unsafe {
            let parser_ctxt = xmlSchemaNewMemParserCtxt(
                schema_data.as_ptr() as *const c_char,
                schema_data.len() as c_int,
            );
            if parser_ctxt.is_null() {
                return Err(LibXml2Error::MemoryAllocation);
            }

            // Schema-construction errors arrive via the parser context hook;
            // XML syntax errors inside the XSD text via the global hook.
            xmlSchemaSetParserStructuredErrors(
                parser_ctxt,
                Some(structured_error_callback),
                sink,
            );
            xmlSetStructuredErrorFunc(sink, Some(structured_error_callback));

            let ptr = xmlSchemaParse(parser_ctxt);

            xmlSetStructuredErrorFunc(std::ptr::null_mut(), None);
            xmlSchemaFreeParserCtxt(parser_ctxt);

            ptr
        };
        drop(_guard);

        unsafe { XmlSchemaPtr::from_raw(schema_ptr, join_details(&captured)) }
    }

    /// Parse an XML document from a byte buffer, checking well-formedness
    /// only. `url` names the document in engine messages (typically the
    /// file path). Encoding declarations inside the document are honored.
    pub fn parse_document_from_memory(
        &self,
        xml_data: &[u8],
        url: Option<&str>,
    ) -> LibXml2Result<XmlDocPtr> {
        let c_url = url.and_then(|u| CString::new(u).ok());
        let mut captured: Vec<Diagnostic> = Vec::new();
        let sink = &mut captured as *mut Vec<Diagnostic> as *mut c_void;

        let _guard = PARSE_LOCK.lock().unwrap_or_else(PoisonError::into_inner);

        let doc_ptr = unsafe {
            xmlSetStructuredErrorFunc(sink, Some(structured_error_callback));

            let ptr = xmlReadMemory(
                xml_data.as_ptr() as *const c_char,
                xml_data.len() as c_int,
                c_url
                    .as_ref()
                    .map_or(std::ptr::null(), |s| s.as_ptr()),
                std::ptr::null(),
                0,
            );

            xmlSetStructuredErrorFunc(std::ptr::null_mut(), None);

            ptr
        };
        drop(_guard);

        unsafe { XmlDocPtr::from_raw(doc_ptr, join_details(&captured)) }
    }

    /// Validate a parsed document against a compiled schema.
    ///
    /// Schema violations are data: they come back inside
    /// `ValidationResult::Invalid`, in the order the engine reported them.
    /// Only engine-internal faults (negative return codes, context
    /// allocation failure) surface as `Err`.
    pub fn validate_document(
        &self,
        schema: &XmlSchemaPtr,
        doc: &XmlDocPtr,
    ) -> LibXml2Result<ValidationResult> {
        unsafe {
            let valid_ctxt = xmlSchemaNewValidCtxt(schema.as_ptr());
            if valid_ctxt.is_null() {
                return Err(LibXml2Error::ValidationContextCreationFailed);
            }

            let mut diagnostics: Vec<Diagnostic> = Vec::new();
            let sink = &mut diagnostics as *mut Vec<Diagnostic> as *mut c_void;
            xmlSchemaSetValidStructuredErrors(valid_ctxt, Some(structured_error_callback), sink);

            let code = xmlSchemaValidateDoc(valid_ctxt, doc.as_ptr());

            xmlSchemaFreeValidCtxt(valid_ctxt);

            let result = ValidationResult::from_code(code, diagnostics);
            if let ValidationResult::InternalError { code } = result {
                return Err(LibXml2Error::InternalError { code });
            }

            Ok(result)
        }
    }
}

impl Default for LibXml2Wrapper {
    fn default() -> Self {
        Self::new()
    }
}
