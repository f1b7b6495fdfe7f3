use divan::Bencher;
use xsd_check::{Diagnostic, LibXml2Wrapper, SourceLines, format_diagnostics};

fn main() {
    divan::main();
}

const SIMPLE_XSD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
    <xs:element name="root">
        <xs:complexType>
            <xs:sequence>
                <xs:element name="child" type="xs:string"/>
            </xs:sequence>
        </xs:complexType>
    </xs:element>
</xs:schema>"#;

const VALID_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<root>
    <child>Valid content</child>
</root>"#;

const INVALID_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<root>
    <invalid>Content</invalid>
</root>"#;

#[divan::bench]
fn parse_schema(bencher: Bencher) {
    let wrapper = LibXml2Wrapper::new();

    bencher.bench_local(move || {
        wrapper
            .parse_schema_from_memory(SIMPLE_XSD.as_bytes())
            .expect("Failed to parse schema")
    });
}

#[divan::bench]
fn parse_document(bencher: Bencher) {
    let wrapper = LibXml2Wrapper::new();

    bencher.bench_local(move || {
        wrapper
            .parse_document_from_memory(VALID_XML.as_bytes(), None)
            .expect("Failed to parse document")
    });
}

#[divan::bench]
fn validate_valid_document(bencher: Bencher) {
    let wrapper = LibXml2Wrapper::new();
    let schema = wrapper
        .parse_schema_from_memory(SIMPLE_XSD.as_bytes())
        .unwrap();
    let doc = wrapper
        .parse_document_from_memory(VALID_XML.as_bytes(), None)
        .unwrap();

    bencher.bench_local(move || {
        wrapper
            .validate_document(&schema, &doc)
            .expect("Validation failed")
    });
}

#[divan::bench]
fn validate_invalid_document(bencher: Bencher) {
    let wrapper = LibXml2Wrapper::new();
    let schema = wrapper
        .parse_schema_from_memory(SIMPLE_XSD.as_bytes())
        .unwrap();
    let doc = wrapper
        .parse_document_from_memory(INVALID_XML.as_bytes(), None)
        .unwrap();

    bencher.bench_local(move || {
        wrapper
            .validate_document(&schema, &doc)
            .expect("Validation failed")
    });
}

#[divan::bench]
fn format_diagnostic_blocks(bencher: Bencher) {
    let source = SourceLines::from_text(INVALID_XML);
    let diagnostics: Vec<Diagnostic> = (0..100)
        .map(|i| Diagnostic {
            line: 3,
            column: 5 + (i % 20),
            message: "Element 'invalid': This element is not expected.".to_string(),
        })
        .collect();

    bencher.bench_local(move || format_diagnostics(&diagnostics, Some(&source)));
}
