// SPDX-License-Identifier: MIT OR Apache-2.0
//! Loading a coder catalog from disk and resolving wrapped errors against it.

use std::io::Write;
use wc_errors::{CatalogError, CoderCatalog, Format, ResultExt, coder, inspect};

const CATALOG: &str = r#"
[[coder]]
code = 21000
http_status = 400
message = "Request payload is not valid JSON"
reference = "https://docs.example.com/errors#21000"

[[coder]]
code = 21001
http_status = 404
message = "Resource not found"

[[coder]]
code = 21002
message = "Storage unavailable"
"#;

fn write_catalog(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn load_register_and_resolve() {
    let file = write_catalog(CATALOG);
    let catalog = CoderCatalog::from_file(file.path()).unwrap();
    assert_eq!(catalog.register_all().unwrap(), 3);

    let parsed: Result<serde_json::Value, serde_json::Error> = serde_json::from_str("{oops");
    let err = parsed.wrapc(21_000, "decoding request body").unwrap_err();

    let resolved = err.coder();
    assert_eq!(resolved.http_status(), 400);
    assert_eq!(resolved.message(), "Request payload is not valid JSON");
    assert_eq!(resolved.reference(), "https://docs.example.com/errors#21000");
    assert!(inspect::find::<serde_json::Error>(&err).is_some());

    let storage = coder::lookup(21_002);
    assert_eq!(storage.http_status(), 500, "http_status defaults to 500");

    let detail = err.display(Format::Detail).to_string();
    assert!(detail.contains("(21000) Request payload is not valid JSON"), "{detail}");

    let mut codes = coder::registered_codes();
    codes.retain(|c| (21_000..21_100).contains(c));
    assert_eq!(codes, vec![21_000, 21_001, 21_002]);
}

#[test]
fn invalid_catalog_registers_nothing() {
    let file = write_catalog(
        r#"
[[coder]]
code = 21500
message = "fine"

[[coder]]
code = 21501
http_status = 700
message = "bad status"
"#,
    );
    let catalog = CoderCatalog::from_file(file.path()).unwrap();
    match catalog.register_all() {
        Err(CatalogError::ValidationError { reasons }) => {
            assert_eq!(reasons.len(), 1, "{reasons:?}");
            assert!(reasons[0].contains("21501"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(!coder::is_registered(21_500));
}

#[test]
fn malformed_file_is_parse_error() {
    let file = write_catalog("[[coder]]\ncode = 21600\nmessage = ");
    let err = CoderCatalog::from_file(file.path()).unwrap_err();
    assert!(matches!(err, CatalogError::ParseError { .. }), "{err}");
}

#[test]
fn schema_lists_entry_fields() {
    let schema = serde_json::to_value(wc_errors::catalog::catalog_schema()).unwrap();
    let text = schema.to_string();
    for field in ["code", "http_status", "message", "reference"] {
        assert!(text.contains(field), "schema lacks {field}: {text}");
    }
}
