//! Model-level unit tests.

use super::snippet::*;
use chrono::Utc;

#[test]
fn resolve_language_defaults_to_plaintext() {
    let cases = [
        (None, "plaintext"),
        (Some(""), "plaintext"),
        (Some("   "), "plaintext"),
        (Some("python"), "python"),
        (Some("  rust \n"), "rust"),
    ];
    for (input, expected) in cases {
        assert_eq!(
            resolve_language(input.map(str::to_string)),
            expected,
            "input: {:?}",
            input
        );
    }
}

#[test]
fn normalize_optional_drops_blank_values() {
    assert_eq!(normalize_optional(None), None);
    assert_eq!(normalize_optional(Some(" \t".to_string())), None);
    assert_eq!(
        normalize_optional(Some(" hello ".to_string())),
        Some("hello".to_string())
    );
}

#[test]
fn generate_id_returns_distinct_values() {
    let a = generate_id();
    let b = generate_id();
    assert!(!a.is_empty());
    assert_ne!(a, b);
}

#[test]
fn new_snippet_omits_absent_fields_on_the_wire() {
    let snippet = NewSnippet {
        id: None,
        content: "print('hi')".to_string(),
        language: "python".to_string(),
        title: None,
        created_at: Utc::now(),
        expires_at: None,
    };
    let value = serde_json::to_value(&snippet).expect("encode");
    assert!(value.get("id").is_none());
    assert!(value.get("title").is_none());
    assert!(value.get("expires_at").is_none());
    assert_eq!(value["content"], "print('hi')");
    assert_eq!(value["language"], "python");
    assert!(value["created_at"].is_string());
}

#[test]
fn snippet_decodes_rows_without_optional_columns() {
    let row = serde_json::json!({
        "id": "abc",
        "content": "body",
        "created_at": "2024-05-01T12:00:00+00:00"
    });
    let snippet: Snippet = serde_json::from_value(row).expect("decode");
    assert_eq!(snippet.language, "plaintext");
    assert!(snippet.title.is_none());
    assert!(snippet.expires_at.is_none());
}

#[test]
fn create_request_tolerates_missing_content() {
    let request: CreateSnippetRequest =
        serde_json::from_str(r#"{"language":"go"}"#).expect("decode");
    assert!(request.content.is_empty());
    assert_eq!(request.language.as_deref(), Some("go"));
}

#[test]
fn compact_snippet_carries_content_as_code() {
    let snippet = NewSnippet {
        id: None,
        content: "let x = 1;".to_string(),
        language: "rust".to_string(),
        title: Some("demo".to_string()),
        created_at: Utc::now(),
        expires_at: None,
    }
    .into_snippet("id-1".to_string());
    assert_eq!(snippet.id, "id-1");
    let compact = CompactSnippet::from(snippet);
    assert_eq!(compact.code, "let x = 1;");
}

#[test]
fn snippet_survives_bincode_storage_encoding() {
    let snippet = NewSnippet {
        id: None,
        content: "body".to_string(),
        language: "plaintext".to_string(),
        title: None,
        created_at: Utc::now(),
        expires_at: Some(Utc::now()),
    }
    .into_snippet("stored".to_string());
    let bytes = bincode::serialize(&snippet).expect("encode");
    let decoded: Snippet = bincode::deserialize(&bytes).expect("decode");
    assert_eq!(decoded, snippet);
}
