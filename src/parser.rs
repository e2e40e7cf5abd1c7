//! JSON export parser for document collections.

use anyhow::{Context, Result, bail};
use serde_json::{Map, Value};

use crate::store::firestore::{decode_document, is_typed_document};

/// Decodes a collection export into plain documents.
///
/// Accepted shapes:
/// - an array of documents,
/// - a REST list response, `{"documents": [...]}` with an optional
///   `nextPageToken`,
/// - an object keyed by document id, whose keys become each document's `id`.
///
/// An object is only read as a list response when `documents` is an array
/// and no other keys besides `nextPageToken` are present. A keyed export
/// whose sole document is an array under the id `documents` is therefore
/// indistinguishable from a list response and is read as one.
///
/// REST-typed documents are decoded wherever they appear.
///
/// # Errors
///
/// Returns an error if the bytes are not JSON or the top level has none of
/// the shapes above.
pub fn parse_documents(bytes: &[u8]) -> Result<Vec<Value>> {
    let root: Value = serde_json::from_slice(bytes).context("export is not valid JSON")?;

    let documents = match root {
        Value::Array(items) => items.into_iter().map(normalize).collect(),
        Value::Object(mut map) if is_list_response(&map) => match map.remove("documents") {
            Some(Value::Array(items)) => items.into_iter().map(normalize).collect(),
            _ => Vec::new(),
        },
        Value::Object(map) => map
            .into_iter()
            .map(|(id, doc)| with_id(normalize(doc), id))
            .collect(),
        _ => bail!("export must be a JSON array or object"),
    };

    Ok(documents)
}

fn is_list_response(map: &Map<String, Value>) -> bool {
    map.get("documents").is_some_and(Value::is_array)
        && map.keys().all(|k| k == "documents" || k == "nextPageToken")
}

fn normalize(doc: Value) -> Value {
    if is_typed_document(&doc) {
        decode_document(&doc)
    } else {
        doc
    }
}

fn with_id(mut doc: Value, id: String) -> Value {
    if let Value::Object(map) = &mut doc {
        map.entry("id").or_insert(Value::String(id));
    }
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_plain_array() {
        let docs = parse_documents(br#"[{"quality": 5}, {"quality": 2}]"#).unwrap();
        assert_eq!(docs, vec![json!({"quality": 5}), json!({"quality": 2})]);
    }

    #[test]
    fn test_parse_keyed_export_assigns_ids() {
        let docs = parse_documents(br#"{"p1": {"name": "Ana"}, "p2": {"id": "x", "name": "Luis"}}"#).unwrap();
        assert_eq!(docs.len(), 2);
        assert!(docs.contains(&json!({"id": "p1", "name": "Ana"})));
        assert!(docs.contains(&json!({"id": "x", "name": "Luis"})));
    }

    #[test]
    fn test_parse_rest_list_response() {
        let body = json!({"documents": [{
            "name": "projects/p/databases/(default)/documents/ratings/r9",
            "fields": {"tags": {"arrayValue": {"values": [{"stringValue": "Divertido"}]}}}
        }]});
        let docs = parse_documents(body.to_string().as_bytes()).unwrap();
        assert_eq!(docs, vec![json!({"id": "r9", "tags": ["Divertido"]})]);
    }

    #[test]
    fn test_parse_empty_object() {
        assert!(parse_documents(b"{}").unwrap().is_empty());
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(parse_documents(b"not json").is_err());
    }

    #[test]
    fn test_parse_scalar_root() {
        assert!(parse_documents(b"42").is_err());
        assert!(parse_documents(b"true").is_err());
    }

    #[test]
    fn test_keyed_export_with_documents_id() {
        let docs = parse_documents(br#"{"documents": {"name": "Docs"}, "p1": {"name": "Ana"}}"#).unwrap();
        assert_eq!(docs.len(), 2);
        assert!(docs.contains(&json!({"id": "documents", "name": "Docs"})));
        assert!(docs.contains(&json!({"id": "p1", "name": "Ana"})));

        let docs = parse_documents(br#"{"documents": 1}"#).unwrap();
        assert_eq!(docs, vec![json!(1)]);
    }

    #[test]
    fn test_list_response_with_page_token() {
        let docs = parse_documents(br#"{"documents": [{"quality": 4}], "nextPageToken": "t"}"#).unwrap();
        assert_eq!(docs, vec![json!({"quality": 4})]);
    }

    #[test]
    fn test_non_object_entries_pass_through() {
        let docs = parse_documents(br#"[1, {"quality": 3}]"#).unwrap();
        assert_eq!(docs[0], json!(1));
    }
}
