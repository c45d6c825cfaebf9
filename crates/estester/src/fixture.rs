//! Fixture documents preloaded before a test body runs.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{EsError, EsResult};

/// A document addressed by `(index, type, id)`.
///
/// The id is opaque and may itself be a URL; it is percent-encoded as a single
/// path segment when the document is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    /// Document type.
    #[serde(rename = "type")]
    pub doc_type: String,
    /// Document id.
    ///
    /// An id of `.` or `..` is dropped when the request path is built, so the
    /// write lands on `/{index}/{type}` instead. Avoid such ids.
    pub id: String,
    /// Document source.
    pub body: Value,
}

impl Fixture {
    /// Creates a new fixture.
    pub fn new(doc_type: impl Into<String>, id: impl Into<String>, body: Value) -> Self {
        Self {
            doc_type: doc_type.into(),
            id: id.into(),
            body,
        }
    }
}

/// Reads a JSON array of fixtures from disk.
pub fn load_fixture_file(path: impl AsRef<Path>) -> EsResult<Vec<Fixture>> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .map_err(|e| EsError::Config(format!("cannot read {}: {}", path.display(), e)))?;
    serde_json::from_str(&raw)
        .map_err(|e| EsError::Config(format!("invalid fixture file {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_type_key_is_renamed() {
        let fixture = Fixture::new("dog", "1", json!({"name": "Nina Fox"}));
        let value = serde_json::to_value(&fixture).unwrap();
        assert_eq!(
            value,
            json!({"type": "dog", "id": "1", "body": {"name": "Nina Fox"}})
        );
    }

    #[test]
    fn test_load_fixture_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dogs.json");
        std::fs::write(
            &path,
            r#"[
                {"type": "dog", "id": "1", "body": {"name": "Nina Fox"}},
                {"type": "internet/dog", "id": "http://dog.com", "body": {"name": "It bytes"}}
            ]"#,
        )
        .unwrap();

        let fixtures = load_fixture_file(&path).unwrap();
        assert_eq!(fixtures.len(), 2);
        assert_eq!(fixtures[1].doc_type, "internet/dog");
        assert_eq!(fixtures[1].id, "http://dog.com");
    }

    #[test]
    fn test_load_fixture_file_rejects_objects() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"type": "dog"}"#).unwrap();

        let err = load_fixture_file(&path).unwrap_err();
        assert!(matches!(err, EsError::Config(_)));
    }
}
