//! # Storage Layer
//!
//! This module owns the on-disk representation of the client collection. The
//! [`StorageBackend`] trait is the only way the rest of the crate touches it.
//!
//! ## One Document, Whole-File Replace
//!
//! All records live in a single JSON document. There is no index and no log:
//! every save serializes the full collection and replaces the file.
//!
//! ```json
//! {
//!   "clients": [
//!     { "id": "…", "name": "…", "last_name": "…", "age": 30, "created_at": "…" }
//!   ]
//! }
//! ```
//!
//! Field names are the persistence contract. Renaming any of them is a breaking
//! format change.
//!
//! ## Load Semantics
//!
//! - **Missing file**: an empty collection. This is the first-run case, not an error.
//! - **Unparseable file**: [`ClientError::Corrupt`]. The store never resets or
//!   repairs a corrupt file; the caller must see the failure.
//! - **Duplicate ids**: also corrupt. The collection on disk must always satisfy
//!   the identity invariant.
//! - **Legacy bare array**: older files hold `[ … ]` without the `clients`
//!   wrapper. They load as-is and are rewritten in the wrapped shape on the
//!   next save.
//!
//! ## Save Semantics
//!
//! Saves are atomic with respect to crashes: content goes to a temporary file in
//! the same directory, is synced, and is then renamed over the target. A reader
//! sees either the old document or the new one, never a partial write.
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: production, one file on disk.
//! - [`mem_backend::MemBackend`]: for testing repository logic without filesystem I/O.

use crate::error::{ClientError, Result};
use crate::model::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub mod backend;
pub mod fs_backend;
pub mod mem_backend;

pub use backend::StorageBackend;

#[derive(Serialize)]
struct DocumentRef<'a> {
    clients: &'a [Client],
}

#[derive(Deserialize)]
struct Document {
    clients: Vec<Client>,
}

/// Serialize the collection in the current (wrapped) document shape.
pub fn encode_document(clients: &[Client]) -> Result<String> {
    serde_json::to_string_pretty(&DocumentRef { clients }).map_err(ClientError::Serialization)
}

/// Parse a stored document. The error string describes why the content is
/// unusable and ends up in [`ClientError::Corrupt`].
pub fn decode_document(content: &str) -> std::result::Result<Vec<Client>, String> {
    if content.trim().is_empty() {
        return Err("file is empty".to_string());
    }

    let value: serde_json::Value =
        serde_json::from_str(content).map_err(|e| format!("invalid JSON: {}", e))?;

    let clients = match value {
        serde_json::Value::Array(_) => serde_json::from_value::<Vec<Client>>(value)
            .map_err(|e| format!("invalid client record: {}", e))?,
        serde_json::Value::Object(_) => {
            serde_json::from_value::<Document>(value)
                .map_err(|e| format!("invalid document: {}", e))?
                .clients
        }
        other => {
            return Err(format!(
                "expected an object with a `clients` list, found {}",
                json_kind(&other)
            ))
        }
    };

    if let Some(dup) = first_duplicate_id(&clients) {
        return Err(format!("duplicate client id {}", dup));
    }
    Ok(clients)
}

pub(crate) fn first_duplicate_id(clients: &[Client]) -> Option<uuid::Uuid> {
    let mut seen = HashSet::with_capacity(clients.len());
    clients.iter().map(|c| c.id).find(|id| !seen.insert(*id))
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ClientDraft;
    use chrono::Utc;
    use uuid::Uuid;

    fn client(name: &str) -> Client {
        Client::new(Uuid::new_v4(), ClientDraft::new(name, "Doe", 30), Utc::now())
    }

    #[test]
    fn test_encode_wraps_in_clients_key() {
        let clients = vec![client("John")];
        let encoded = encode_document(&clients).unwrap();
        let value: serde_json::Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(value["clients"].as_array().unwrap().len(), 1);
        assert_eq!(value["clients"][0]["name"], "John");
    }

    #[test]
    fn test_decode_preserves_order() {
        let clients = vec![client("A"), client("B"), client("C")];
        let decoded = decode_document(&encode_document(&clients).unwrap()).unwrap();
        assert_eq!(decoded, clients);
    }

    #[test]
    fn test_decode_accepts_legacy_bare_array() {
        let clients = vec![client("Legacy")];
        let legacy = serde_json::to_string(&clients).unwrap();
        assert_eq!(decode_document(&legacy).unwrap(), clients);
    }

    #[test]
    fn test_decode_empty_legacy_array() {
        assert!(decode_document("[]").unwrap().is_empty());
    }

    #[test]
    fn test_decode_rejects_empty_file() {
        let err = decode_document("  \n").unwrap_err();
        assert!(err.contains("empty"));
    }

    #[test]
    fn test_decode_rejects_truncated_json() {
        let err = decode_document(r#"{"clients": [{"id": "#).unwrap_err();
        assert!(err.starts_with("invalid JSON"));
    }

    #[test]
    fn test_decode_rejects_wrong_top_level_type() {
        let err = decode_document("42").unwrap_err();
        assert!(err.contains("found a number"));
    }

    #[test]
    fn test_decode_rejects_record_without_id() {
        let json = r#"{"clients": [{"name": "A", "last_name": "B", "age": 1,
            "created_at": "2024-01-01T00:00:00Z"}]}"#;
        let err = decode_document(json).unwrap_err();
        assert!(err.contains("id"));
    }

    #[test]
    fn test_decode_rejects_duplicate_ids() {
        let original = client("Twin");
        let clients = vec![original.clone(), original.clone()];
        let encoded = encode_document(&clients).unwrap();
        let err = decode_document(&encoded).unwrap_err();
        assert_eq!(err, format!("duplicate client id {}", original.id));
    }
}
