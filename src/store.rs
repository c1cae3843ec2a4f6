use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};

use rand::Rng;
use rand::distr::Alphanumeric;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::constants::DOCUMENT_ID_LEN;
use crate::error::StoreError;

pub type DocumentId = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub id: DocumentId,
    pub data: Value,
}

/// Where guest responses end up. Implementations decide durability; callers
/// only see an id back or an error.
pub trait DocumentStore {
    fn submit(&mut self, collection: &str, document: Value) -> Result<DocumentId, StoreError>;
    fn query(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError>;
}

/// Random alphanumeric id, the same shape as hosted document stores hand out.
pub fn new_document_id() -> DocumentId {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(DOCUMENT_ID_LEN)
        .map(char::from)
        .collect()
}

fn check_collection(collection: &str) -> Result<(), StoreError> {
    let valid = !collection.is_empty()
        && collection
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidCollection(collection.to_string()))
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: HashMap<String, Vec<StoredDocument>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryStore {
    fn submit(&mut self, collection: &str, document: Value) -> Result<DocumentId, StoreError> {
        check_collection(collection)?;
        let id = new_document_id();
        self.collections
            .entry(collection.to_string())
            .or_default()
            .push(StoredDocument { id: id.clone(), data: document });
        Ok(id)
    }

    fn query(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError> {
        check_collection(collection)?;
        Ok(self.collections.get(collection).cloned().unwrap_or_default())
    }
}

/// Appends each collection to `<dir>/<collection>.jsonl`, one document per line.
#[derive(Debug, Clone)]
pub struct JsonlStore {
    dir: PathBuf,
}

impl JsonlStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn collection_path(&self, collection: &str) -> PathBuf {
        self.dir.join(format!("{collection}.jsonl"))
    }
}

impl DocumentStore for JsonlStore {
    fn submit(&mut self, collection: &str, document: Value) -> Result<DocumentId, StoreError> {
        check_collection(collection)?;
        let path = self.collection_path(collection);
        let record = StoredDocument {
            id: new_document_id(),
            data: document,
        };
        let mut line = serde_json::to_string(&record)?;
        line.push('\n');

        let io_err = |source| StoreError::Io {
            path: path.clone(),
            source,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(io_err)?;
        file.write_all(line.as_bytes()).map_err(io_err)?;

        debug!(path = %path.display(), id = %record.id, "document appended");
        Ok(record.id)
    }

    fn query(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError> {
        check_collection(collection)?;
        let path = self.collection_path(collection);
        let file = match fs::File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        let mut documents = Vec::new();
        for (i, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let document = serde_json::from_str(&line).map_err(|source| StoreError::Corrupt {
                path: path.clone(),
                line: i + 1,
                source,
            })?;
            documents.push(document);
        }
        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn ids_are_twenty_alphanumerics() {
        let id = new_document_id();
        assert_eq!(id.len(), DOCUMENT_ID_LEN);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(id, new_document_id());
    }

    #[test]
    fn memory_store_keeps_collections_apart() {
        let mut store = MemoryStore::new();
        let id = store.submit("rsvp", json!({ "name": "Ana" })).unwrap();
        store.submit("other", json!({})).unwrap();

        let docs = store.query("rsvp").unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, id);
        assert_eq!(docs[0].data["name"], "Ana");
        assert!(store.query("missing").unwrap().is_empty());
    }

    #[test]
    fn collection_names_cannot_escape_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonlStore::open(dir.path()).unwrap();
        let err = store.submit("../rsvp", json!({})).unwrap_err();
        assert!(matches!(err, StoreError::InvalidCollection(_)));
        assert!(matches!(store.query(""), Err(StoreError::InvalidCollection(_))));
    }

    #[test]
    fn jsonl_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let first = {
            let mut store = JsonlStore::open(dir.path().join("data")).unwrap();
            store.submit("rsvp", json!({ "name": "Ana", "party_size": 2 })).unwrap()
        };

        let mut store = JsonlStore::open(dir.path().join("data")).unwrap();
        let second = store.submit("rsvp", json!({ "name": "Luis", "party_size": 1 })).unwrap();

        let docs = store.query("rsvp").unwrap();
        assert_eq!(docs.iter().map(|d| d.id.as_str()).collect::<Vec<_>>(), vec![first.as_str(), second.as_str()]);
        assert_eq!(docs[1].data["party_size"], 1);
        assert!(store.query("empty").unwrap().is_empty());
    }

    #[test]
    fn corrupt_lines_are_reported_with_their_number() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonlStore::open(dir.path()).unwrap();
        store.submit("rsvp", json!({})).unwrap();
        let mut file = OpenOptions::new()
            .append(true)
            .open(dir.path().join("rsvp.jsonl"))
            .unwrap();
        writeln!(file, "{{ broken").unwrap();

        match store.query("rsvp") {
            Err(StoreError::Corrupt { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected corrupt record, got {other:?}"),
        }
    }
}
