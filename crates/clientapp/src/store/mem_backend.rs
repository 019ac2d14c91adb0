use super::backend::StorageBackend;
use super::{decode_document, encode_document};
use crate::error::{ClientError, Result};
use crate::model::Client;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

const MEMORY_PATH: &str = "memory://clients.json";

/// In-memory storage backend for testing.
///
/// Holds the serialized document text rather than a `Vec<Client>` so that the
/// same encode/decode path as the filesystem runs, and so tests can plant a
/// corrupt document.
#[derive(Default)]
pub struct MemBackend {
    document: RwLock<Option<String>>,
    simulate_write_error: AtomicBool,
    saves: AtomicUsize,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.store(simulate, Ordering::SeqCst);
    }

    /// Replace the stored document with arbitrary text.
    pub fn set_raw_document(&self, raw: &str) {
        if let Ok(mut doc) = self.document.write() {
            *doc = Some(raw.to_string());
        }
    }

    pub fn raw_document(&self) -> Option<String> {
        self.document.read().ok().and_then(|doc| doc.clone())
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl StorageBackend for MemBackend {
    fn load_clients(&self) -> Result<Vec<Client>> {
        let doc = self
            .document
            .read()
            .map_err(|_| ClientError::LockPoisoned("load"))?;
        match doc.as_deref() {
            None => Ok(Vec::new()),
            Some(content) => decode_document(content).map_err(|reason| ClientError::Corrupt {
                path: PathBuf::from(MEMORY_PATH),
                reason,
            }),
        }
    }

    fn save_clients(&self, clients: &[Client]) -> Result<()> {
        if self.simulate_write_error.load(Ordering::SeqCst) {
            return Err(ClientError::Store("Simulated write error".to_string()));
        }
        let content = encode_document(clients)?;
        let mut doc = self
            .document
            .write()
            .map_err(|_| ClientError::LockPoisoned("save"))?;
        *doc = Some(content);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn location(&self) -> PathBuf {
        PathBuf::from(MEMORY_PATH)
    }
}
