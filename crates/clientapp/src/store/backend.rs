use crate::error::Result;
use crate::model::Client;
use std::path::PathBuf;

/// Raw persistence for the client collection.
///
/// Implementations are shared across request threads, so every method takes
/// `&self` and the trait requires `Send + Sync`. Serializing writers is the
/// repository's job, not the backend's.
pub trait StorageBackend: Send + Sync {
    /// Load every stored record in insertion order.
    /// Returns an empty collection if nothing has been saved yet.
    fn load_clients(&self) -> Result<Vec<Client>>;

    /// Replace the stored collection.
    /// MUST be atomic (e.g. write to tmp then rename) to avoid partial writes.
    fn save_clients(&self, clients: &[Client]) -> Result<()>;

    /// Where the collection lives. For `MemBackend`, a virtual path.
    fn location(&self) -> PathBuf;
}
