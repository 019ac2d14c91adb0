use super::backend::StorageBackend;
use super::{decode_document, encode_document};
use crate::error::{ClientError, Result};
use crate::model::Client;
use log::debug;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub struct FsBackend {
    path: PathBuf,
}

impl FsBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(|e| ClientError::io(path, e))?;
        }
        Ok(())
    }

    fn tmp_path(&self, dir: &Path) -> PathBuf {
        let stem = self
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("clients");
        dir.join(format!(".{}-{}.tmp", stem, Uuid::new_v4()))
    }
}

fn write_and_sync(path: &Path, content: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content)?;
    file.sync_all()
}

/// Flush the directory entry so a completed rename survives power loss.
#[cfg(unix)]
fn sync_dir(dir: &Path) -> io::Result<()> {
    File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}

impl StorageBackend for FsBackend {
    fn load_clients(&self) -> Result<Vec<Client>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(ClientError::io(&self.path, e)),
        };
        decode_document(&content).map_err(|reason| ClientError::Corrupt {
            path: self.path.clone(),
            reason,
        })
    }

    fn save_clients(&self, clients: &[Client]) -> Result<()> {
        let content = encode_document(clients)?;
        let dir = self.dir();
        self.ensure_dir(&dir)?;

        // Atomic write: same directory so the rename never crosses filesystems
        let tmp_path = self.tmp_path(&dir);
        if let Err(e) = write_and_sync(&tmp_path, content.as_bytes()) {
            let _ = fs::remove_file(&tmp_path);
            return Err(ClientError::io(&tmp_path, e));
        }
        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(ClientError::io(&self.path, e));
        }
        sync_dir(&dir).map_err(|e| ClientError::io(&dir, e))?;

        debug!(
            "event=store_save path={} clients={} bytes={}",
            self.path.display(),
            clients.len(),
            content.len()
        );
        Ok(())
    }

    fn location(&self) -> PathBuf {
        self.path.clone()
    }
}
