//! # Client Repository
//!
//! [`ClientRepository`] is the single point of truth for client data. It wraps a
//! [`StorageBackend`] and presents CRUD operations as if the collection were an
//! in-memory set, while the backing document stays the only state.
//!
//! ## Load-Mutate-Save
//!
//! Nothing is cached between calls. Every operation re-reads the collection from
//! the backend, and every mutation writes the whole collection back:
//!
//! 1. Take the write lock.
//! 2. `load_clients()`.
//! 3. Apply the change in memory.
//! 4. `save_clients()`.
//! 5. Release the lock.
//!
//! The lock spans all four steps. Holding it only around the save would let two
//! concurrent updates each load the old collection, and the second save would
//! silently discard the first.
//!
//! Reads (`get_all`, `get_by_id`, `count`) skip the lock. The backend's atomic
//! rename guarantees they see either the old document or the new one.
//!
//! ## Identity
//!
//! Ids come from an [`IdGenerator`] (UUID v4 in production). A generated id that
//! already exists in the loaded collection is discarded and another is drawn.
//! Before any save the collection is checked for duplicates and the save is
//! refused with [`ClientError::DuplicateId`] if one is found.
//!
//! ## Scope
//!
//! One repository instance per backing file. Several processes or repositories
//! pointed at the same file are not coordinated.

use crate::error::{ClientError, Result};
use crate::model::{Client, ClientDraft, ClientPatch};
use crate::store::{first_duplicate_id, StorageBackend};
use chrono::{DateTime, Utc};
use log::{info, warn};
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

const MAX_ID_ATTEMPTS: usize = 8;

/// Source of `created_at` timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant.
#[cfg(any(test, feature = "test_utils"))]
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

#[cfg(any(test, feature = "test_utils"))]
impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Source of client ids.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> Uuid;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct UuidV4Generator;

impl IdGenerator for UuidV4Generator {
    fn generate(&self) -> Uuid {
        Uuid::new_v4()
    }
}

pub struct ClientRepository<B: StorageBackend> {
    backend: B,
    clock: Box<dyn Clock>,
    ids: Box<dyn IdGenerator>,
    write_lock: Mutex<()>,
}

impl<B: StorageBackend> ClientRepository<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            clock: Box::new(SystemClock),
            ids: Box::new(UuidV4Generator),
            write_lock: Mutex::new(()),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn create(&self, draft: ClientDraft) -> Result<Client> {
        let _guard = self.lock();
        let mut clients = self.backend.load_clients()?;

        let id = self.fresh_id(&clients)?;
        let client = Client::new(id, draft, self.clock.now());
        clients.push(client.clone());
        self.persist(&clients)?;

        info!(
            "event=client_create id={} total={} status=ok",
            client.id,
            clients.len()
        );
        Ok(client)
    }

    pub fn get_all(&self) -> Result<Vec<Client>> {
        self.backend.load_clients()
    }

    pub fn get_by_id(&self, id: &Uuid) -> Result<Client> {
        self.backend
            .load_clients()?
            .into_iter()
            .find(|c| c.id == *id)
            .ok_or_else(|| ClientError::NotFound(id.to_string()))
    }

    pub fn update(&self, id: &Uuid, patch: ClientPatch) -> Result<Client> {
        let _guard = self.lock();
        let mut clients = self.backend.load_clients()?;

        let client = clients
            .iter_mut()
            .find(|c| c.id == *id)
            .ok_or_else(|| ClientError::NotFound(id.to_string()))?;
        let changed = client.apply(patch);
        let updated = client.clone();

        // An unchanged record leaves the file as it is
        if changed {
            self.persist(&clients)?;
        }

        info!("event=client_update id={} changed={} status=ok", id, changed);
        Ok(updated)
    }

    pub fn delete(&self, id: &Uuid) -> Result<()> {
        let _guard = self.lock();
        let mut clients = self.backend.load_clients()?;

        let before = clients.len();
        clients.retain(|c| c.id != *id);
        if clients.len() == before {
            return Err(ClientError::NotFound(id.to_string()));
        }
        self.persist(&clients)?;

        info!(
            "event=client_delete id={} total={} status=ok",
            id,
            clients.len()
        );
        Ok(())
    }

    pub fn count(&self) -> Result<usize> {
        Ok(self.backend.load_clients()?.len())
    }

    /// The lock guards no data: a panic mid-operation leaves the backend at its
    /// last completed save, so a poisoned guard is taken over as-is.
    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, clients: &[Client]) -> Result<()> {
        if let Some(dup) = first_duplicate_id(clients) {
            return Err(ClientError::DuplicateId(dup));
        }
        self.backend.save_clients(clients)
    }

    fn fresh_id(&self, existing: &[Client]) -> Result<Uuid> {
        let mut last = Uuid::nil();
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.ids.generate();
            if !existing.iter().any(|c| c.id == id) {
                return Ok(id);
            }
            warn!("event=id_collision id={} action=regenerate", id);
            last = id;
        }
        Err(ClientError::DuplicateId(last))
    }
}
