//! # clientapp
//!
//! CRUD over a single entity, the [`Client`](model::Client), persisted to one JSON
//! document on disk. The file is the system of record: there is no database, no
//! index and no in-memory cache.
//!
//! ## Layering
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │  Service (service.rs)                                      │
//! │  - Validates request DTOs into drafts/patches              │
//! │  - Parses string ids                                       │
//! └────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌────────────────────────────────────────────────────────────┐
//! │  Repository (repository.rs)                                │
//! │  - Id assignment, created_at stamping                      │
//! │  - Load-mutate-save under one write lock                   │
//! └────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌────────────────────────────────────────────────────────────┐
//! │  Store (store/)                                            │
//! │  - Document encode/decode, corruption detection            │
//! │  - Atomic tmp-then-rename saves                            │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing in this crate knows about HTTP. The `clientapi` crate maps
//! [`ClientError`] variants to status codes.
//!
//! ## Testing Approach
//!
//! Repository and service logic is tested against
//! [`MemBackend`](store::mem_backend::MemBackend). Filesystem behavior (atomic
//! writes, missing files, corrupt files) is tested in `tests/` against real
//! temporary directories.

pub mod config;
pub mod dto;
pub mod error;
pub mod model;
pub mod repository;
pub mod service;
pub mod store;

pub use error::{ClientError, Result};
pub use model::{Client, ClientDraft, ClientPatch};
pub use repository::ClientRepository;
pub use service::ClientService;
