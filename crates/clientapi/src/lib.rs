//! # clientapi
//!
//! The HTTP front end for `clientapp`. The binary is thin: `main.rs` calls
//! [`cli::run`], which resolves configuration, starts logging and hands a shared
//! [`ClientService`](clientapp::ClientService) to the axum router in [`http`].
//!
//! Everything from the service inward is transport agnostic. This crate owns
//! only what is HTTP- or process-specific: routing, status codes, flags, the
//! logger and the async runtime.

pub mod cli;
pub mod http;
pub mod logging;
