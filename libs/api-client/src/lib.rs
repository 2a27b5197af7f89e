//! HTTP transport for the TaskDeck remote API.
//!
//! This crate owns everything that touches the wire: the typed endpoint
//! methods on [`ApiClient`], the camelCase wire records in [`dto`], the
//! [`ApiError`] taxonomy whose `Display` strings are shown to the user
//! verbatim, and the session-expiry broadcast fired on any 401 response.
//! Stores build on top of this crate; nothing here caches state.

pub mod client;
pub mod config;
pub mod dto;
pub mod error;
pub mod signal;

pub use client::ApiClient;
pub use config::ApiClientConfig;
pub use error::ApiError;
pub use signal::{AuthSignal, AuthSignalBroadcaster};
