//! emplace-host: boundary to the marketplace host shell
//!
//! Emplace apps run embedded inside a third-party content-management
//! marketplace shell. Every remote operation goes through the shell's
//! query/mutation surface, which this crate models as the dyn-safe
//! [`HostClient`] capability trait. The concrete SDK transport lives
//! with the embedder; this crate owns everything up to that seam.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        emplace-host                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  client        │ HostClient trait, requests, envelopes      │
//! │  context       │ Session context-id resolution              │
//! │  pages         │ Page/site scope from the shell             │
//! │  graphql       │ Query payload builders and escaping        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use emplace_host::{resolve_context_id, HostClient};
//!
//! async fn ready(client: &dyn HostClient) -> bool {
//!     resolve_context_id(client).await.is_some()
//! }
//! ```

use thiserror::Error;

pub mod client;
pub mod context;
pub mod graphql;
pub mod pages;

pub use client::{ops, CreatedItem, FieldHit, HostClient, HostRequest, RemoteItem};
pub use context::{resolve_context_id, ContextId};
pub use pages::{active_page_scope, list_sites, PageScope, SiteSummary};

// MARK: - Errors

/// Errors raised at the host-shell boundary.
#[derive(Error, Debug)]
pub enum HostError {
    /// The shell's transport failed or the SDK raised.
    #[error("Host transport error: {0}")]
    Transport(String),

    /// No usable session context id could be resolved.
    #[error("Host context unavailable")]
    ContextUnavailable,

    /// The shell answered with a shape we cannot interpret.
    #[error("Malformed host response: {0}")]
    MalformedResponse(String),
}

/// Result type for host-boundary operations.
pub type Result<T> = std::result::Result<T, HostError>;

// MARK: - Tests
