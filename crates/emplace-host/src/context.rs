//! Session context resolution.
//!
//! Every content operation against the shell is scoped by an opaque
//! context id carried on the application context's first resource.
//! The id is resolved fresh per call chain and never cached; a shell
//! that cannot produce one makes every downstream operation
//! unavailable rather than erroneous.

use crate::client::{ops, HostClient, HostRequest};

/// Opaque session/context identifier issued by the host shell.
pub type ContextId = String;

/// Resolve the current session's context id.
///
/// Extracts `resources[0].context.preview` from the shell's
/// application context. Returns `None` on any failure (transport
/// error, missing resource, empty id) and never propagates the
/// underlying error; callers treat `None` as "operation unavailable".
pub async fn resolve_context_id(client: &dyn HostClient) -> Option<ContextId> {
    let response = match client.query(ops::APPLICATION_CONTEXT, HostRequest::empty()).await {
        Ok(response) => response,
        Err(err) => {
            tracing::error!("Failed to query application context: {}", err);
            return None;
        }
    };

    let context_id = response
        .get("data")
        .and_then(|d| d.get("resources"))
        .and_then(|r| r.get(0))
        .and_then(|r| r.get("context"))
        .and_then(|c| c.get("preview"))
        .and_then(|p| p.as_str())
        .filter(|id| !id.is_empty())
        .map(str::to_string);

    if context_id.is_none() {
        tracing::error!("Application context carries no preview context id");
    }
    context_id
}
