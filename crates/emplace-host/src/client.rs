//! Host shell query/mutation surface.
//!
//! The shell accepts a named operation plus a structured payload and
//! answers with a structured response (or raises). [`HostClient`] is
//! the capability object handed to every emplace component; embedders
//! implement it over the real marketplace SDK, tests implement it over
//! a scripted in-memory host.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::Result;

/// Operation names understood by the host shell.
pub mod ops {
    /// Application context (session resources, preview context id).
    pub const APPLICATION_CONTEXT: &str = "application.context";
    /// Current page/site context.
    pub const PAGES_CONTEXT: &str = "pages.context";
    /// Site inventory of the current tenant.
    pub const LIST_SITES: &str = "xmc.xmapp.listSites";
    /// Authoring endpoint (item lookups, creates, updates).
    pub const AUTHORING_GRAPHQL: &str = "xmc.authoring.graphql";
    /// Preview endpoint (data record search).
    pub const PREVIEW_GRAPHQL: &str = "xmc.preview.graphql";
}

// MARK: - Requests

/// Payload for a single host operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HostRequest {
    /// Session context id, when the operation is context-scoped.
    pub context_id: Option<String>,

    /// Structured request body, when the operation carries one.
    pub body: Option<Value>,
}

impl HostRequest {
    /// Request without context or body (e.g. `application.context`).
    pub fn empty() -> Self {
        Self {
            context_id: None,
            body: None,
        }
    }

    /// Context-scoped request without a body (e.g. `listSites`).
    pub fn scoped(context_id: impl Into<String>) -> Self {
        Self {
            context_id: Some(context_id.into()),
            body: None,
        }
    }

    /// Context-scoped request carrying a query-language payload.
    pub fn graphql(context_id: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            context_id: Some(context_id.into()),
            body: Some(json!({ "query": query.into() })),
        }
    }

    /// The query-language text of this request, if it carries one.
    pub fn query_text(&self) -> Option<&str> {
        self.body.as_ref()?.get("query")?.as_str()
    }
}

// MARK: - Capability trait

/// The host shell's query/mutation surface.
///
/// Both methods resolve to the raw response value; callers pick the
/// pieces they need through the envelope extractors below. Transport
/// failures and SDK-raised errors surface as [`HostError::Transport`].
///
/// [`HostError::Transport`]: crate::HostError::Transport
#[async_trait]
pub trait HostClient: Send + Sync {
    /// Read-only operation against the shell.
    async fn query(&self, operation: &str, request: HostRequest) -> Result<Value>;

    /// State-changing operation against the shell.
    async fn mutate(&self, operation: &str, request: HostRequest) -> Result<Value>;
}

// MARK: - Envelopes

/// An item node in the host's content repository.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteItem {
    /// Immutable identifier.
    pub item_id: String,

    /// Mutable item name.
    #[serde(default)]
    pub name: String,

    /// Mutable full path; empty when the lookup found nothing.
    #[serde(default)]
    pub path: String,
}

/// Item echo returned by a create mutation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedItem {
    pub item_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub path: Option<String>,
}

/// One search result carrying a single field's stored text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldHit {
    /// Identifier of the matched item.
    pub id: String,

    /// Stored field text, when the field is present on the item.
    pub value: Option<String>,
}

/// Navigate the shell's double-wrapped `data.data` envelope.
fn inner(response: &Value) -> Option<&Value> {
    response.get("data")?.get("data")
}

/// Extract the item from an item-lookup response.
///
/// Returns `None` for "no item at that path" and for any shape we do
/// not recognize; callers deliberately cannot tell those apart.
pub fn item_from_lookup(response: &Value) -> Option<RemoteItem> {
    let item = inner(response)?.get("item")?;
    serde_json::from_value(item.clone()).ok()
}

/// Extract the item echo from a `createItem` response.
pub fn item_from_create(response: &Value) -> Option<CreatedItem> {
    let item = inner(response)?.get("createItem")?.get("item")?;
    serde_json::from_value(item.clone()).ok()
}

/// Extract the item echo from a `createItemTemplateFolder` response.
pub fn item_from_folder_create(response: &Value) -> Option<CreatedItem> {
    let item = inner(response)?
        .get("createItemTemplateFolder")?
        .get("item")?;
    serde_json::from_value(item.clone()).ok()
}

/// Extract the item echo from an `updateItem` response, if any.
pub fn item_from_update(response: &Value) -> Option<RemoteItem> {
    let item = inner(response)?.get("updateItem")?.get("item")?;
    serde_json::from_value(item.clone()).ok()
}

/// Extract field hits from a search response.
pub fn hits_from_search(response: &Value) -> Vec<FieldHit> {
    let results = match inner(response)
        .and_then(|d| d.get("search"))
        .and_then(|s| s.get("results"))
        .and_then(|r| r.as_array())
    {
        Some(results) => results,
        None => return Vec::new(),
    };

    results
        .iter()
        .filter_map(|hit| {
            let id = hit.get("id")?.as_str()?.to_string();
            let value = hit
                .get("field")
                .and_then(|f| f.get("jsonValue"))
                .and_then(|j| j.get("value"))
                .and_then(|v| v.as_str())
                .map(str::to_string);
            Some(FieldHit { id, value })
        })
        .collect()
}

// MARK: - Tests
