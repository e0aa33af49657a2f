//! Page and site scope from the host shell.
//!
//! The shell knows which site and page the embedding view is looking
//! at; emplace components use that scope to name records and key
//! operations. Only the one-shot fetch lives here — the shell's
//! subscription plumbing belongs to the embedder.

use serde_json::Value;

use crate::client::{ops, HostClient, HostRequest};
use crate::context::resolve_context_id;

/// The site/page scope an operation targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageScope {
    /// Site identifier; `"-1"` marks the invalid sentinel.
    pub site_id: String,

    /// Human-readable site name.
    pub site_name: String,

    /// Page identifier.
    pub page_id: String,

    /// Page route within the site.
    pub route: String,
}

impl PageScope {
    /// The sentinel returned when no usable scope is available.
    pub fn invalid() -> Self {
        Self {
            site_id: "-1".to_string(),
            site_name: String::new(),
            page_id: String::new(),
            route: String::new(),
        }
    }

    /// Whether this scope points at a real site.
    pub fn is_valid(&self) -> bool {
        self.site_id != "-1" && !self.site_id.is_empty()
    }

    /// Build a scope from a `pages.context` response payload.
    ///
    /// Missing fields degrade to empty strings; a payload without a
    /// site id degrades to the invalid sentinel.
    pub fn from_context(payload: &Value) -> Self {
        let text = |v: Option<&Value>| {
            v.and_then(|v| v.as_str()).unwrap_or_default().to_string()
        };

        let site_info = payload.get("siteInfo");
        let page_info = payload.get("pageInfo");

        let site_id = text(site_info.and_then(|s| s.get("id")));
        if site_id.is_empty() {
            return Self::invalid();
        }

        Self {
            site_id,
            site_name: text(site_info.and_then(|s| s.get("name"))),
            page_id: text(page_info.and_then(|p| p.get("id"))),
            route: text(
                page_info
                    .and_then(|p| p.get("route"))
                    .or_else(|| page_info.and_then(|p| p.get("path"))),
            ),
        }
    }
}

/// One site known to the current tenant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteSummary {
    pub id: String,
    pub name: String,
    /// Content root path of the site.
    pub root_path: String,
}

/// Fetch the scope of the page the shell currently shows.
///
/// Returns the invalid sentinel when the shell cannot answer.
pub async fn active_page_scope(client: &dyn HostClient) -> PageScope {
    match client.query(ops::PAGES_CONTEXT, HostRequest::empty()).await {
        Ok(response) => {
            let payload = response.get("data").unwrap_or(&Value::Null);
            PageScope::from_context(payload)
        }
        Err(err) => {
            tracing::error!("Failed to query page context: {}", err);
            PageScope::invalid()
        }
    }
}

/// List the sites of the current tenant.
///
/// Used by setup surfaces during installation. Fails closed to an
/// empty list.
pub async fn list_sites(client: &dyn HostClient) -> Vec<SiteSummary> {
    let Some(context_id) = resolve_context_id(client).await else {
        return Vec::new();
    };

    let response = match client
        .query(ops::LIST_SITES, HostRequest::scoped(context_id))
        .await
    {
        Ok(response) => response,
        Err(err) => {
            tracing::error!("Failed to list sites: {}", err);
            return Vec::new();
        }
    };

    let sites = response
        .get("data")
        .and_then(|d| d.get("data"))
        .and_then(|d| d.as_array());

    sites
        .map(|sites| {
            sites
                .iter()
                .map(|site| SiteSummary {
                    id: site.get("id").and_then(|v| v.as_str()).unwrap_or_default().to_string(),
                    name: site
                        .get("name")
                        .and_then(|v| v.as_str())
                        .unwrap_or_default()
                        .to_string(),
                    root_path: site
                        .get("properties")
                        .and_then(|p| p.get("rootPath"))
                        .and_then(|v| v.as_str())
                        .unwrap_or_default()
                        .to_string(),
                })
                .collect()
        })
        .unwrap_or_default()
}
