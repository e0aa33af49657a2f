//! Scoped JSON record repository.
//!
//! One generic implementation serves both flavors: records live as a
//! JSON array inside a single text field on one remote item under the
//! module's data folder. Reads take the first search hit — the system
//! keeps at most one data record per installation. Saves are blind
//! overwrites; there is no concurrency token and the last writer wins.
//!
//! Every operation fails closed: an unavailable context, a transport
//! failure or a malformed response produce a negative result, never a
//! panic or a propagated error.

use std::marker::PhantomData;

use lazy_static::lazy_static;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Serialize;

use emplace_host::client::{hits_from_search, item_from_create, item_from_update, ops};
use emplace_host::{graphql, resolve_context_id, HostClient, HostRequest};

use crate::config::ModuleConfig;
use crate::install::item_state;
use crate::record::DataRecord;

lazy_static! {
    static ref ITEM_NAME_DISALLOWED: Regex = Regex::new(r"[^A-Za-z0-9\s\-_]").unwrap();
}

/// Reduce a display name to an item-name-safe token.
///
/// Characters outside `[A-Za-z0-9\s\-_]` are stripped and the result
/// trimmed; a name that sanitizes to nothing becomes `fallback`.
pub fn sanitize_item_name(raw: &str, fallback: &str) -> String {
    let cleaned = ITEM_NAME_DISALLOWED.replace_all(raw, "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        fallback.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Result of a write against the remote record.
///
/// The host acknowledges some mutations without echoing the item;
/// `Unconfirmed` keeps that visible instead of widening it to a bare
/// success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The mutation response echoed the item.
    Confirmed,
    /// The mutation returned without raising, but confirmed nothing.
    Unconfirmed,
    /// The mutation was not issued or raised an error.
    Failed,
}

impl SaveOutcome {
    /// Whether the write went out without an error.
    pub fn is_success(&self) -> bool {
        !matches!(self, SaveOutcome::Failed)
    }
}

/// Find-or-create plus read/update of one module's data record.
///
/// Parameterized by the payload entry type; the field name, the
/// folder layout and the naming fallback come from the injected
/// [`ModuleConfig`].
pub struct RecordRepository<'a, T> {
    client: &'a dyn HostClient,
    config: &'a ModuleConfig,
    _entry: PhantomData<fn() -> T>,
}

impl<'a, T> RecordRepository<'a, T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(client: &'a dyn HostClient, config: &'a ModuleConfig) -> Self {
        Self {
            client,
            config,
            _entry: PhantomData,
        }
    }

    /// First raw search hit for `field` under the data folder.
    async fn find_field(&self, field: &str) -> Option<(String, Option<String>)> {
        let context_id = resolve_context_id(self.client).await?;
        let query = graphql::search_items_under(&self.config.data_folder_path, field);
        let request = HostRequest::graphql(context_id, query);
        let response = match self.client.mutate(ops::PREVIEW_GRAPHQL, request).await {
            Ok(response) => response,
            Err(err) => {
                tracing::error!("Data record search failed: {}", err);
                return None;
            }
        };

        hits_from_search(&response)
            .into_iter()
            .next()
            .map(|hit| (hit.id, hit.value))
    }

    /// Load the module's data record.
    ///
    /// `scope_key` identifies the page/site the caller is acting for;
    /// the search itself carries no per-page filter (see module docs),
    /// so the key only shapes logging here. A stored payload that
    /// fails to parse degrades to an empty list rather than an error.
    pub async fn load(&self, scope_key: &str) -> Option<DataRecord<T>> {
        let (item_id, raw) = self.find_field(&self.config.data_field).await?;

        let entries = match raw {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(entries) => entries,
                Err(err) => {
                    tracing::warn!(
                        "Stored payload for scope {} is malformed, treating as empty: {}",
                        scope_key,
                        err
                    );
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        Some(DataRecord {
            item_id,
            name: None,
            entries,
        })
    }

    /// Find the data record, creating it when absent.
    ///
    /// Idempotent: an existing record is returned unchanged and no
    /// create call is issued. A fresh record starts with an empty
    /// payload (`[]`) and, when the module carries a title field, the
    /// sanitized display name as its initial title.
    pub async fn create_if_absent(
        &self,
        scope_key: &str,
        display_name: Option<&str>,
    ) -> Option<DataRecord<T>> {
        if let Some(existing) = self.load(scope_key).await {
            tracing::debug!("Data record already exists for scope {}", scope_key);
            return Some(existing);
        }

        let context_id = resolve_context_id(self.client).await?;

        let raw_name = match display_name {
            Some(name) => name.to_string(),
            // Derive a name from the scope key, skipping a leading
            // brace when the key is GUID-shaped.
            None => format!(
                "{}-{}",
                self.config.fallback_item_name,
                scope_key.chars().skip(1).take(8).collect::<String>()
            ),
        };
        let item_name = sanitize_item_name(&raw_name, &self.config.fallback_item_name);

        let template = item_state(self.client, &self.config.template_path).await;
        let Some(template_id) = template.item_id else {
            tracing::error!("No template found at {}", self.config.template_path);
            return None;
        };

        let data_folder = item_state(self.client, &self.config.data_folder_path).await;
        let Some(folder_id) = data_folder.item_id else {
            tracing::error!("No data folder found at {}", self.config.data_folder_path);
            return None;
        };

        let escaped_title;
        let mut fields: Vec<(&str, &str)> = vec![(self.config.data_field.as_str(), "[]")];
        if let Some(title_field) = &self.config.title_field {
            escaped_title = graphql::escape_quotes(&item_name);
            fields.push((title_field.as_str(), escaped_title.as_str()));
        }

        let query = graphql::create_item(&item_name, &folder_id, &template_id, &fields);
        let request = HostRequest::graphql(context_id, query);
        let response = match self.client.mutate(ops::AUTHORING_GRAPHQL, request).await {
            Ok(response) => response,
            Err(err) => {
                tracing::error!("Failed to create data record: {}", err);
                return None;
            }
        };

        let Some(created) = item_from_create(&response) else {
            tracing::error!("Data record create returned no item id");
            return None;
        };

        Some(DataRecord {
            item_id: created.item_id,
            name: Some(item_name),
            entries: Vec::new(),
        })
    }

    /// Overwrite the record's payload with `entries`.
    ///
    /// Never creates: saving against a scope with no record fails and
    /// issues no create call — callers run [`Self::create_if_absent`]
    /// first.
    pub async fn save(&self, scope_key: &str, entries: &[T]) -> SaveOutcome {
        let Some(existing) = self.load(scope_key).await else {
            tracing::error!("No data record to save into for scope {}", scope_key);
            return SaveOutcome::Failed;
        };

        let payload = match serde_json::to_string(entries) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::error!("Failed to serialize payload: {}", err);
                return SaveOutcome::Failed;
            }
        };

        self.update_field(
            &existing.item_id,
            &self.config.data_field,
            &graphql::escape_literal(&payload),
        )
        .await
    }

    /// Read the record's display title, when the module has one.
    pub async fn title(&self, _scope_key: &str) -> Option<String> {
        let title_field = self.config.title_field.as_ref()?;
        let (_, raw) = self.find_field(title_field).await?;
        raw.filter(|title| !title.is_empty())
    }

    /// Overwrite the record's display title, when the module has one.
    ///
    /// Same find-existing-or-fail pattern as [`Self::save`]; titles
    /// are plain text, so only quotes are escaped.
    pub async fn set_title(&self, scope_key: &str, title: &str) -> SaveOutcome {
        let Some(title_field) = self.config.title_field.clone() else {
            tracing::warn!("Module {} has no title field", self.config.module_name);
            return SaveOutcome::Failed;
        };

        let Some(existing) = self.load(scope_key).await else {
            tracing::error!("No data record to title for scope {}", scope_key);
            return SaveOutcome::Failed;
        };

        self.update_field(
            &existing.item_id,
            &title_field,
            &graphql::escape_quotes(title),
        )
        .await
    }

    async fn update_field(&self, item_id: &str, field: &str, value: &str) -> SaveOutcome {
        let Some(context_id) = resolve_context_id(self.client).await else {
            return SaveOutcome::Failed;
        };

        let query = graphql::update_field(item_id, field, value);
        let request = HostRequest::graphql(context_id, query);
        match self.client.mutate(ops::AUTHORING_GRAPHQL, request).await {
            Ok(response) => {
                if item_from_update(&response).is_some() {
                    SaveOutcome::Confirmed
                } else {
                    SaveOutcome::Unconfirmed
                }
            }
            Err(err) => {
                tracing::error!("Failed to update field {} on {}: {}", field, item_id, err);
                SaveOutcome::Failed
            }
        }
    }
}

// MARK: - Tests
