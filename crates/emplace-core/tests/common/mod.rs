//! Scripted in-memory host shell for integration tests.
//!
//! Implements [`HostClient`] over a mutable item tree, routes on the
//! query text the builders emit, and applies the remote side's
//! string-literal unescape to stored field values — so escaping bugs
//! surface as corrupted payloads, exactly as they would in
//! production. Create and update calls are counted for the
//! idempotency assertions.

// Not every test target uses every helper.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use emplace_core::ModuleConfig;
use emplace_host::client::{ops, HostClient, HostRequest};
use emplace_host::{HostError, PageScope};

#[derive(Debug, Clone)]
pub struct FakeItem {
    pub item_id: String,
    pub name: String,
    pub path: String,
}

#[derive(Default)]
struct State {
    context_id: Option<String>,
    items: Vec<FakeItem>,
    fields: HashMap<String, HashMap<String, String>>,
    create_item_calls: usize,
    update_calls: usize,
    next_id: usize,
}

pub struct FakeHost {
    state: Mutex<State>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                context_id: Some("ctx-test".to_string()),
                ..State::default()
            }),
        }
    }

    /// A host whose session never produces a context id.
    pub fn without_context() -> Self {
        Self {
            state: Mutex::new(State::default()),
        }
    }

    /// A host with `config`'s structure fully installed.
    pub fn installed(config: &ModuleConfig) -> Self {
        let host = Self::new();
        host.seed_well_known(config);
        host.seed_item(&format!("/sitecore/templates/Modules/{}", config.module_name));
        host.seed_item(&config.template_path);
        host.seed_item(&config.module_folder_path());
        host.seed_item(&config.data_folder_path);
        host
    }

    /// Seed only what the host pre-provisions: the system-modules
    /// root and the template-folder parent.
    pub fn seed_well_known(&self, config: &ModuleConfig) {
        self.seed_item(&config.modules_root);
        let mut state = self.state.lock().unwrap();
        state.items.push(FakeItem {
            item_id: config.template_folder_parent_id.clone(),
            name: "Modules".to_string(),
            path: "/sitecore/templates/Modules".to_string(),
        });
    }

    pub fn seed_item(&self, path: &str) -> String {
        let mut state = self.state.lock().unwrap();
        let item_id = state.fresh_id();
        let name = path.trim_end_matches('/').rsplit('/').next().unwrap_or(path);
        state.items.push(FakeItem {
            item_id: item_id.clone(),
            name: name.to_string(),
            path: path.to_string(),
        });
        item_id
    }

    /// Seed a data record under `config`'s data folder with a raw
    /// stored field value (no escaping applied).
    pub fn seed_record(&self, config: &ModuleConfig, name: &str, raw_value: &str) -> String {
        let item_id = self.seed_item(&format!("{}/{}", config.data_folder_path, name));
        let mut state = self.state.lock().unwrap();
        state
            .fields
            .entry(item_id.clone())
            .or_default()
            .insert(config.data_field.clone(), raw_value.to_string());
        item_id
    }

    pub fn remove_item(&self, path: &str) {
        let mut state = self.state.lock().unwrap();
        state.items.retain(|item| item.path != path);
    }

    pub fn create_item_calls(&self) -> usize {
        self.state.lock().unwrap().create_item_calls
    }

    pub fn update_calls(&self) -> usize {
        self.state.lock().unwrap().update_calls
    }

    pub fn item_at(&self, path: &str) -> Option<FakeItem> {
        let state = self.state.lock().unwrap();
        state.items.iter().find(|item| item.path == path).cloned()
    }

    pub fn field_of(&self, item_id: &str, field: &str) -> Option<String> {
        let state = self.state.lock().unwrap();
        state.fields.get(item_id)?.get(field).cloned()
    }
}

impl State {
    fn fresh_id(&mut self) -> String {
        self.next_id += 1;
        format!("{{FAKE-{:04}}}", self.next_id)
    }

    fn item_by_id(&self, item_id: &str) -> Option<&FakeItem> {
        self.items.iter().find(|item| item.item_id == item_id)
    }

    fn child_path(&self, parent_id: &str, name: &str) -> Option<String> {
        let parent = self.item_by_id(parent_id)?;
        if parent.path.ends_with('/') {
            Some(format!("{}{}", parent.path, name))
        } else {
            Some(format!("{}/{}", parent.path, name))
        }
    }

    fn insert_under(&mut self, parent_id: &str, name: &str) -> Option<FakeItem> {
        let path = self.child_path(parent_id, name)?;
        let item = FakeItem {
            item_id: self.fresh_id(),
            name: name.to_string(),
            path,
        };
        self.items.push(item.clone());
        Some(item)
    }
}

/// Read the string literal following `key: "`, applying the escape
/// rules of the remote query parser. Returns the decoded text and the
/// byte offset just past the closing quote.
fn literal_after(text: &str, from: usize, key: &str) -> Option<(String, usize)> {
    let marker = format!("{key}: \"");
    let start = text[from..].find(&marker)? + from + marker.len();
    let mut out = String::new();
    let mut iter = text[start..].char_indices();
    while let Some((i, c)) = iter.next() {
        match c {
            '\\' => {
                if let Some((_, escaped)) = iter.next() {
                    out.push(escaped);
                }
            }
            '"' => return Some((out, start + i + 1)),
            _ => out.push(c),
        }
    }
    None
}

/// Parse `(name, value)` pairs from a `fields: [...]` block.
fn parse_fields(query: &str) -> Vec<(String, String)> {
    let Some(block_start) = query.find("fields: [") else {
        return Vec::new();
    };

    let mut pairs = Vec::new();
    let mut pos = block_start;
    while let Some((name, after_name)) = literal_after(query, pos, "name") {
        let Some((value, after_value)) = literal_after(query, after_name, "value") else {
            break;
        };
        pairs.push((name, value));
        pos = after_value;
    }
    pairs
}

#[async_trait]
impl HostClient for FakeHost {
    async fn query(
        &self,
        operation: &str,
        _request: HostRequest,
    ) -> Result<Value, HostError> {
        let state = self.state.lock().unwrap();
        match operation {
            ops::APPLICATION_CONTEXT => match &state.context_id {
                Some(id) => Ok(json!({
                    "data": { "resources": [ { "context": { "preview": id } } ] }
                })),
                None => Ok(json!({ "data": { "resources": [] } })),
            },
            _ => Ok(json!({})),
        }
    }

    async fn mutate(
        &self,
        _operation: &str,
        request: HostRequest,
    ) -> Result<Value, HostError> {
        let query = request
            .query_text()
            .ok_or_else(|| HostError::Transport("request carries no query".into()))?
            .to_string();
        let mut state = self.state.lock().unwrap();

        if query.contains("createItemTemplateFolder") {
            let (name, _) = literal_after(&query, 0, "name")
                .ok_or_else(|| HostError::Transport("folder create without name".into()))?;
            let (parent, _) = literal_after(&query, 0, "parent")
                .ok_or_else(|| HostError::Transport("folder create without parent".into()))?;
            let item = state
                .insert_under(&parent, &name)
                .ok_or_else(|| HostError::Transport("unknown parent".into()))?;
            return Ok(json!({
                "data": { "data": { "createItemTemplateFolder": { "item": {
                    "name": item.name, "itemId": item.item_id
                }}}}
            }));
        }

        if query.contains("createItemTemplate(") {
            let (name, _) = literal_after(&query, 0, "name").unwrap_or_default();
            let (parent, _) = literal_after(&query, 0, "parent")
                .ok_or_else(|| HostError::Transport("template create without parent".into()))?;
            let item = state
                .insert_under(&parent, &name)
                .ok_or_else(|| HostError::Transport("unknown parent".into()))?;
            return Ok(json!({
                "data": { "data": { "createItemTemplate": { "itemTemplate": {
                    "name": item.name, "templateId": item.item_id
                }}}}
            }));
        }

        if query.contains("createItem(") {
            state.create_item_calls += 1;
            let (name, _) = literal_after(&query, 0, "name")
                .ok_or_else(|| HostError::Transport("create without name".into()))?;
            let (parent, _) = literal_after(&query, 0, "parent")
                .ok_or_else(|| HostError::Transport("create without parent".into()))?;
            let item = state
                .insert_under(&parent, &name)
                .ok_or_else(|| HostError::Transport("unknown parent".into()))?;
            let fields = parse_fields(&query);
            if !fields.is_empty() {
                let entry = state.fields.entry(item.item_id.clone()).or_default();
                for (field, value) in fields {
                    entry.insert(field, value);
                }
            }
            return Ok(json!({
                "data": { "data": { "createItem": { "item": {
                    "itemId": item.item_id, "name": item.name, "path": item.path
                }}}}
            }));
        }

        if query.contains("updateItem(") {
            state.update_calls += 1;
            let (item_id, _) = literal_after(&query, 0, "itemId")
                .ok_or_else(|| HostError::Transport("update without itemId".into()))?;
            let name = state
                .item_by_id(&item_id)
                .map(|item| item.name.clone())
                .unwrap_or_default();
            let fields = parse_fields(&query);
            let entry = state.fields.entry(item_id.clone()).or_default();
            for (field, value) in fields {
                entry.insert(field, value);
            }
            return Ok(json!({
                "data": { "data": { "updateItem": { "item": {
                    "itemId": item_id, "name": name
                }}}}
            }));
        }

        if query.contains("search(") {
            let (folder, _) = literal_after(&query, 0, "value")
                .ok_or_else(|| HostError::Transport("search without folder".into()))?;
            let (field, _) = literal_after(&query, 0, "field(name")
                .ok_or_else(|| HostError::Transport("search without field".into()))?;
            let prefix = format!("{}/", folder.trim_end_matches('/'));
            let results: Vec<Value> = state
                .items
                .iter()
                .filter(|item| item.path.starts_with(&prefix))
                .map(|item| {
                    let value = state
                        .fields
                        .get(&item.item_id)
                        .and_then(|fields| fields.get(&field));
                    match value {
                        Some(value) => json!({
                            "id": item.item_id,
                            "field": { "jsonValue": { "value": value } }
                        }),
                        None => json!({ "id": item.item_id, "field": null }),
                    }
                })
                .collect();
            return Ok(json!({
                "data": { "data": { "search": {
                    "total": results.len(), "results": results
                }}}
            }));
        }

        if query.contains("item(") {
            let (path, _) = literal_after(&query, 0, "path")
                .ok_or_else(|| HostError::Transport("lookup without path".into()))?;
            let item = state.items.iter().find(|item| item.path == path);
            return Ok(match item {
                Some(item) => json!({
                    "data": { "data": { "item": {
                        "itemId": item.item_id, "name": item.name, "path": item.path
                    }}}
                }),
                None => json!({ "data": { "data": { "item": null } } }),
            });
        }

        Err(HostError::Transport(format!("unroutable query: {query}")))
    }
}

/// A valid page scope for a fixed test site.
pub fn test_scope() -> PageScope {
    PageScope {
        site_id: "{0DE95AE4-41AB-4D01-9EB0-67441B7C2450}".to_string(),
        site_name: "My Site".to_string(),
        page_id: "{110D559F-DEA5-42EA-9C1C-8A5DF7E70EF9}".to_string(),
        route: "/home".to_string(),
    }
}
