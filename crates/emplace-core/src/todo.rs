//! The To Do flavor.
//!
//! Thin facade the embedding view drives: installation gate, list
//! load, and the user actions (add, toggle, edit, delete, title).
//! Every mutating action runs read-modify-write against the module's
//! single data record: the view owns the list in memory, the remote
//! field is the durable copy.

use emplace_host::{HostClient, PageScope};

use crate::config::ModuleConfig;
use crate::install::{InstallStatus, Installer};
use crate::record::Todo;
use crate::repo::RecordRepository;

/// The To Do app over one module configuration.
pub struct TodoApp {
    config: ModuleConfig,
}

impl TodoApp {
    /// App over the production To Do module.
    pub fn new() -> Self {
        Self {
            config: ModuleConfig::todos(),
        }
    }

    /// App over an alternate deployment.
    pub fn with_config(config: ModuleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ModuleConfig {
        &self.config
    }

    fn repository<'a>(&'a self, client: &'a dyn HostClient) -> RecordRepository<'a, Todo> {
        RecordRepository::new(client, &self.config)
    }

    /// Whether the module's templates and folders exist.
    pub async fn installation_status(&self, client: &dyn HostClient) -> InstallStatus {
        Installer::new(client, &self.config).installation_status().await
    }

    /// Install the module's templates and folders.
    pub async fn install_templates(&self, client: &dyn HostClient) -> bool {
        Installer::new(client, &self.config).install_templates().await
    }

    /// Load the current list; no record or no payload reads as empty.
    pub async fn load(&self, client: &dyn HostClient, scope: &PageScope) -> Vec<Todo> {
        self.repository(client)
            .load(&scope.site_id)
            .await
            .map(|record| record.entries)
            .unwrap_or_default()
    }

    /// Persist `todos`, creating the data record on first save.
    pub async fn save(&self, client: &dyn HostClient, scope: &PageScope, todos: &[Todo]) -> bool {
        let repo = self.repository(client);
        let display_name = (!scope.site_name.is_empty()).then_some(scope.site_name.as_str());
        if repo
            .create_if_absent(&scope.site_id, display_name)
            .await
            .is_none()
        {
            return false;
        }
        repo.save(&scope.site_id, todos).await.is_success()
    }

    /// Append a new open entry. Returns the updated list on success.
    pub async fn add(
        &self,
        client: &dyn HostClient,
        scope: &PageScope,
        text: &str,
    ) -> Option<Vec<Todo>> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let mut todos = self.load(client, scope).await;
        todos.push(Todo::new(text));
        self.save(client, scope, &todos).await.then_some(todos)
    }

    /// Flip completion of the entry with `id`.
    pub async fn toggle(
        &self,
        client: &dyn HostClient,
        scope: &PageScope,
        id: &str,
    ) -> Option<Vec<Todo>> {
        let mut todos = self.load(client, scope).await;
        for todo in todos.iter_mut().filter(|todo| todo.id == id) {
            todo.toggle();
        }
        self.save(client, scope, &todos).await.then_some(todos)
    }

    /// Replace the text of the entry with `id`.
    pub async fn edit(
        &self,
        client: &dyn HostClient,
        scope: &PageScope,
        id: &str,
        text: &str,
    ) -> Option<Vec<Todo>> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let mut todos = self.load(client, scope).await;
        for todo in todos.iter_mut().filter(|todo| todo.id == id) {
            todo.rename(text);
        }
        self.save(client, scope, &todos).await.then_some(todos)
    }

    /// Drop the entry with `id` from the list. Deletion is
    /// list-filtering, persisted immediately; no tombstone remains.
    pub async fn remove(
        &self,
        client: &dyn HostClient,
        scope: &PageScope,
        id: &str,
    ) -> Option<Vec<Todo>> {
        let mut todos = self.load(client, scope).await;
        todos.retain(|todo| todo.id != id);
        self.save(client, scope, &todos).await.then_some(todos)
    }

    /// The record's display title, when set.
    pub async fn title(&self, client: &dyn HostClient, scope: &PageScope) -> Option<String> {
        self.repository(client).title(&scope.site_id).await
    }

    /// Overwrite the record's display title.
    pub async fn set_title(
        &self,
        client: &dyn HostClient,
        scope: &PageScope,
        title: &str,
    ) -> bool {
        self.repository(client)
            .set_title(&scope.site_id, title)
            .await
            .is_success()
    }
}

impl Default for TodoApp {
    fn default() -> Self {
        Self::new()
    }
}
