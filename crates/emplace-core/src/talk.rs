//! The Talk flavor.
//!
//! Page-level chat over the same record mechanics as the To Do
//! flavor. Messages are append-only from the app's perspective; the
//! list refreshes on explicit load, nothing is pushed.

use emplace_host::{HostClient, PageScope};

use crate::config::ModuleConfig;
use crate::install::{InstallStatus, Installer};
use crate::record::ChatMessage;
use crate::repo::RecordRepository;

/// The Talk app over one module configuration.
pub struct TalkApp {
    config: ModuleConfig,
}

impl TalkApp {
    /// App over the production Talk module.
    pub fn new() -> Self {
        Self {
            config: ModuleConfig::talk(),
        }
    }

    /// App over an alternate deployment.
    pub fn with_config(config: ModuleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ModuleConfig {
        &self.config
    }

    fn repository<'a>(&'a self, client: &'a dyn HostClient) -> RecordRepository<'a, ChatMessage> {
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

    /// Load the conversation; no record or no payload reads as empty.
    pub async fn load(&self, client: &dyn HostClient, scope: &PageScope) -> Vec<ChatMessage> {
        self.repository(client)
            .load(&scope.site_id)
            .await
            .map(|record| record.entries)
            .unwrap_or_default()
    }

    /// Persist `messages`, creating the data record on first save.
    pub async fn save(
        &self,
        client: &dyn HostClient,
        scope: &PageScope,
        messages: &[ChatMessage],
    ) -> bool {
        let repo = self.repository(client);
        let display_name = (!scope.site_name.is_empty()).then_some(scope.site_name.as_str());
        if repo
            .create_if_absent(&scope.site_id, display_name)
            .await
            .is_none()
        {
            return false;
        }
        repo.save(&scope.site_id, messages).await.is_success()
    }

    /// Append one message to the conversation. Returns the updated
    /// conversation on success.
    pub async fn post(
        &self,
        client: &dyn HostClient,
        scope: &PageScope,
        author: &str,
        message: &str,
    ) -> Option<Vec<ChatMessage>> {
        let message = message.trim();
        if message.is_empty() {
            return None;
        }

        let mut messages = self.load(client, scope).await;
        messages.push(ChatMessage::new(author, message));
        self.save(client, scope, &messages).await.then_some(messages)
    }
}

impl Default for TalkApp {
    fn default() -> Self {
        Self::new()
    }
}
