//! Installation state machine.
//!
//! A module is installed when its template definition and its data
//! folder both exist in the host's content repository. The installer
//! creates whatever is missing, one pre-checked step at a time; there
//! is no rollback. A retried call is cheap because every step checks
//! before it creates.

use emplace_host::client::{
    item_from_create, item_from_folder_create, item_from_lookup, ops,
};
use emplace_host::{graphql, resolve_context_id, HostClient, HostRequest};

use crate::config::ModuleConfig;

/// Existence of a single item, with its identifier when present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallState {
    pub is_installed: bool,
    pub item_id: Option<String>,
}

impl InstallState {
    /// Item absent, or the lookup failed — the two are deliberately
    /// not distinguished.
    pub fn absent() -> Self {
        Self {
            is_installed: false,
            item_id: None,
        }
    }

    pub fn installed(item_id: impl Into<String>) -> Self {
        Self {
            is_installed: true,
            item_id: Some(item_id.into()),
        }
    }
}

/// Aggregate installation status of a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallStatus {
    pub is_installed: bool,
}

/// Look up the item at `path` in the master partition.
///
/// Fails closed: an unavailable context, a transport failure and a
/// genuinely missing item all report [`InstallState::absent`]. An
/// item counts as installed only when the lookup echoes a non-empty
/// path.
pub async fn item_state(client: &dyn HostClient, path: &str) -> InstallState {
    let Some(context_id) = resolve_context_id(client).await else {
        return InstallState::absent();
    };

    let request = HostRequest::graphql(context_id, graphql::item_lookup(path));
    let response = match client.mutate(ops::AUTHORING_GRAPHQL, request).await {
        Ok(response) => response,
        Err(err) => {
            tracing::warn!("Item lookup failed for {}: {}", path, err);
            return InstallState::absent();
        }
    };

    match item_from_lookup(&response) {
        Some(item) if !item.path.is_empty() => InstallState::installed(item.item_id),
        _ => InstallState::absent(),
    }
}

/// Checks and installs one module's template/folder structure.
pub struct Installer<'a> {
    client: &'a dyn HostClient,
    config: &'a ModuleConfig,
}

impl<'a> Installer<'a> {
    pub fn new(client: &'a dyn HostClient, config: &'a ModuleConfig) -> Self {
        Self { client, config }
    }

    async fn template_state(&self) -> InstallState {
        item_state(self.client, &self.config.template_path).await
    }

    async fn data_folder_state(&self) -> InstallState {
        item_state(self.client, &self.config.data_folder_path).await
    }

    /// Whether the module's structures exist.
    ///
    /// Pure aggregation of two lookups; safe to call any number of
    /// times.
    pub async fn installation_status(&self) -> InstallStatus {
        if resolve_context_id(self.client).await.is_none() {
            return InstallStatus { is_installed: false };
        }

        let template = self.template_state().await;
        let data_folder = self.data_folder_state().await;
        InstallStatus {
            is_installed: template.is_installed && data_folder.is_installed,
        }
    }

    /// Create the template-side structure, then ensure the data-side
    /// hierarchy exists.
    ///
    /// Returns `false` on the first failed step; partially created
    /// nodes stay in place and the next call picks up where this one
    /// stopped.
    pub async fn install_templates(&self) -> bool {
        let Some(context_id) = resolve_context_id(self.client).await else {
            return false;
        };

        // Template folder, created under the well-known parent when
        // absent.
        let mut templates = self.template_state().await;
        if !templates.is_installed {
            let query = graphql::create_template_folder(
                &self.config.module_name,
                &self.config.template_folder_parent_id,
            );
            let request = HostRequest::graphql(context_id.clone(), query);
            match self.client.mutate(ops::AUTHORING_GRAPHQL, request).await {
                Ok(response) => {
                    templates.item_id =
                        item_from_folder_create(&response).map(|item| item.item_id);
                }
                Err(err) => {
                    tracing::error!("Failed to create template folder: {}", err);
                }
            }
        }
        let Some(folder_id) = templates.item_id else {
            tracing::error!(
                "No template folder available for module {}",
                self.config.module_name
            );
            return false;
        };

        // Template definition under the folder. Best-effort: the
        // create is not re-verified against a returned identifier.
        let mut fields: Vec<(&str, &str)> =
            vec![(self.config.data_field.as_str(), "Multi-Line Text")];
        if let Some(title_field) = &self.config.title_field {
            fields.push((title_field.as_str(), "Single-Line Text"));
        }
        let query = graphql::create_template(
            &self.config.template_name,
            &folder_id,
            &self.config.template_icon,
            &self.config.template_section,
            &fields,
        );
        let request = HostRequest::graphql(context_id.clone(), query);
        if let Err(err) = self.client.mutate(ops::AUTHORING_GRAPHQL, request).await {
            tracing::warn!(
                "Template definition create for {} not confirmed: {}",
                self.config.template_name,
                err
            );
        }

        self.configure_data_folders(&context_id).await
    }

    /// Ensure the data-side hierarchy exists.
    ///
    /// The system-modules root is a hard dependency provisioned by the
    /// host; this system never creates it.
    async fn configure_data_folders(&self, context_id: &str) -> bool {
        let modules_root = item_state(self.client, &self.config.modules_root).await;
        if !modules_root.is_installed {
            tracing::error!("System modules root is missing: {}", self.config.modules_root);
            return false;
        }

        let data_folder = self.data_folder_state().await;
        if !data_folder.is_installed
            && !self.create_data_folders(context_id, &modules_root).await
        {
            return false;
        }

        // Re-verify rather than trusting the create echo.
        self.data_folder_state().await.is_installed
    }

    /// Create the intermediate module folder and the nested data
    /// folder, each guarded by its own pre-check.
    async fn create_data_folders(&self, context_id: &str, modules_root: &InstallState) -> bool {
        let mut module_folder =
            item_state(self.client, &self.config.module_folder_path()).await;

        if !module_folder.is_installed {
            let Some(root_id) = modules_root.item_id.as_deref() else {
                return false;
            };
            let query = graphql::create_item(
                &self.config.module_name,
                root_id,
                &self.config.module_folder_template_id,
                &[],
            );
            let request = HostRequest::graphql(context_id.to_string(), query);
            match self.client.mutate(ops::AUTHORING_GRAPHQL, request).await {
                Ok(response) => {
                    module_folder.item_id = item_from_create(&response).map(|item| item.item_id);
                }
                Err(err) => {
                    tracing::error!("Failed to create module folder: {}", err);
                }
            }
            if module_folder.item_id.is_none() {
                tracing::error!(
                    "Failed to create module folder for {}",
                    self.config.module_name
                );
                return false;
            }
        }

        let Some(parent_id) = module_folder.item_id.as_deref() else {
            return false;
        };
        let query = graphql::create_item(
            &self.config.data_folder_name,
            parent_id,
            &self.config.data_folder_template_id,
            &[],
        );
        let request = HostRequest::graphql(context_id.to_string(), query);
        match self.client.mutate(ops::AUTHORING_GRAPHQL, request).await {
            Ok(response) => item_from_create(&response).is_some(),
            Err(err) => {
                tracing::error!("Failed to create data folder: {}", err);
                false
            }
        }
    }
}
