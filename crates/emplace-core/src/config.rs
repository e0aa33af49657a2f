//! Per-module configuration.
//!
//! Every path and identifier the installer and the repositories touch
//! lives here as a named field, so alternate deployments (and tests)
//! swap the structure instead of editing string literals. The two
//! production constructors carry the values the shipped modules use.

use serde::{Deserialize, Serialize};

/// Paths, identifiers and field names for one emplace module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleConfig {
    /// Module folder name on both the template and data side.
    pub module_name: String,

    /// System-modules root; assumed pre-provisioned by the host and
    /// never created by this system. Trailing slash included.
    pub modules_root: String,

    /// Data folder holding the module's records.
    pub data_folder_path: String,

    /// Template definition backing the records.
    pub template_path: String,

    /// Template definition name.
    pub template_name: String,

    /// Section name inside the template definition.
    pub template_section: String,

    /// Icon assigned to the template definition.
    pub template_icon: String,

    /// Parent of the template folder (well-known root identifier).
    pub template_folder_parent_id: String,

    /// Template backing the intermediate module folder.
    pub module_folder_template_id: String,

    /// Template backing the nested data folder.
    pub data_folder_template_id: String,

    /// Name of the nested data folder.
    pub data_folder_name: String,

    /// Text field holding the JSON payload.
    pub data_field: String,

    /// Optional text field holding a display title.
    pub title_field: Option<String>,

    /// Item name used when sanitization leaves nothing.
    pub fallback_item_name: String,
}

impl ModuleConfig {
    /// Configuration of the To Do module.
    pub fn todos() -> Self {
        Self {
            module_name: "Todos".to_string(),
            modules_root: "/sitecore/System/Modules/".to_string(),
            data_folder_path: "/sitecore/System/Modules/Todos/Data".to_string(),
            template_path: "/sitecore/templates/Modules/Todos/TodoData".to_string(),
            template_name: "TodoData".to_string(),
            template_section: "Data".to_string(),
            template_icon: "Applications/32x32/check2.png".to_string(),
            template_folder_parent_id: "{E6904C9A-3ACE-4B53-B465-4C05C6B1F1CC}".to_string(),
            module_folder_template_id: "{A87A00B1-E6DB-45AB-8B54-636FEC3B5523}".to_string(),
            data_folder_template_id: "{ADB6CA4F-03EF-4F47-B9AC-9CE2BA53FF97}".to_string(),
            data_folder_name: "Data".to_string(),
            data_field: "TodoData".to_string(),
            title_field: Some("Title".to_string()),
            fallback_item_name: "TodoData".to_string(),
        }
    }

    /// Configuration of the Talk module.
    ///
    /// Same hierarchy mechanics as [`ModuleConfig::todos`], with its
    /// own folder, field and icon; Talk records carry no title field.
    pub fn talk() -> Self {
        Self {
            module_name: "Talk".to_string(),
            modules_root: "/sitecore/System/Modules/".to_string(),
            data_folder_path: "/sitecore/System/Modules/Talk/Data".to_string(),
            template_path: "/sitecore/templates/Modules/Talk/TalkData".to_string(),
            template_name: "TalkData".to_string(),
            template_section: "Data".to_string(),
            template_icon: "Applications/32x32/talk.png".to_string(),
            template_folder_parent_id: "{E6904C9A-3ACE-4B53-B465-4C05C6B1F1CC}".to_string(),
            module_folder_template_id: "{A87A00B1-E6DB-45AB-8B54-636FEC3B5523}".to_string(),
            data_folder_template_id: "{ADB6CA4F-03EF-4F47-B9AC-9CE2BA53FF97}".to_string(),
            data_folder_name: "Data".to_string(),
            data_field: "TalkData".to_string(),
            title_field: None,
            fallback_item_name: "TalkData".to_string(),
        }
    }

    /// Path of the intermediate module folder on the data side.
    pub fn module_folder_path(&self) -> String {
        format!("{}{}", self.modules_root, self.module_name)
    }
}
