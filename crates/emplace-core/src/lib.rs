//! emplace-core: module logic for emplace marketplace apps
//!
//! Two small apps (a To Do list and a page-level chat called Talk) run
//! embedded in a content-management marketplace shell. Each app checks
//! whether its supporting template/folder structure exists in the
//! host's content repository, installs it on demand, and persists its
//! records as a JSON-encoded string inside one text field on a single
//! host-managed item.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        emplace-core                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  config        │ Injected paths/identifiers per module      │
//! │  install       │ Item locator, status check, installer      │
//! │  record        │ Todo / ChatMessage / DataRecord types      │
//! │  repo          │ Generic scoped JSON record repository      │
//! │  todo, talk    │ The two flavor facades                     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! All remote access goes through the [`emplace_host::HostClient`]
//! capability object; nothing here touches a transport directly.

pub mod config;
pub mod install;
pub mod record;
pub mod repo;
pub mod talk;
pub mod todo;

pub use config::ModuleConfig;
pub use install::{item_state, InstallState, InstallStatus, Installer};
pub use record::{ChatMessage, DataRecord, Todo};
pub use repo::{sanitize_item_name, RecordRepository, SaveOutcome};
pub use talk::TalkApp;
pub use todo::TodoApp;
