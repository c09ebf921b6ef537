//! Storage backends behind the data access facade.
//!
//! Two implementations of [`Store`] exist:
//!
//! - **Remote** ([`RemoteStore`]): REST calls against the tracker API,
//!   JSON bodies, list/get payloads wrapped in `{"message": ...}`.
//! - **Local** ([`LocalStore`]): two JSON arrays in a key-value store under
//!   the keys `"projects"` and `"issues"`, rewritten whole on every mutation.
//!
//! The backend is chosen once, from a [`Backend`] value, by
//! [`create_store`]. Nothing downstream branches on which one is active.
//!
//! # Not-found handling
//!
//! Lookups return `Ok(None)` for an unknown id. Updates and deletes of an
//! unknown id succeed without effect. Every other failure (transport,
//! status, I/O, malformed JSON) is an `Err` and means the operation did not
//! take effect.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::StoreError;
use crate::models::{Issue, IssuePatch, Project, ProjectPatch};

pub mod kv;
pub mod local;
pub mod remote;

pub use kv::{FileKv, KeyValueStore, KvHandle, MemoryKv};
pub use local::LocalStore;
pub use remote::RemoteStore;

/// CRUD contract shared by both backends.
#[async_trait]
pub trait Store: Send + Sync {
    async fn list_projects(&self) -> Result<Vec<Project>, StoreError>;

    /// Create a project. The backend assigns `id` when it is empty.
    async fn create_project(&self, project: Project) -> Result<Project, StoreError>;

    async fn get_project(&self, id: &str) -> Result<Option<Project>, StoreError>;

    async fn update_project(&self, id: &str, patch: &ProjectPatch) -> Result<(), StoreError>;

    async fn delete_project(&self, id: &str) -> Result<(), StoreError>;

    async fn list_issues(&self) -> Result<Vec<Issue>, StoreError>;

    async fn list_issues_of_project(&self, project_id: &str) -> Result<Vec<Issue>, StoreError>;

    /// Create an issue. The backend assigns `id` when it is empty.
    async fn create_issue(&self, issue: Issue) -> Result<Issue, StoreError>;

    async fn get_issue(&self, id: &str) -> Result<Option<Issue>, StoreError>;

    async fn update_issue(&self, id: &str, patch: &IssuePatch) -> Result<(), StoreError>;

    async fn delete_issue(&self, id: &str) -> Result<(), StoreError>;

    /// Remove every project and issue.
    async fn reset(&self) -> Result<(), StoreError>;
}

/// Which storage strategy a session uses. Resolved once, at construction.
#[derive(Debug, Clone, PartialEq)]
pub enum Backend {
    /// The containerized deployment: a tracker API reachable over HTTP.
    Remote { base_url: String },
    /// No API available: persist JSON arrays under `data_dir`.
    Local { data_dir: PathBuf },
}

impl Backend {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Remote { .. } => "remote",
            Self::Local { .. } => "local",
        }
    }
}

/// Build the store for `backend`.
pub async fn create_store(backend: &Backend) -> Result<Arc<dyn Store>, StoreError> {
    match backend {
        Backend::Remote { base_url } => Ok(Arc::new(RemoteStore::new(base_url.clone()))),
        Backend::Local { data_dir } => Ok(Arc::new(LocalStore::open_dir(data_dir).await?)),
    }
}
