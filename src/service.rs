//! Data access facade.
//!
//! `DataService` is what the board, the project list and the CLI talk to.
//! It owns one [`Store`] chosen at construction and forwards every call to
//! it; callers never learn which backend is active. Each call is a single
//! fire-once request: no retries, no deduplication of in-flight updates, no
//! cancellation.

use std::sync::Arc;

use tracing::debug;

use crate::errors::StoreError;
use crate::models::{Issue, IssuePatch, Project, ProjectPatch};
use crate::store::{Backend, Store, create_store};

#[derive(Clone)]
pub struct DataService {
    store: Arc<dyn Store>,
}

impl DataService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Build the store for `backend` and wrap it.
    pub async fn connect(backend: &Backend) -> Result<Self, StoreError> {
        debug!(backend = backend.kind(), "connecting data service");
        Ok(Self::new(create_store(backend).await?))
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>, StoreError> {
        debug!("list_projects");
        self.store.list_projects().await
    }

    pub async fn create_project(&self, project: Project) -> Result<Project, StoreError> {
        debug!(name = %project.name, "create_project");
        self.store.create_project(project).await
    }

    pub async fn get_project(&self, id: &str) -> Result<Option<Project>, StoreError> {
        debug!(id, "get_project");
        self.store.get_project(id).await
    }

    pub async fn update_project(&self, id: &str, patch: &ProjectPatch) -> Result<(), StoreError> {
        debug!(id, "update_project");
        self.store.update_project(id, patch).await
    }

    pub async fn delete_project(&self, id: &str) -> Result<(), StoreError> {
        debug!(id, "delete_project");
        self.store.delete_project(id).await
    }

    pub async fn list_issues(&self) -> Result<Vec<Issue>, StoreError> {
        debug!("list_issues");
        self.store.list_issues().await
    }

    pub async fn list_issues_of_project(&self, project_id: &str) -> Result<Vec<Issue>, StoreError> {
        debug!(project_id, "list_issues_of_project");
        self.store.list_issues_of_project(project_id).await
    }

    pub async fn create_issue(&self, issue: Issue) -> Result<Issue, StoreError> {
        debug!(project_id = %issue.project_id, title = %issue.title, "create_issue");
        self.store.create_issue(issue).await
    }

    pub async fn get_issue(&self, id: &str) -> Result<Option<Issue>, StoreError> {
        debug!(id, "get_issue");
        self.store.get_issue(id).await
    }

    pub async fn update_issue(&self, id: &str, patch: &IssuePatch) -> Result<(), StoreError> {
        debug!(id, status = ?patch.status, "update_issue");
        self.store.update_issue(id, patch).await
    }

    pub async fn delete_issue(&self, id: &str) -> Result<(), StoreError> {
        debug!(id, "delete_issue");
        self.store.delete_issue(id).await
    }

    pub async fn reset(&self) -> Result<(), StoreError> {
        debug!("reset");
        self.store.reset().await
    }
}
