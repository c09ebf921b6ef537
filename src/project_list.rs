//! Project list view-model: the landing screen's projects, a name filter,
//! and create/delete that reload from the store afterwards.

use tracing::error;

use crate::errors::StoreError;
use crate::models::{ItemPriority, ItemStatus, Project};
use crate::service::DataService;
use crate::util::contains_ignore_case;

pub struct ProjectList {
    service: DataService,
    projects: Vec<Project>,
}

impl ProjectList {
    pub fn new(service: DataService) -> Self {
        Self {
            service,
            projects: Vec::new(),
        }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub async fn load(&mut self) -> Result<(), StoreError> {
        match self.service.list_projects().await {
            Ok(projects) => {
                self.projects = projects;
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Error fetching projects");
                Err(e)
            }
        }
    }

    /// Projects whose name contains `query`, ignoring case.
    pub fn filtered(&self, query: &str) -> Vec<&Project> {
        self.projects
            .iter()
            .filter(|p| contains_ignore_case(&p.name, query))
            .collect()
    }

    /// New projects start In Progress with Low priority.
    ///
    /// Succeeds once the store accepts the project; a failed reload is
    /// logged and keeps the previous list.
    pub async fn create(
        &mut self,
        name: &str,
        description: Option<String>,
    ) -> Result<Project, StoreError> {
        let project = Project {
            name: name.to_string(),
            description,
            status: ItemStatus::InProgress,
            priority: Some(ItemPriority::Low),
            ..Default::default()
        };
        let created = self.service.create_project(project).await.map_err(|e| {
            error!(error = %e, "Error creating project");
            e
        })?;
        let _ = self.load().await;
        Ok(created)
    }

    /// Delete a project, then reload. A failed reload is logged only.
    pub async fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        self.service.delete_project(id).await.map_err(|e| {
            error!(id, error = %e, "Error deleting project");
            e
        })?;
        let _ = self.load().await;
        Ok(())
    }
}
