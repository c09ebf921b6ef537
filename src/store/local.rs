use std::path::Path;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::Store;
use super::kv::{FileKv, KeyValueStore, KvHandle, MemoryKv};
use crate::errors::StoreError;
use crate::models::{Issue, IssuePatch, Project, ProjectPatch};

pub const PROJECTS_KEY: &str = "projects";
pub const ISSUES_KEY: &str = "issues";

/// Store backed by two JSON arrays in a key-value store.
///
/// Every mutation reads the whole array, changes it in memory and writes the
/// whole array back. Writers in other processes are not detected: the last
/// write wins.
///
/// Ids are assigned here as `max(existing ids) + 1`, which assumes every id
/// in the collection is numeric. See [`next_local_id`].
#[derive(Clone)]
pub struct LocalStore {
    kv: KvHandle,
}

impl LocalStore {
    /// Wrap `kv`, writing an empty array under each missing key.
    pub async fn open(kv: KvHandle) -> Result<Self, StoreError> {
        kv.call(|kv| {
            for key in [PROJECTS_KEY, ISSUES_KEY] {
                if kv.get(key)?.is_none() {
                    kv.set(key, "[]")?;
                }
            }
            Ok(())
        })
        .await?;
        Ok(Self { kv })
    }

    /// Persist under `dir` as `projects.json` and `issues.json`.
    pub async fn open_dir(dir: &Path) -> Result<Self, StoreError> {
        debug!(dir = %dir.display(), "opening local store");
        Self::open(KvHandle::new(FileKv::open(dir)?)).await
    }

    /// Ephemeral store that lives as long as the process.
    pub async fn in_memory() -> Result<Self, StoreError> {
        Self::open(KvHandle::new(MemoryKv::new())).await
    }
}

/// Read a collection; an absent or blank entry is an empty collection.
fn read_collection<T: DeserializeOwned>(
    kv: &dyn KeyValueStore,
    key: &str,
) -> Result<Vec<T>, StoreError> {
    match kv.get(key)? {
        Some(raw) if !raw.trim().is_empty() => Ok(serde_json::from_str(&raw)?),
        _ => Ok(Vec::new()),
    }
}

fn write_collection<T: Serialize>(
    kv: &mut dyn KeyValueStore,
    key: &str,
    items: &[T],
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(items)?;
    kv.set(key, &raw)
}

/// Next id for a locally created entity: the largest existing id plus one,
/// or `"1"` for an empty collection.
///
/// Ids are read as numbers. Integers are summed exactly; ids past the `i128`
/// range or written in float notation switch the computation to `f64`. A
/// single non-numeric id makes the result `"NaN"` and logs a warning; stored
/// ids are never rewritten.
pub fn next_local_id<'a>(ids: impl IntoIterator<Item = &'a str>) -> String {
    let mut max_int: Option<i128> = None;
    let mut max_float: Option<f64> = None;
    for id in ids {
        let id_trim = id.trim();
        if let Ok(n) = id_trim.parse::<i128>() {
            max_int = Some(max_int.map_or(n, |m| m.max(n)));
            continue;
        }
        match id_trim.parse::<f64>() {
            Ok(n) if n.is_finite() => max_float = Some(max_float.map_or(n, |m| m.max(n))),
            _ => {
                warn!(id, "non-numeric id in local store, next id will be NaN");
                return "NaN".to_string();
            }
        }
    }

    match (max_int, max_float) {
        (None, None) => "1".to_string(),
        (Some(m), None) => match m.checked_add(1) {
            Some(next) => next.to_string(),
            None => (m as f64 + 1.0).to_string(),
        },
        (int, Some(f)) => {
            let m = int.map_or(f, |i| f.max(i as f64));
            (m + 1.0).to_string()
        }
    }
}

fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[async_trait]
impl Store for LocalStore {
    async fn list_projects(&self) -> Result<Vec<Project>, StoreError> {
        self.kv
            .call(|kv| read_collection(kv, PROJECTS_KEY))
            .await
    }

    async fn create_project(&self, mut project: Project) -> Result<Project, StoreError> {
        self.kv
            .call(move |kv| {
                let mut projects: Vec<Project> = read_collection(kv, PROJECTS_KEY)?;
                if project.id.is_empty() {
                    project.id = next_local_id(projects.iter().map(|p| p.id.as_str()));
                }
                if project.date_created.is_none() {
                    project.date_created = Some(now_timestamp());
                }
                projects.push(project.clone());
                write_collection(kv, PROJECTS_KEY, &projects)?;
                Ok(project)
            })
            .await
    }

    async fn get_project(&self, id: &str) -> Result<Option<Project>, StoreError> {
        let id = id.to_string();
        self.kv
            .call(move |kv| {
                let projects: Vec<Project> = read_collection(kv, PROJECTS_KEY)?;
                Ok(projects.into_iter().find(|p| p.id == id))
            })
            .await
    }

    async fn update_project(&self, id: &str, patch: &ProjectPatch) -> Result<(), StoreError> {
        let id = id.to_string();
        let patch = patch.clone();
        self.kv
            .call(move |kv| {
                let mut projects: Vec<Project> = read_collection(kv, PROJECTS_KEY)?;
                match projects.iter_mut().find(|p| p.id == id) {
                    Some(project) => project.apply(&patch),
                    None => return Ok(()),
                }
                write_collection(kv, PROJECTS_KEY, &projects)
            })
            .await
    }

    async fn delete_project(&self, id: &str) -> Result<(), StoreError> {
        let id = id.to_string();
        self.kv
            .call(move |kv| {
                let mut projects: Vec<Project> = read_collection(kv, PROJECTS_KEY)?;
                let before = projects.len();
                projects.retain(|p| p.id != id);
                if projects.len() == before {
                    return Ok(());
                }

                // Issues go with their project, as on the API. They are
                // written first so a failed write never leaves orphans.
                let mut issues: Vec<Issue> = read_collection(kv, ISSUES_KEY)?;
                issues.retain(|i| i.project_id != id);
                write_collection(kv, ISSUES_KEY, &issues)?;
                write_collection(kv, PROJECTS_KEY, &projects)
            })
            .await
    }

    async fn list_issues(&self) -> Result<Vec<Issue>, StoreError> {
        self.kv.call(|kv| read_collection(kv, ISSUES_KEY)).await
    }

    async fn list_issues_of_project(&self, project_id: &str) -> Result<Vec<Issue>, StoreError> {
        let project_id = project_id.to_string();
        self.kv
            .call(move |kv| {
                let issues: Vec<Issue> = read_collection(kv, ISSUES_KEY)?;
                Ok(issues
                    .into_iter()
                    .filter(|i| i.project_id == project_id)
                    .collect())
            })
            .await
    }

    async fn create_issue(&self, mut issue: Issue) -> Result<Issue, StoreError> {
        self.kv
            .call(move |kv| {
                let projects: Vec<Project> = read_collection(kv, PROJECTS_KEY)?;
                if !projects.iter().any(|p| p.id == issue.project_id) {
                    return Err(StoreError::UnknownProject {
                        id: issue.project_id.clone(),
                    });
                }

                let mut issues: Vec<Issue> = read_collection(kv, ISSUES_KEY)?;
                if issue.id.is_empty() {
                    issue.id = next_local_id(issues.iter().map(|i| i.id.as_str()));
                }
                if issue.date_created.is_none() {
                    issue.date_created = Some(now_timestamp());
                }
                issues.push(issue.clone());
                write_collection(kv, ISSUES_KEY, &issues)?;
                Ok(issue)
            })
            .await
    }

    async fn get_issue(&self, id: &str) -> Result<Option<Issue>, StoreError> {
        let id = id.to_string();
        self.kv
            .call(move |kv| {
                let issues: Vec<Issue> = read_collection(kv, ISSUES_KEY)?;
                Ok(issues.into_iter().find(|i| i.id == id))
            })
            .await
    }

    async fn update_issue(&self, id: &str, patch: &IssuePatch) -> Result<(), StoreError> {
        let id = id.to_string();
        let patch = patch.clone();
        self.kv
            .call(move |kv| {
                let mut issues: Vec<Issue> = read_collection(kv, ISSUES_KEY)?;
                match issues.iter_mut().find(|i| i.id == id) {
                    Some(issue) => issue.apply(&patch),
                    None => return Ok(()),
                }
                write_collection(kv, ISSUES_KEY, &issues)
            })
            .await
    }

    async fn delete_issue(&self, id: &str) -> Result<(), StoreError> {
        let id = id.to_string();
        self.kv
            .call(move |kv| {
                let mut issues: Vec<Issue> = read_collection(kv, ISSUES_KEY)?;
                let before = issues.len();
                issues.retain(|i| i.id != id);
                if issues.len() == before {
                    return Ok(());
                }
                write_collection(kv, ISSUES_KEY, &issues)
            })
            .await
    }

    async fn reset(&self) -> Result<(), StoreError> {
        self.kv
            .call(|kv| {
                kv.set(ISSUES_KEY, "[]")?;
                kv.set(PROJECTS_KEY, "[]")
            })
            .await
    }
}
