use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Store;
use crate::errors::StoreError;
use crate::models::{Issue, IssuePatch, Project, ProjectPatch};

/// Where the tracker API listens in the containerized deployment.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Every list/get response wraps its payload as `{"message": ...}`. Acks and
/// errors use the same key for a human-readable string.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    message: T,
}

/// Store that talks to the tracker REST API.
#[derive(Clone)]
pub struct RemoteStore {
    client: reqwest::Client,
    base_url: String,
}

impl RemoteStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, StoreError> {
        debug!(path, "GET");
        let resp = self.client.get(self.url(path)).send().await?;
        if !resp.status().is_success() {
            return Err(status_error(resp).await);
        }
        let envelope: Envelope<Vec<T>> = resp.json().await?;
        Ok(envelope.message)
    }

    async fn get_one<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, StoreError> {
        debug!(path, "GET");
        let resp = self.client.get(self.url(path)).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(status_error(resp).await);
        }
        let envelope: Envelope<T> = resp.json().await?;
        Ok(Some(envelope.message))
    }

    /// POST `body`. If the API echoes the created entity inside the envelope
    /// it is returned; a plain ack returns `body` unchanged.
    async fn post_create<T>(&self, path: &str, body: T) -> Result<T, StoreError>
    where
        T: Serialize + DeserializeOwned,
    {
        debug!(path, "POST");
        let resp = self.client.post(self.url(path)).json(&body).send().await?;
        if !resp.status().is_success() {
            return Err(status_error(resp).await);
        }
        let bytes = resp.bytes().await?;
        let echoed = serde_json::from_slice::<Envelope<serde_json::Value>>(&bytes)
            .ok()
            .filter(|envelope| envelope.message.is_object())
            .and_then(|envelope| serde_json::from_value::<T>(envelope.message).ok());
        Ok(echoed.unwrap_or(body))
    }

    /// Send a request whose response is only an ack. 404 counts as success:
    /// updating or deleting an unknown id is a no-op.
    async fn send_ack(&self, method: &str, path: &str, req: RequestBuilder) -> Result<(), StoreError> {
        debug!(method, path, "sending");
        let resp = req.send().await?;
        let status = resp.status();
        if status.is_success() || status == StatusCode::NOT_FOUND {
            Ok(())
        } else {
            Err(status_error(resp).await)
        }
    }
}

/// Turn a non-2xx response into `StoreError::Status`, preferring the
/// envelope's message over the raw body.
async fn status_error(resp: Response) -> StoreError {
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<Envelope<serde_json::Value>>(&body) {
        Ok(Envelope {
            message: serde_json::Value::String(s),
        }) => s,
        Ok(Envelope { message }) => message.to_string(),
        Err(_) => body,
    };
    StoreError::Status { status, message }
}

#[async_trait]
impl Store for RemoteStore {
    async fn list_projects(&self) -> Result<Vec<Project>, StoreError> {
        self.get_list("/projects").await
    }

    async fn create_project(&self, project: Project) -> Result<Project, StoreError> {
        self.post_create("/projects", project).await
    }

    async fn get_project(&self, id: &str) -> Result<Option<Project>, StoreError> {
        self.get_one(&format!("/projects/{}", id)).await
    }

    async fn update_project(&self, id: &str, patch: &ProjectPatch) -> Result<(), StoreError> {
        let path = format!("/projects/{}", id);
        let req = self.client.put(self.url(&path)).json(patch);
        self.send_ack("PUT", &path, req).await
    }

    async fn delete_project(&self, id: &str) -> Result<(), StoreError> {
        let path = format!("/projects/{}", id);
        let req = self.client.delete(self.url(&path));
        self.send_ack("DELETE", &path, req).await
    }

    async fn list_issues(&self) -> Result<Vec<Issue>, StoreError> {
        self.get_list("/issues").await
    }

    async fn list_issues_of_project(&self, project_id: &str) -> Result<Vec<Issue>, StoreError> {
        self.get_list(&format!("/projects/{}/issues", project_id))
            .await
    }

    async fn create_issue(&self, issue: Issue) -> Result<Issue, StoreError> {
        let path = format!("/projects/{}/issues", issue.project_id);
        self.post_create(&path, issue).await
    }

    async fn get_issue(&self, id: &str) -> Result<Option<Issue>, StoreError> {
        self.get_one(&format!("/issues/{}", id)).await
    }

    async fn update_issue(&self, id: &str, patch: &IssuePatch) -> Result<(), StoreError> {
        let path = format!("/issues/{}", id);
        let req = self.client.put(self.url(&path)).json(patch);
        self.send_ack("PUT", &path, req).await
    }

    async fn delete_issue(&self, id: &str) -> Result<(), StoreError> {
        let path = format!("/issues/{}", id);
        let req = self.client.delete(self.url(&path));
        self.send_ack("DELETE", &path, req).await
    }

    async fn reset(&self) -> Result<(), StoreError> {
        let req = self.client.delete(self.url("/reset"));
        self.send_ack("DELETE", "/reset", req).await
    }
}
