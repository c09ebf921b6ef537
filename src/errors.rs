//! Typed error hierarchy for Trackify.
//!
//! Two enums cover the two library layers:
//! - `StoreError`: data access failures from either backend
//! - `BoardError`: board controller failures, wrapping `StoreError`
//!
//! A missing entity is not an error anywhere in this crate: lookups return
//! `Option` and updates/deletes of unknown ids are no-ops.

use thiserror::Error;

/// Errors from the data access layer (remote API or local store).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to access local store at {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON in store: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Project {id} does not exist")]
    UnknownProject { id: String },

    #[error("Local store lock poisoned")]
    LockPoisoned,

    #[error("Local store task failed: {0}")]
    TaskFailed(String),
}

/// Errors from the kanban board controller.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("Unknown drop zone '{zone}'")]
    UnknownDropZone { zone: String },

    #[error("Issue {issue_id} is not in drop zone '{zone}'")]
    IssueNotInBucket { issue_id: String, zone: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}
