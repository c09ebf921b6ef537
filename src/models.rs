use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Lifecycle status shared by projects and issues.
///
/// Serialized as the variant name (`"InProgress"`), which is what the
/// tracker API stores and what the board compares against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemStatus {
    #[default]
    New,
    Approved,
    InProgress,
    Done,
    Closed,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Approved => "Approved",
            Self::InProgress => "InProgress",
            Self::Done => "Done",
            Self::Closed => "Closed",
        }
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "new" => Ok(Self::New),
            "approved" => Ok(Self::Approved),
            "inprogress" | "in_progress" | "in-progress" | "in progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            "closed" => Ok(Self::Closed),
            _ => Err(format!("Invalid status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemPriority {
    Low,
    Medium,
    High,
    Critical,
}

impl ItemPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }

    /// High and Critical both count towards a project's high-priority total.
    pub fn is_high(&self) -> bool {
        matches!(self, Self::High | Self::Critical)
    }
}

impl std::fmt::Display for ItemPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(format!("Invalid priority: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    Bug,
    Task,
    Improvement,
    Feature,
    Other,
    #[default]
    Unknown,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bug => "Bug",
            Self::Task => "Task",
            Self::Improvement => "Improvement",
            Self::Feature => "Feature",
            Self::Other => "Other",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bug" => Ok(Self::Bug),
            "task" => Ok(Self::Task),
            "improvement" => Ok(Self::Improvement),
            "feature" => Ok(Self::Feature),
            "other" => Ok(Self::Other),
            "unknown" => Ok(Self::Unknown),
            _ => Err(format!("Invalid issue type: {}", s)),
        }
    }
}

// ── Entities ──────────────────────────────────────────────────────────

/// A tracked project.
///
/// An empty `id` means the backend has not assigned one yet; it is left
/// out of the serialized body so creates never send a placeholder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "String::is_empty"
    )]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: ItemStatus,
    #[serde(
        default,
        deserialize_with = "lenient_priority",
        skip_serializing_if = "Option::is_none"
    )]
    pub priority: Option<ItemPriority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_started: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_closed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
}

impl Project {
    pub fn new(name: impl Into<String>, status: ItemStatus) -> Self {
        Self {
            name: name.into(),
            status,
            ..Default::default()
        }
    }

    /// Overwrite every field present in `patch`, keep the rest.
    pub fn apply(&mut self, patch: &ProjectPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(priority) = patch.priority {
            self.priority = Some(priority);
        }
        if let Some(date_started) = &patch.date_started {
            self.date_started = Some(date_started.clone());
        }
        if let Some(date_closed) = &patch.date_closed {
            self.date_closed = Some(date_closed.clone());
        }
        if let Some(labels) = &patch.labels {
            self.labels = Some(labels.clone());
        }
    }
}

/// A single issue belonging to a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "String::is_empty"
    )]
    pub id: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub project_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub issue_type: ItemType,
    #[serde(default)]
    pub status: ItemStatus,
    #[serde(
        default,
        deserialize_with = "lenient_priority",
        skip_serializing_if = "Option::is_none"
    )]
    pub priority: Option<ItemPriority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_started: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_due: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_closed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
}

impl Issue {
    pub fn new(project_id: impl Into<String>, title: impl Into<String>, status: ItemStatus) -> Self {
        Self {
            project_id: project_id.into(),
            title: title.into(),
            status,
            ..Default::default()
        }
    }

    /// Overwrite every field present in `patch`, keep the rest.
    pub fn apply(&mut self, patch: &IssuePatch) {
        if let Some(project_id) = &patch.project_id {
            self.project_id = project_id.clone();
        }
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
        }
        if let Some(issue_type) = patch.issue_type {
            self.issue_type = issue_type;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(priority) = patch.priority {
            self.priority = Some(priority);
        }
        if let Some(date_started) = &patch.date_started {
            self.date_started = Some(date_started.clone());
        }
        if let Some(date_due) = &patch.date_due {
            self.date_due = Some(date_due.clone());
        }
        if let Some(date_closed) = &patch.date_closed {
            self.date_closed = Some(date_closed.clone());
        }
        if let Some(labels) = &patch.labels {
            self.labels = Some(labels.clone());
        }
    }

    /// Text the board filter matches against; a missing description is "".
    pub fn description_or_empty(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

// ── Patches ───────────────────────────────────────────────────────────

/// Partial update for a [`Project`]. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ItemStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<ItemPriority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_started: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_closed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
}

impl ProjectPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<&Project> for ProjectPatch {
    fn from(project: &Project) -> Self {
        Self {
            name: Some(project.name.clone()),
            description: project.description.clone(),
            status: Some(project.status),
            priority: project.priority,
            date_started: project.date_started.clone(),
            date_closed: project.date_closed.clone(),
            labels: project.labels.clone(),
        }
    }
}

/// Partial update for an [`Issue`]. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssuePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub issue_type: Option<ItemType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ItemStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<ItemPriority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_started: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_due: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_closed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
}

impl IssuePatch {
    pub fn status(status: ItemStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Every field the issue currently carries, as a patch. A status-changing
/// board drop sends this with the new status already set.
impl From<&Issue> for IssuePatch {
    fn from(issue: &Issue) -> Self {
        Self {
            project_id: Some(issue.project_id.clone()),
            title: Some(issue.title.clone()),
            description: issue.description.clone(),
            issue_type: Some(issue.issue_type),
            status: Some(issue.status),
            priority: issue.priority,
            date_started: issue.date_started.clone(),
            date_due: issue.date_due.clone(),
            date_closed: issue.date_closed.clone(),
            labels: issue.labels.clone(),
        }
    }
}

// ── Serde helpers ─────────────────────────────────────────────────────

/// The API hands out integer ids from SERIAL columns while locally assigned
/// ids are strings. Accept either and keep a string.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Str(s)) => s,
        Some(Raw::Int(n)) => n.to_string(),
        Some(Raw::Float(n)) => n.to_string(),
        None => String::new(),
    })
}

/// Older clients stored a literal `"Unknown"` priority; anything outside the
/// four known levels reads as "no priority".
fn lenient_priority<'de, D>(deserializer: D) -> Result<Option<ItemPriority>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| ItemPriority::from_str(&s).ok()))
}
