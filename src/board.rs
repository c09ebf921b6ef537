//! Kanban board controller.
//!
//! A [`Board`] holds one project's issues and derives four buckets from
//! them, one per open status. The master issue list is the single source of
//! ordering: buckets are stable status filters over it, and the visible
//! lists are the buckets narrowed by the current free-text query. Sorting
//! and drag-and-drop both reorder the master list, so every rebuild
//! reproduces what the user last saw.
//!
//! ## Drag-and-drop
//!
//! A drop names the issue, the zone it left, the zone it landed in and the
//! index inside the landing zone's *visible* list.
//!
//! - Same zone: the issue is reordered in memory. No store call.
//! - Different zone: the issue with its new status is sent to the store as
//!   a full patch. Only after the store confirms does the issue change
//!   bucket. On failure nothing in memory changes, the status included.
//! - Unknown zone id: rejected before anything is touched.

use std::str::FromStr;

use tracing::{debug, error};

use crate::errors::{BoardError, StoreError};
use crate::models::{Issue, IssuePatch, ItemPriority, ItemStatus, ItemType, Project};
use crate::service::DataService;
use crate::util::{contains_ignore_case, locale_compare, parse_labels};

/// Default title for an issue created without one.
pub const DEFAULT_ISSUE_TITLE: &str = "New Issue";
/// Default description for an issue created without one.
pub const DEFAULT_ISSUE_DESCRIPTION: &str = "This is a new issue";

/// One kanban column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    New,
    Approved,
    InProgress,
    Done,
}

impl Bucket {
    pub const ALL: [Bucket; 4] = [Self::New, Self::Approved, Self::InProgress, Self::Done];

    fn index(self) -> usize {
        match self {
            Self::New => 0,
            Self::Approved => 1,
            Self::InProgress => 2,
            Self::Done => 3,
        }
    }

    pub fn status(self) -> ItemStatus {
        match self {
            Self::New => ItemStatus::New,
            Self::Approved => ItemStatus::Approved,
            Self::InProgress => ItemStatus::InProgress,
            Self::Done => ItemStatus::Done,
        }
    }

    /// Closed issues have no column.
    pub fn for_status(status: ItemStatus) -> Option<Self> {
        match status {
            ItemStatus::New => Some(Self::New),
            ItemStatus::Approved => Some(Self::Approved),
            ItemStatus::InProgress => Some(Self::InProgress),
            ItemStatus::Done => Some(Self::Done),
            ItemStatus::Closed => None,
        }
    }

    pub fn drop_zone(self) -> &'static str {
        match self {
            Self::New => "newList",
            Self::Approved => "approvedList",
            Self::InProgress => "inProgList",
            Self::Done => "doneList",
        }
    }

    pub fn from_drop_zone(zone: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.drop_zone() == zone)
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Approved => "Approved",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
        }
    }

    /// Column for a list title as shown on the board. Unrecognized titles
    /// fall back to New.
    pub fn from_list_title(title: &str) -> Self {
        match title.trim().to_uppercase().as_str() {
            "APPROVED" => Self::Approved,
            "IN PROGRESS" => Self::InProgress,
            "DONE" => Self::Done,
            _ => Self::New,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    AToZ,
    ZToA,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "az" | "a-z" | "alphabeticallyaz" => Ok(Self::AToZ),
            "za" | "z-a" | "alphabeticallyza" => Ok(Self::ZToA),
            _ => Err(format!("Invalid sort order: {}", s)),
        }
    }
}

/// A completed drag gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropEvent {
    pub issue_id: String,
    pub from_zone: String,
    pub to_zone: String,
    /// Position in the landing zone's visible list. Past the end means
    /// "after the last issue in that column".
    pub to_index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Reordered { bucket: Bucket },
    Transferred { from: Bucket, to: Bucket },
}

/// User input for a new issue. Blank title and description get defaults.
#[derive(Debug, Clone, Default)]
pub struct IssueDraft {
    pub title: String,
    pub description: String,
    /// Free text, split on whitespace and commas.
    pub labels: String,
    pub issue_type: ItemType,
    pub priority: Option<ItemPriority>,
}

/// Split `issues` into the four columns, keeping input order.
pub fn partition(issues: &[Issue]) -> [Vec<Issue>; 4] {
    let mut buckets: [Vec<Issue>; 4] = Default::default();
    for issue in issues {
        if let Some(bucket) = Bucket::for_status(issue.status) {
            buckets[bucket.index()].push(issue.clone());
        }
    }
    buckets
}

/// Issues whose title or description contains `query`, ignoring case.
pub fn filter_issues(issues: &[Issue], query: &str) -> Vec<Issue> {
    issues
        .iter()
        .filter(|issue| matches_query(issue, query))
        .cloned()
        .collect()
}

fn matches_query(issue: &Issue, query: &str) -> bool {
    contains_ignore_case(&issue.title, query)
        || contains_ignore_case(issue.description_or_empty(), query)
}

/// View-model for one project's kanban board.
pub struct Board {
    service: DataService,
    project_id: String,
    project: Option<Project>,
    issues: Vec<Issue>,
    query: String,
    buckets: [Vec<Issue>; 4],
    visible: [Vec<Issue>; 4],
}

impl Board {
    pub fn new(service: DataService, project_id: impl Into<String>) -> Self {
        Self {
            service,
            project_id: project_id.into(),
            project: None,
            issues: Vec::new(),
            query: String::new(),
            buckets: Default::default(),
            visible: Default::default(),
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn project(&self) -> Option<&Project> {
        self.project.as_ref()
    }

    /// Every issue of the project in board order, Closed ones included.
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn bucket(&self, bucket: Bucket) -> &[Issue] {
        &self.buckets[bucket.index()]
    }

    /// The bucket narrowed by the current query; what a column renders.
    pub fn visible(&self, bucket: Bucket) -> &[Issue] {
        &self.visible[bucket.index()]
    }

    /// Fetch the project record and its issues.
    pub async fn load(&mut self) -> Result<(), BoardError> {
        match self.service.get_project(&self.project_id).await {
            Ok(project) => self.project = project,
            Err(e) => {
                error!(project_id = %self.project_id, error = %e, "Error fetching project");
                return Err(e.into());
            }
        }
        self.refresh().await
    }

    /// Re-fetch the project's issues and rebuild every bucket. On failure the
    /// board keeps its current state.
    pub async fn refresh(&mut self) -> Result<(), BoardError> {
        match self.service.list_issues_of_project(&self.project_id).await {
            Ok(issues) => {
                self.set_issues(issues);
                Ok(())
            }
            Err(e) => {
                error!(project_id = %self.project_id, error = %e, "Error fetching issues");
                Err(e.into())
            }
        }
    }

    /// Replace the issue set and rebuild buckets in the given order.
    pub fn set_issues(&mut self, issues: Vec<Issue>) {
        self.issues = issues;
        self.rebuild();
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.apply_filter();
    }

    /// Sort every column by title at once.
    pub fn sort(&mut self, order: SortOrder) {
        match order {
            SortOrder::AToZ => self.issues.sort_by(|a, b| locale_compare(&a.title, &b.title)),
            SortOrder::ZToA => self.issues.sort_by(|a, b| locale_compare(&b.title, &a.title)),
        }
        self.rebuild();
    }

    /// Number of issues with High or Critical priority.
    pub fn high_priority_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.priority.is_some_and(|p| p.is_high()))
            .count()
    }

    /// Apply a drop. See the module docs for the rules.
    pub async fn move_issue(&mut self, event: &DropEvent) -> Result<MoveOutcome, BoardError> {
        let from = resolve_zone(&event.from_zone)?;
        let to = resolve_zone(&event.to_zone)?;

        let pos = self
            .issues
            .iter()
            .position(|i| i.id == event.issue_id && i.status == from.status())
            .ok_or_else(|| BoardError::IssueNotInBucket {
                issue_id: event.issue_id.clone(),
                zone: event.from_zone.clone(),
            })?;

        if from == to {
            self.reposition(pos, to, event.to_index);
            self.rebuild();
            debug!(issue_id = %event.issue_id, bucket = to.title(), "reordered issue");
            return Ok(MoveOutcome::Reordered { bucket: to });
        }

        let mut updated = self.issues[pos].clone();
        updated.status = to.status();

        if let Err(e) = self
            .service
            .update_issue(&updated.id, &IssuePatch::from(&updated))
            .await
        {
            error!(issue_id = %updated.id, error = %e, "Error updating issue");
            return Err(e.into());
        }

        self.issues[pos] = updated;
        self.reposition(pos, to, event.to_index);
        self.rebuild();
        debug!(
            issue_id = %event.issue_id,
            from = from.title(),
            to = to.title(),
            "moved issue"
        );
        Ok(MoveOutcome::Transferred { from, to })
    }

    /// Create an issue in the column titled `list_title`, then refresh.
    ///
    /// Once the store accepts the issue the call succeeds; a failed refresh
    /// is logged and leaves the board as it was.
    pub async fn create_issue(
        &mut self,
        draft: IssueDraft,
        list_title: &str,
    ) -> Result<Issue, BoardError> {
        let status = Bucket::from_list_title(list_title).status();
        let title = if draft.title.trim().is_empty() {
            DEFAULT_ISSUE_TITLE.to_string()
        } else {
            draft.title
        };
        let description = if draft.description.trim().is_empty() {
            DEFAULT_ISSUE_DESCRIPTION.to_string()
        } else {
            draft.description
        };

        let issue = Issue {
            project_id: self.project_id.clone(),
            title,
            description: Some(description),
            issue_type: draft.issue_type,
            status,
            priority: draft.priority,
            labels: Some(parse_labels(&draft.labels)),
            ..Default::default()
        };

        let created = self
            .service
            .create_issue(issue)
            .await
            .map_err(|e| log_store_error("creating issue", e))?;
        let _ = self.refresh().await;
        Ok(created)
    }

    /// Delete an issue, then refresh. A failed refresh is logged only.
    pub async fn delete_issue(&mut self, issue_id: &str) -> Result<(), BoardError> {
        self.service
            .delete_issue(issue_id)
            .await
            .map_err(|e| log_store_error("deleting issue", e))?;
        let _ = self.refresh().await;
        Ok(())
    }

    fn rebuild(&mut self) {
        self.buckets = partition(&self.issues);
        self.apply_filter();
    }

    fn apply_filter(&mut self) {
        for bucket in Bucket::ALL {
            self.visible[bucket.index()] = filter_issues(&self.buckets[bucket.index()], &self.query);
        }
    }

    /// Move `issues[pos]` so it lands at `to_index` of `bucket`'s visible
    /// list. The issue must already carry `bucket`'s status.
    fn reposition(&mut self, pos: usize, bucket: Bucket, to_index: usize) {
        let issue = self.issues.remove(pos);
        let status = bucket.status();

        let anchor = self
            .issues
            .iter()
            .enumerate()
            .filter(|(_, i)| i.status == status && matches_query(i, &self.query))
            .map(|(idx, _)| idx)
            .nth(to_index);

        let insert_at = match anchor {
            Some(idx) => idx,
            None => match self.issues.iter().rposition(|i| i.status == status) {
                Some(last) => last + 1,
                None => self.issues.len(),
            },
        };
        self.issues.insert(insert_at, issue);
    }
}

fn resolve_zone(zone: &str) -> Result<Bucket, BoardError> {
    Bucket::from_drop_zone(zone).ok_or_else(|| {
        error!(zone, "Invalid container ID");
        BoardError::UnknownDropZone {
            zone: zone.to_string(),
        }
    })
}

fn log_store_error(action: &str, e: StoreError) -> BoardError {
    error!(error = %e, "Error {}", action);
    e.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use crate::models::ProjectPatch;
    use crate::store::{LocalStore, Store};

    /// Local store that records issue updates and can be told to fail them,
    /// or to fail listing a project's issues.
    struct ScriptedStore {
        inner: LocalStore,
        fail_updates: AtomicBool,
        fail_issue_lists: AtomicBool,
        updates: Mutex<Vec<(String, IssuePatch)>>,
    }

    impl ScriptedStore {
        async fn new() -> Arc<Self> {
            Arc::new(Self {
                inner: LocalStore::in_memory().await.unwrap(),
                fail_updates: AtomicBool::new(false),
                fail_issue_lists: AtomicBool::new(false),
                updates: Mutex::new(Vec::new()),
            })
        }

        fn recorded_updates(&self) -> Vec<(String, IssuePatch)> {
            self.updates.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Store for ScriptedStore {
        async fn list_projects(&self) -> Result<Vec<Project>, StoreError> {
            self.inner.list_projects().await
        }
        async fn create_project(&self, project: Project) -> Result<Project, StoreError> {
            self.inner.create_project(project).await
        }
        async fn get_project(&self, id: &str) -> Result<Option<Project>, StoreError> {
            self.inner.get_project(id).await
        }
        async fn update_project(&self, id: &str, patch: &ProjectPatch) -> Result<(), StoreError> {
            self.inner.update_project(id, patch).await
        }
        async fn delete_project(&self, id: &str) -> Result<(), StoreError> {
            self.inner.delete_project(id).await
        }
        async fn list_issues(&self) -> Result<Vec<Issue>, StoreError> {
            self.inner.list_issues().await
        }
        async fn list_issues_of_project(&self, project_id: &str) -> Result<Vec<Issue>, StoreError> {
            if self.fail_issue_lists.load(Ordering::SeqCst) {
                return Err(StoreError::Status {
                    status: 500,
                    message: "An issue occurred when trying to fetch the issues".into(),
                });
            }
            self.inner.list_issues_of_project(project_id).await
        }
        async fn create_issue(&self, issue: Issue) -> Result<Issue, StoreError> {
            self.inner.create_issue(issue).await
        }
        async fn get_issue(&self, id: &str) -> Result<Option<Issue>, StoreError> {
            self.inner.get_issue(id).await
        }
        async fn update_issue(&self, id: &str, patch: &IssuePatch) -> Result<(), StoreError> {
            self.updates
                .lock()
                .unwrap()
                .push((id.to_string(), patch.clone()));
            if self.fail_updates.load(Ordering::SeqCst) {
                return Err(StoreError::Status {
                    status: 500,
                    message: "An issue occurred when trying to update the issue".into(),
                });
            }
            self.inner.update_issue(id, patch).await
        }
        async fn delete_issue(&self, id: &str) -> Result<(), StoreError> {
            self.inner.delete_issue(id).await
        }
        async fn reset(&self) -> Result<(), StoreError> {
            self.inner.reset().await
        }
    }

    fn issue(id: &str, title: &str, status: ItemStatus) -> Issue {
        let mut issue = Issue::new("1", title, status);
        issue.id = id.to_string();
        issue
    }

    fn titles(issues: &[Issue]) -> Vec<&str> {
        issues.iter().map(|i| i.title.as_str()).collect()
    }

    /// Board over a scripted store holding one project and the given issues.
    async fn seeded_board(issues: Vec<Issue>) -> (Board, Arc<ScriptedStore>) {
        let store = ScriptedStore::new().await;
        let project = store
            .create_project(Project::new("Board", ItemStatus::InProgress))
            .await
            .unwrap();
        for mut i in issues {
            i.project_id = project.id.clone();
            store.create_issue(i).await.unwrap();
        }
        let mut board = Board::new(DataService::new(store.clone()), project.id);
        board.load().await.unwrap();
        (board, store)
    }

    fn offline_board() -> Board {
        // Never awaited against; only the synchronous paths are exercised.
        let store: Arc<dyn Store> = Arc::new(crate::store::RemoteStore::new("http://127.0.0.1:9"));
        Board::new(DataService::new(store), "1")
    }

    #[test]
    fn test_drop_zone_mapping() {
        for bucket in Bucket::ALL {
            assert_eq!(Bucket::from_drop_zone(bucket.drop_zone()), Some(bucket));
        }
        assert_eq!(Bucket::from_drop_zone("trashList"), None);
    }

    #[test]
    fn test_from_list_title() {
        assert_eq!(Bucket::from_list_title("In Progress"), Bucket::InProgress);
        assert_eq!(Bucket::from_list_title("done"), Bucket::Done);
        assert_eq!(Bucket::from_list_title("APPROVED"), Bucket::Approved);
        assert_eq!(Bucket::from_list_title("Backlog"), Bucket::New);
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!("az".parse::<SortOrder>().unwrap(), SortOrder::AToZ);
        assert_eq!("alphabeticallyza".parse::<SortOrder>().unwrap(), SortOrder::ZToA);
        assert!("newest".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_partition_covers_exactly_open_statuses() {
        let issues = vec![
            issue("1", "a", ItemStatus::New),
            issue("2", "b", ItemStatus::Done),
            issue("3", "c", ItemStatus::Closed),
            issue("4", "d", ItemStatus::InProgress),
            issue("5", "e", ItemStatus::New),
            issue("6", "f", ItemStatus::Approved),
        ];
        let buckets = partition(&issues);

        for bucket in Bucket::ALL {
            for i in &buckets[bucket.index()] {
                assert_eq!(i.status, bucket.status());
            }
            let expected = issues.iter().filter(|i| i.status == bucket.status()).count();
            assert_eq!(buckets[bucket.index()].len(), expected);
        }
        let placed: usize = buckets.iter().map(Vec::len).sum();
        assert_eq!(placed, 5);
        assert!(buckets.iter().flatten().all(|i| i.id != "3"));
        assert_eq!(titles(&buckets[Bucket::New.index()]), vec!["a", "e"]);
    }

    #[test]
    fn test_filter_matches_title_or_description() {
        let mut with_desc = issue("1", "Refactor", ItemStatus::New);
        with_desc.description = Some("Login page crashes".into());
        let issues = vec![
            with_desc,
            issue("2", "LOGIN timeout", ItemStatus::New),
            issue("3", "Unrelated", ItemStatus::New),
        ];
        let filtered = filter_issues(&issues, "login");
        assert_eq!(titles(&filtered), vec!["Refactor", "LOGIN timeout"]);
        assert_eq!(filter_issues(&issues, "").len(), 3);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let issues = vec![
            issue("1", "Fix login", ItemStatus::New),
            issue("2", "Add logout", ItemStatus::New),
            issue("3", "Docs", ItemStatus::New),
        ];
        let once = filter_issues(&issues, "LOG");
        let twice = filter_issues(&once, "LOG");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_set_query_narrows_visible_only() {
        let mut board = offline_board();
        board.set_issues(vec![
            issue("1", "Fix login", ItemStatus::New),
            issue("2", "Write docs", ItemStatus::New),
            issue("3", "Login audit", ItemStatus::Done),
        ]);
        board.set_query("login");
        assert_eq!(titles(board.visible(Bucket::New)), vec!["Fix login"]);
        assert_eq!(titles(board.visible(Bucket::Done)), vec!["Login audit"]);
        assert_eq!(board.bucket(Bucket::New).len(), 2);

        board.set_query("");
        assert_eq!(board.visible(Bucket::New).len(), 2);
    }

    #[test]
    fn test_sort_az_then_za_reverses_each_bucket() {
        let mut board = offline_board();
        board.set_issues(vec![
            issue("1", "charlie", ItemStatus::New),
            issue("2", "Alpha", ItemStatus::New),
            issue("3", "bravo", ItemStatus::New),
            issue("4", "zulu", ItemStatus::Done),
            issue("5", "Echo", ItemStatus::Done),
        ]);

        board.sort(SortOrder::AToZ);
        let az: Vec<String> = board.bucket(Bucket::New).iter().map(|i| i.title.clone()).collect();
        assert_eq!(az, vec!["Alpha", "bravo", "charlie"]);
        assert_eq!(titles(board.bucket(Bucket::Done)), vec!["Echo", "zulu"]);

        board.sort(SortOrder::ZToA);
        let mut za: Vec<String> = board.bucket(Bucket::New).iter().map(|i| i.title.clone()).collect();
        za.reverse();
        assert_eq!(za, az);
        assert_eq!(titles(board.bucket(Bucket::Done)), vec!["zulu", "Echo"]);
    }

    #[test]
    fn test_sort_reapplies_filter() {
        let mut board = offline_board();
        board.set_issues(vec![
            issue("1", "b login", ItemStatus::New),
            issue("2", "a login", ItemStatus::New),
            issue("3", "c other", ItemStatus::New),
        ]);
        board.set_query("login");
        board.sort(SortOrder::AToZ);
        assert_eq!(titles(board.visible(Bucket::New)), vec!["a login", "b login"]);
    }

    #[test]
    fn test_high_priority_count() {
        let mut board = offline_board();
        let mut high = issue("1", "a", ItemStatus::New);
        high.priority = Some(ItemPriority::High);
        let mut critical = issue("2", "b", ItemStatus::Closed);
        critical.priority = Some(ItemPriority::Critical);
        let mut low = issue("3", "c", ItemStatus::Done);
        low.priority = Some(ItemPriority::Low);
        board.set_issues(vec![high, critical, low, issue("4", "d", ItemStatus::New)]);
        assert_eq!(board.high_priority_count(), 2);
    }

    #[tokio::test]
    async fn test_drag_new_to_done_persists_and_moves() {
        let (mut board, store) = seeded_board(vec![
            issue("", "First", ItemStatus::New),
            issue("", "Second", ItemStatus::New),
            issue("", "Shipped", ItemStatus::Done),
        ])
        .await;
        let moving = board.bucket(Bucket::New)[0].clone();

        let outcome = board
            .move_issue(&DropEvent {
                issue_id: moving.id.clone(),
                from_zone: "newList".into(),
                to_zone: "doneList".into(),
                to_index: 0,
            })
            .await
            .unwrap();

        assert_eq!(
            outcome,
            MoveOutcome::Transferred {
                from: Bucket::New,
                to: Bucket::Done
            }
        );
        let updates = store.recorded_updates();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].0, moving.id);
        assert_eq!(updates[0].1.status, Some(ItemStatus::Done));
        assert_eq!(updates[0].1.title.as_deref(), Some("First"));

        assert_eq!(titles(board.bucket(Bucket::New)), vec!["Second"]);
        assert_eq!(titles(board.bucket(Bucket::Done)), vec!["First", "Shipped"]);

        let persisted = store.get_issue(&moving.id).await.unwrap().unwrap();
        assert_eq!(persisted.status, ItemStatus::Done);
    }

    #[tokio::test]
    async fn test_drop_index_past_end_appends_to_column() {
        let (mut board, _store) = seeded_board(vec![
            issue("", "Mover", ItemStatus::New),
            issue("", "Review A", ItemStatus::Approved),
            issue("", "Review B", ItemStatus::Approved),
        ])
        .await;
        let moving = board.bucket(Bucket::New)[0].id.clone();

        board
            .move_issue(&DropEvent {
                issue_id: moving,
                from_zone: "newList".into(),
                to_zone: "approvedList".into(),
                to_index: 99,
            })
            .await
            .unwrap();

        assert_eq!(
            titles(board.bucket(Bucket::Approved)),
            vec!["Review A", "Review B", "Mover"]
        );
        assert!(board.bucket(Bucket::New).is_empty());
    }

    #[tokio::test]
    async fn test_failed_drop_rolls_back_completely() {
        let (mut board, store) = seeded_board(vec![
            issue("", "Stuck", ItemStatus::New),
            issue("", "Other", ItemStatus::InProgress),
        ])
        .await;
        store.fail_updates.store(true, Ordering::SeqCst);
        let moving = board.bucket(Bucket::New)[0].clone();

        let err = board
            .move_issue(&DropEvent {
                issue_id: moving.id.clone(),
                from_zone: "newList".into(),
                to_zone: "inProgList".into(),
                to_index: 0,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, BoardError::Store(StoreError::Status { status: 500, .. })));
        assert_eq!(store.recorded_updates().len(), 1);
        assert_eq!(titles(board.bucket(Bucket::New)), vec!["Stuck"]);
        assert_eq!(titles(board.bucket(Bucket::InProgress)), vec!["Other"]);
        let in_memory = board.issues().iter().find(|i| i.id == moving.id).unwrap();
        assert_eq!(in_memory.status, ItemStatus::New);
    }

    #[tokio::test]
    async fn test_unknown_drop_zone_has_no_side_effect() {
        let (mut board, store) = seeded_board(vec![issue("", "Stay", ItemStatus::New)]).await;
        let before = board.issues().to_vec();
        let moving = before[0].id.clone();

        let err = board
            .move_issue(&DropEvent {
                issue_id: moving,
                from_zone: "newList".into(),
                to_zone: "trashList".into(),
                to_index: 0,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, BoardError::UnknownDropZone { ref zone } if zone == "trashList"));
        assert!(store.recorded_updates().is_empty());
        assert_eq!(board.issues(), before.as_slice());
    }

    #[tokio::test]
    async fn test_issue_not_in_source_zone_is_rejected() {
        let (mut board, store) = seeded_board(vec![issue("", "Fresh", ItemStatus::New)]).await;
        let id = board.bucket(Bucket::New)[0].id.clone();

        let err = board
            .move_issue(&DropEvent {
                issue_id: id,
                from_zone: "doneList".into(),
                to_zone: "newList".into(),
                to_index: 0,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, BoardError::IssueNotInBucket { .. }));
        assert!(store.recorded_updates().is_empty());
    }

    #[tokio::test]
    async fn test_same_zone_reorders_without_store_call() {
        let (mut board, store) = seeded_board(vec![
            issue("", "A", ItemStatus::New),
            issue("", "B", ItemStatus::New),
            issue("", "C", ItemStatus::New),
        ])
        .await;
        let a = board.bucket(Bucket::New)[0].id.clone();
        let c = board.bucket(Bucket::New)[2].id.clone();

        let outcome = board
            .move_issue(&DropEvent {
                issue_id: a,
                from_zone: "newList".into(),
                to_zone: "newList".into(),
                to_index: 2,
            })
            .await
            .unwrap();
        assert_eq!(outcome, MoveOutcome::Reordered { bucket: Bucket::New });
        assert_eq!(titles(board.bucket(Bucket::New)), vec!["B", "C", "A"]);

        board
            .move_issue(&DropEvent {
                issue_id: c,
                from_zone: "newList".into(),
                to_zone: "newList".into(),
                to_index: 0,
            })
            .await
            .unwrap();
        assert_eq!(titles(board.bucket(Bucket::New)), vec!["C", "B", "A"]);
        assert!(store.recorded_updates().is_empty());
    }

    #[tokio::test]
    async fn test_drop_index_addresses_filtered_list() {
        let (mut board, _store) = seeded_board(vec![
            issue("", "login mover", ItemStatus::New),
            issue("", "hidden", ItemStatus::Done),
            issue("", "login first", ItemStatus::Done),
            issue("", "login second", ItemStatus::Done),
        ])
        .await;
        board.set_query("login");
        let moving = board.visible(Bucket::New)[0].id.clone();

        board
            .move_issue(&DropEvent {
                issue_id: moving,
                from_zone: "newList".into(),
                to_zone: "doneList".into(),
                to_index: 1,
            })
            .await
            .unwrap();

        assert_eq!(
            titles(board.visible(Bucket::Done)),
            vec!["login first", "login mover", "login second"]
        );
        assert_eq!(
            titles(board.bucket(Bucket::Done)),
            vec!["hidden", "login first", "login mover", "login second"]
        );
    }

    #[tokio::test]
    async fn test_create_issue_uses_column_and_defaults() {
        let (mut board, _store) = seeded_board(Vec::new()).await;

        let created = board
            .create_issue(
                IssueDraft {
                    labels: "ui, backend  urgent".into(),
                    issue_type: ItemType::Feature,
                    ..Default::default()
                },
                "In Progress",
            )
            .await
            .unwrap();

        assert_eq!(created.title, DEFAULT_ISSUE_TITLE);
        assert_eq!(created.description.as_deref(), Some(DEFAULT_ISSUE_DESCRIPTION));
        assert_eq!(created.status, ItemStatus::InProgress);
        assert_eq!(
            created.labels,
            Some(vec!["ui".to_string(), "backend".to_string(), "urgent".to_string()])
        );
        assert_eq!(titles(board.bucket(Bucket::InProgress)), vec![DEFAULT_ISSUE_TITLE]);
    }

    #[tokio::test]
    async fn test_delete_issue_refreshes_board() {
        let (mut board, _store) = seeded_board(vec![
            issue("", "Keep", ItemStatus::Approved),
            issue("", "Drop", ItemStatus::Approved),
        ])
        .await;
        let id = board.bucket(Bucket::Approved)[1].id.clone();
        board.delete_issue(&id).await.unwrap();
        assert_eq!(titles(board.bucket(Bucket::Approved)), vec!["Keep"]);
    }

    #[tokio::test]
    async fn test_create_issue_succeeds_when_refresh_fails() {
        let (mut board, store) = seeded_board(vec![issue("", "Existing", ItemStatus::New)]).await;
        store.fail_issue_lists.store(true, Ordering::SeqCst);

        let created = board
            .create_issue(
                IssueDraft {
                    title: "Saved anyway".into(),
                    ..Default::default()
                },
                "New",
            )
            .await
            .unwrap();

        assert_eq!(created.title, "Saved anyway");
        let stored = store.list_issues().await.unwrap();
        assert_eq!(stored.len(), 2);
        assert!(stored.iter().any(|i| i.id == created.id));
        // Board keeps its previous state.
        assert_eq!(titles(board.bucket(Bucket::New)), vec!["Existing"]);
    }

    #[tokio::test]
    async fn test_delete_issue_succeeds_when_refresh_fails() {
        let (mut board, store) = seeded_board(vec![
            issue("", "Keep", ItemStatus::Done),
            issue("", "Drop", ItemStatus::Done),
        ])
        .await;
        let id = board.bucket(Bucket::Done)[1].id.clone();
        store.fail_issue_lists.store(true, Ordering::SeqCst);

        board.delete_issue(&id).await.unwrap();

        assert!(store.get_issue(&id).await.unwrap().is_none());
        assert_eq!(titles(board.bucket(Bucket::Done)), vec!["Keep", "Drop"]);
    }

    #[tokio::test]
    async fn test_load_reads_project_record() {
        let (board, _store) = seeded_board(Vec::new()).await;
        assert_eq!(board.project().map(|p| p.name.as_str()), Some("Board"));
    }
}
