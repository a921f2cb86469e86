//! Task storage - JSON file persistence
//!
//! Two sibling files in one data directory: `tasks.json` holds the active
//! list in insertion order, `archive.json` holds the append-only history.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

use super::model::{ArchiveReason, ArchivedTask, Task};

/// Storage failures
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("No task found matching '{0}'. Run `tally list` to see current numbers.")]
    NotFound(String),

    #[error("Failed to read task data: {0}")]
    ReadFailed(#[source] std::io::Error),

    #[error("Failed to persist task data: {0}")]
    PersistFailed(#[source] std::io::Error),

    #[error("Task data is corrupted: {0}")]
    Corrupted(#[from] serde_json::Error),

    #[error("Could not determine a data directory for this platform")]
    NoDataDir,
}

/// Filter for archive listings
#[derive(Debug, Clone, Default)]
pub struct ArchiveFilter {
    /// Only entries whose task carries this tag
    pub tag: Option<String>,
    /// Only entries archived for this reason
    pub reason: Option<ArchiveReason>,
}

/// Sort order for archive listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArchiveSort {
    /// Insertion order, oldest first
    #[default]
    Insertion,
    /// Most urgent priority first
    Priority,
    /// Most recently archived first
    ArchivedAt,
}

/// Durable store for the active list and the archive.
///
/// One instance is constructed per process entry point and passed by
/// reference to command handlers. Single-process exclusive access is
/// assumed; there is no file locking, so concurrent external writers race
/// last-writer-wins.
pub struct Store {
    tasks_path: PathBuf,
    archive_path: PathBuf,
}

impl Store {
    /// Open the store in the platform data directory (`<data>/tally/`)
    pub fn open_default() -> Result<Self, StoreError> {
        let dir = dirs::data_dir().ok_or(StoreError::NoDataDir)?.join("tally");
        Self::open(dir)
    }

    /// Open the store in a specific directory, creating it if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(StoreError::PersistFailed)?;
        Ok(Self {
            tasks_path: dir.join("tasks.json"),
            archive_path: dir.join("archive.json"),
        })
    }

    /// Active tasks in insertion order
    pub fn list(&self) -> Result<Vec<Task>, StoreError> {
        read_collection(&self.tasks_path)
    }

    /// Append a task to the end of the active list
    pub fn add(&self, task: Task) -> Result<(), StoreError> {
        let mut tasks = self.list()?;
        tasks.push(task);
        self.write_collection(&self.tasks_path, &tasks)
    }

    /// Apply a mutation to the task with `id` and persist the result.
    /// The id and creation timestamp cannot be changed through this path.
    pub fn update(
        &self,
        id: &str,
        mutate: impl FnOnce(&mut Task),
    ) -> Result<Task, StoreError> {
        let mut tasks = self.list()?;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let (frozen_id, frozen_created_at) = (task.id.clone(), task.created_at);
        mutate(task);
        task.id = frozen_id;
        task.created_at = frozen_created_at;

        let updated = task.clone();
        self.write_collection(&self.tasks_path, &tasks)?;
        Ok(updated)
    }

    /// Hard-delete a task without keeping history
    pub fn remove(&self, id: &str) -> Result<Task, StoreError> {
        let mut tasks = self.list()?;
        let index = tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let removed = tasks.remove(index);
        self.write_collection(&self.tasks_path, &tasks)?;
        Ok(removed)
    }

    /// Move a task from the active list to the archive.
    ///
    /// The active list is written first, then the archive. A crash between
    /// the two writes can lose the archive record, but never duplicates the
    /// task across both files.
    pub fn archive(
        &self,
        id: &str,
        reason: ArchiveReason,
        now: DateTime<Utc>,
    ) -> Result<ArchivedTask, StoreError> {
        let mut tasks = self.list()?;
        let index = tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let task = tasks.remove(index);

        let entry = ArchivedTask {
            task,
            archived_at: now,
            reason,
        };

        self.write_collection(&self.tasks_path, &tasks)?;

        let mut archive: Vec<ArchivedTask> = read_collection(&self.archive_path)?;
        archive.push(entry.clone());
        self.write_collection(&self.archive_path, &archive)?;

        Ok(entry)
    }

    /// Archived tasks, filtered and sorted
    pub fn list_archive(
        &self,
        filter: &ArchiveFilter,
        sort: ArchiveSort,
    ) -> Result<Vec<ArchivedTask>, StoreError> {
        let mut archive: Vec<ArchivedTask> = read_collection(&self.archive_path)?;

        if let Some(tag) = &filter.tag {
            archive.retain(|a| a.task.tags.contains(tag));
        }
        if let Some(reason) = filter.reason {
            archive.retain(|a| a.reason == reason);
        }

        match sort {
            ArchiveSort::Insertion => {}
            ArchiveSort::Priority => archive.sort_by_key(|a| a.task.priority),
            ArchiveSort::ArchivedAt => {
                archive.sort_by(|a, b| b.archived_at.cmp(&a.archived_at));
            }
        }

        Ok(archive)
    }

    /// Replace a collection file atomically: the new content lands in a
    /// temp file in the same directory and is renamed over the target, so
    /// a partial write is never observable. The previous file is kept as
    /// a best-effort `.bak` copy.
    fn write_collection<T: Serialize>(&self, path: &Path, items: &[T]) -> Result<(), StoreError> {
        if path.exists() {
            let backup_path = path.with_extension("json.bak");
            if let Err(e) = fs::copy(path, &backup_path) {
                warn!("Failed to create backup of {:?}: {}", path, e);
            }
        }

        let content = serde_json::to_string_pretty(items)?;
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(StoreError::PersistFailed)?;
        tmp.write_all(content.as_bytes())
            .map_err(StoreError::PersistFailed)?;
        tmp.persist(path)
            .map_err(|e| StoreError::PersistFailed(e.error))?;
        Ok(())
    }
}

/// Read a JSON array file. A missing, empty or whitespace-only file is an
/// empty collection, not an error.
fn read_collection<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(path).map_err(StoreError::ReadFailed)?;
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::model::{parse_tags, Priority};
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn task(title: &str) -> Task {
        Task::new(title, at(100)).unwrap()
    }

    #[test]
    fn test_empty_store_lists_nothing() -> Result<(), StoreError> {
        let temp = tempdir().unwrap();
        let store = Store::open(temp.path())?;

        assert!(store.list()?.is_empty());
        assert!(store
            .list_archive(&ArchiveFilter::default(), ArchiveSort::default())?
            .is_empty());
        Ok(())
    }

    #[test]
    fn test_add_then_list_preserves_insertion_order() -> Result<(), StoreError> {
        let temp = tempdir().unwrap();
        let store = Store::open(temp.path())?;

        store.add(task("first"))?;
        store.add(task("second"))?;
        store.add(task("third"))?;

        let titles: Vec<String> = store.list()?.into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
        Ok(())
    }

    #[test]
    fn test_add_scenario_defaults() -> Result<(), StoreError> {
        let temp = tempdir().unwrap();
        let store = Store::open(temp.path())?;

        store.add(task("Buy milk"))?;

        let tasks = store.list()?;
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Buy milk");
        assert_eq!(tasks[0].priority, Priority::None);
        assert!(tasks[0].tags.is_empty());
        Ok(())
    }

    #[test]
    fn test_whitespace_only_file_is_empty_collection() -> Result<(), StoreError> {
        let temp = tempdir().unwrap();
        let store = Store::open(temp.path())?;

        fs::write(temp.path().join("tasks.json"), "  \n \t ").unwrap();
        assert!(store.list()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_corrupted_file_is_an_error() {
        let temp = tempdir().unwrap();
        let store = Store::open(temp.path()).unwrap();

        fs::write(temp.path().join("tasks.json"), "{ not json }").unwrap();
        assert!(matches!(store.list(), Err(StoreError::Corrupted(_))));
    }

    #[test]
    fn test_update_mutates_in_place() -> Result<(), StoreError> {
        let temp = tempdir().unwrap();
        let store = Store::open(temp.path())?;

        let original = task("draft");
        store.add(original.clone())?;

        let updated = store.update(&original.id, |t| {
            t.title = "final".to_string();
            t.priority = Priority::High;
            t.tags = parse_tags("work");
        })?;

        assert_eq!(updated.title, "final");
        let listed = store.list()?;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "final");
        assert_eq!(listed[0].priority, Priority::High);
        Ok(())
    }

    #[test]
    fn test_update_cannot_change_id_or_created_at() -> Result<(), StoreError> {
        let temp = tempdir().unwrap();
        let store = Store::open(temp.path())?;

        let original = task("immutable core");
        store.add(original.clone())?;

        let updated = store.update(&original.id, |t| {
            t.id = "hijacked".to_string();
            t.created_at = at(999_999);
        })?;

        assert_eq!(updated.id, original.id);
        assert_eq!(updated.created_at, original.created_at);
        Ok(())
    }

    #[test]
    fn test_update_unknown_id_is_not_found() {
        let temp = tempdir().unwrap();
        let store = Store::open(temp.path()).unwrap();

        let result = store.update("no-such-id", |t| t.title = "x".to_string());
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_remove_is_a_hard_delete() -> Result<(), StoreError> {
        let temp = tempdir().unwrap();
        let store = Store::open(temp.path())?;

        let victim = task("gone for good");
        store.add(victim.clone())?;
        store.add(task("survivor"))?;

        let removed = store.remove(&victim.id)?;
        assert_eq!(removed.id, victim.id);

        assert_eq!(store.list()?.len(), 1);
        // No history retained.
        assert!(store
            .list_archive(&ArchiveFilter::default(), ArchiveSort::default())?
            .is_empty());
        Ok(())
    }

    #[test]
    fn test_archive_moves_rather_than_copies() -> Result<(), StoreError> {
        let temp = tempdir().unwrap();
        let store = Store::open(temp.path())?;

        let done = task("ship it");
        store.add(done.clone())?;
        store.add(task("keep going"))?;

        let entry = store.archive(&done.id, ArchiveReason::Completed, at(5000))?;
        assert_eq!(entry.task.id, done.id);
        assert_eq!(entry.reason, ArchiveReason::Completed);
        assert_eq!(entry.archived_at, at(5000));

        let active = store.list()?;
        assert_eq!(active.len(), 1);
        assert!(active.iter().all(|t| t.id != done.id));

        let archive = store.list_archive(&ArchiveFilter::default(), ArchiveSort::default())?;
        assert_eq!(archive.len(), 1);
        assert_eq!(archive[0].task.title, "ship it");
        Ok(())
    }

    #[test]
    fn test_archive_unknown_id_changes_nothing() -> Result<(), StoreError> {
        let temp = tempdir().unwrap();
        let store = Store::open(temp.path())?;
        store.add(task("only one"))?;

        let result = store.archive("missing", ArchiveReason::Deleted, at(0));
        assert!(matches!(result, Err(StoreError::NotFound(_))));
        assert_eq!(store.list()?.len(), 1);
        Ok(())
    }

    #[test]
    fn test_archive_filter_by_reason_and_tag() -> Result<(), StoreError> {
        let temp = tempdir().unwrap();
        let store = Store::open(temp.path())?;

        let mut tagged = task("tagged");
        tagged.tags = parse_tags("work");
        let plain = task("plain");
        store.add(tagged.clone())?;
        store.add(plain.clone())?;

        store.archive(&tagged.id, ArchiveReason::Completed, at(10))?;
        store.archive(&plain.id, ArchiveReason::Deleted, at(20))?;

        let completed = store.list_archive(
            &ArchiveFilter {
                reason: Some(ArchiveReason::Completed),
                ..Default::default()
            },
            ArchiveSort::default(),
        )?;
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].task.title, "tagged");

        let work = store.list_archive(
            &ArchiveFilter {
                tag: Some("work".to_string()),
                ..Default::default()
            },
            ArchiveSort::default(),
        )?;
        assert_eq!(work.len(), 1);
        assert_eq!(work[0].task.title, "tagged");
        Ok(())
    }

    #[test]
    fn test_archive_sort_orders() -> Result<(), StoreError> {
        let temp = tempdir().unwrap();
        let store = Store::open(temp.path())?;

        let mut low = task("low");
        low.priority = Priority::Low;
        let mut high = task("high");
        high.priority = Priority::High;
        store.add(low.clone())?;
        store.add(high.clone())?;

        store.archive(&low.id, ArchiveReason::Completed, at(100))?;
        store.archive(&high.id, ArchiveReason::Completed, at(200))?;

        let by_priority =
            store.list_archive(&ArchiveFilter::default(), ArchiveSort::Priority)?;
        assert_eq!(by_priority[0].task.title, "high");

        let by_date =
            store.list_archive(&ArchiveFilter::default(), ArchiveSort::ArchivedAt)?;
        assert_eq!(by_date[0].task.title, "high"); // newest first
        assert_eq!(by_date[1].task.title, "low");
        Ok(())
    }

    #[test]
    fn test_save_keeps_backup_of_previous_state() -> Result<(), StoreError> {
        let temp = tempdir().unwrap();
        let store = Store::open(temp.path())?;

        store.add(task("first state"))?;
        store.add(task("second state"))?;

        let backup = temp.path().join("tasks.json.bak");
        assert!(backup.exists());
        let backup_content = fs::read_to_string(&backup).unwrap();
        assert!(backup_content.contains("first state"));
        assert!(!backup_content.contains("second state"));
        Ok(())
    }

    #[test]
    fn test_store_roundtrip_preserves_all_fields() -> Result<(), StoreError> {
        let temp = tempdir().unwrap();
        let store = Store::open(temp.path())?;

        let mut original = task("full fidelity");
        original.priority = Priority::Medium;
        original.due = Some(at(1_700_000_000));
        original.tags = parse_tags("alpha,beta");
        store.add(original.clone())?;

        let loaded = store.list()?;
        assert_eq!(loaded, vec![original]);
        Ok(())
    }
}
