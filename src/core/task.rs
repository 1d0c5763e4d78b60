use chrono::{DateTime, Utc};
use serde_json::Value;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

use crate::errors::Error;

/// Represents the current status of a task in the pool
///
/// A task has no status before its driver assigns one; that pre-run
/// state is modeled as `None` on the task record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// The task is actively being executed
    Running,
    /// The task finished successfully
    Done,
    /// The task failed; the task record carries the error message
    Error,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Running => f.write_str("Running"),
            TaskStatus::Done => f.write_str("Done"),
            TaskStatus::Error => f.write_str("Error"),
        }
    }
}

/// Structured task identifier: an optional parent reference plus a
/// locally unique suffix.
///
/// Subtask ids carry an explicit link to their parent instead of being
/// glued together by string concatenation, so identity comparison never
/// depends on separator characters. The `Display` form (segments joined
/// with `-`) exists only for the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskId {
    parent: Option<Arc<TaskId>>,
    local: String,
}

impl TaskId {
    /// Creates a fresh root identifier
    pub fn root() -> Self {
        Self {
            parent: None,
            local: Uuid::new_v4().simple().to_string(),
        }
    }

    /// Derives an identifier for a subtask of this id
    pub fn child(&self) -> Self {
        Self {
            parent: Some(Arc::new(self.clone())),
            local: Uuid::new_v4().simple().to_string(),
        }
    }

    /// Returns the parent identifier, or `None` for a root id
    pub fn parent(&self) -> Option<&TaskId> {
        self.parent.as_deref()
    }

    /// Returns true if this id belongs to a root task
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.parent {
            Some(parent) => write!(f, "{}-{}", parent, self.local),
            None => f.write_str(&self.local),
        }
    }
}

/// Opaque task output tagged with the discriminant converters dispatch on
#[derive(Debug, Clone)]
pub struct TaskOutput {
    /// Output kind declared by the producer of the value
    pub kind: String,
    /// The raw value handed over by the unit of work
    pub value: Value,
}

/// Mutable half of a task, written by the thread driving execution and
/// read by snapshot builders. Always accessed through the task's lock.
#[derive(Debug, Default)]
struct TaskRecord {
    status: Option<TaskStatus>,
    error: Option<String>,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
    output: Option<TaskOutput>,
    children: Vec<Task>,
}

#[derive(Debug)]
struct TaskInner {
    id: TaskId,
    kind: String,
    owner: String,
    created: DateTime<Utc>,
    ran: AtomicBool,
    record: Mutex<TaskRecord>,
}

/// A trackable unit of background work.
///
/// `Task` is a cheap shared handle; cloning it clones the handle, not the
/// task. Identity, type tag, owner and creation time are immutable, while
/// status, error, timestamps, output and children live behind a per-task
/// lock so the executing thread and concurrent snapshot readers never
/// observe torn state.
#[derive(Debug, Clone)]
pub struct Task {
    inner: Arc<TaskInner>,
}

impl Task {
    /// Creates a new root task with a fresh identifier
    ///
    /// # Arguments
    ///
    /// * `kind` - Type tag classifying the kind of work
    /// * `owner` - The originating actor
    pub fn new(kind: impl Into<String>, owner: impl Into<String>) -> Self {
        Self::with_id(TaskId::root(), kind, owner)
    }

    fn with_id(id: TaskId, kind: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(TaskInner {
                id,
                kind: kind.into(),
                owner: owner.into(),
                created: Utc::now(),
                ran: AtomicBool::new(false),
                record: Mutex::new(TaskRecord::default()),
            }),
        }
    }

    /// Creates a subtask under this task and appends it to the ordered
    /// child sequence
    ///
    /// # Arguments
    ///
    /// * `kind` - Type tag of the subtask
    /// * `owner` - The originating actor
    ///
    /// # Returns
    ///
    /// A handle to the newly created child task
    pub fn spawn_subtask(&self, kind: impl Into<String>, owner: impl Into<String>) -> Task {
        let child = Task::with_id(self.inner.id.child(), kind, owner);
        self.record().children.push(child.clone());
        child
    }

    fn record(&self) -> MutexGuard<'_, TaskRecord> {
        self.inner
            .record
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Identifier of this task
    pub fn id(&self) -> &TaskId {
        &self.inner.id
    }

    /// Type tag classifying the kind of work
    pub fn kind(&self) -> &str {
        &self.inner.kind
    }

    /// The actor that created this task
    pub fn owner(&self) -> &str {
        &self.inner.owner
    }

    /// Creation time of this task
    pub fn created(&self) -> DateTime<Utc> {
        self.inner.created
    }

    /// Identifier of the parent task, or `None` for roots
    pub fn parent_id(&self) -> Option<&TaskId> {
        self.inner.id.parent()
    }

    /// Current status, `None` before the first transition
    pub fn status(&self) -> Option<TaskStatus> {
        self.record().status
    }

    /// Status rendered for display; empty before the first transition
    pub fn status_text(&self) -> String {
        match self.record().status {
            Some(status) => status.to_string(),
            None => String::new(),
        }
    }

    /// Error message recorded by `abort`, if any
    pub fn error(&self) -> Option<String> {
        self.record().error.clone()
    }

    /// Time at which execution started, if it has
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.record().start_time
    }

    /// Time at which the task reached a terminal status, if it has
    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.record().end_time
    }

    /// Output attached by the unit of work, if any
    pub fn output(&self) -> Option<TaskOutput> {
        self.record().output.clone()
    }

    /// Ordered handles to this task's subtasks
    pub fn children(&self) -> Vec<Task> {
        self.record().children.clone()
    }

    /// Records the start of execution. Does not touch the status; status
    /// bookkeeping for display stays with the caller.
    pub fn mark_started(&self) {
        self.record().start_time = Some(Utc::now());
    }

    /// Sets the display status of this task
    pub fn set_status(&self, status: TaskStatus) {
        self.record().status = Some(status);
    }

    /// Marks the task as successfully finished, setting the end time
    pub fn mark_done(&self) {
        let mut record = self.record();
        record.status = Some(TaskStatus::Done);
        record.end_time = Some(Utc::now());
    }

    /// Records a failure: stores the error message, sets status to
    /// `Error` and stamps the end time
    ///
    /// # Returns
    ///
    /// The error, unchanged, so the caller can propagate it
    pub fn abort(&self, err: Error) -> Error {
        let mut record = self.record();
        record.error = Some(err.to_string());
        record.status = Some(TaskStatus::Error);
        record.end_time = Some(Utc::now());
        err
    }

    /// Attaches a tagged output value to the task
    ///
    /// # Arguments
    ///
    /// * `kind` - Discriminant the presentation layer dispatches
    ///   converters on
    /// * `value` - The opaque output value
    pub fn set_output(&self, kind: impl Into<String>, value: Value) {
        self.record().output = Some(TaskOutput {
            kind: kind.into(),
            value,
        });
    }

    /// Claims the single execution slot of this task. Returns true the
    /// first time only.
    pub(crate) fn claim_run(&self) -> bool {
        !self.inner.ran.swap(true, Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_task_has_no_status_and_no_timestamps() {
        let task = Task::new("build", "u1");
        assert_eq!(task.status(), None);
        assert_eq!(task.status_text(), "");
        assert!(task.start_time().is_none());
        assert!(task.end_time().is_none());
        assert!(task.error().is_none());
        assert!(task.id().is_root());
    }

    #[test]
    fn mark_started_leaves_status_untouched() {
        let task = Task::new("build", "u1");
        task.mark_started();
        assert!(task.start_time().is_some());
        assert_eq!(task.status(), None);
        assert!(task.end_time().is_none());
    }

    #[test]
    fn mark_done_sets_terminal_state_without_error() {
        let task = Task::new("build", "u1");
        task.mark_started();
        task.mark_done();
        assert_eq!(task.status(), Some(TaskStatus::Done));
        assert!(task.error().is_none());
        let start = task.start_time().unwrap();
        let end = task.end_time().unwrap();
        assert!(end >= start);
    }

    #[test]
    fn abort_couples_error_status_and_end_time() {
        let task = Task::new("build", "u1");
        task.mark_started();
        let returned = task.abort(Error::Execution("disk full".into()));
        assert_eq!(returned.to_string(), "disk full");
        assert_eq!(task.status(), Some(TaskStatus::Error));
        assert_eq!(task.error().as_deref(), Some("disk full"));
        assert!(task.end_time().is_some());
    }

    #[test]
    fn subtask_ids_reference_their_parent() {
        let parent = Task::new("build", "u1");
        let child = parent.spawn_subtask("compile", "u1");
        assert_eq!(child.parent_id(), Some(parent.id()));
        assert!(!child.id().is_root());
        let wire = child.id().to_string();
        assert!(wire.starts_with(&parent.id().to_string()));
    }

    #[test]
    fn subtasks_keep_insertion_order() {
        let parent = Task::new("build", "u1");
        let first = parent.spawn_subtask("compile", "u1");
        let second = parent.spawn_subtask("link", "u1");
        let children = parent.children();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].id(), first.id());
        assert_eq!(children[1].id(), second.id());
    }

    #[test]
    fn output_keeps_the_producer_supplied_kind() {
        let task = Task::new("scan", "u1");
        task.set_output("file-list", json!(["a.mp4", "b.mp4"]));
        let output = task.output().unwrap();
        assert_eq!(output.kind, "file-list");
        assert_eq!(output.value, json!(["a.mp4", "b.mp4"]));
    }

    #[test]
    fn claim_run_succeeds_exactly_once() {
        let task = Task::new("build", "u1");
        assert!(task.claim_run());
        assert!(!task.claim_run());
    }
}
