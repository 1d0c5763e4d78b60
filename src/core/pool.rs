use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

use super::{Task, TaskId, TaskStatus};

/// Concurrency-safe registry of root tasks.
///
/// The pool owns the ordered root sequence (insertion order is listing
/// order) and guards every operation, read or write, with a single lock.
/// Task handles are cheap to clone, so reads copy handles out under the
/// lock and release it before doing any further work.
#[derive(Debug, Default)]
pub struct TaskPool {
    tasks: Mutex<Vec<Task>>,
}

impl TaskPool {
    /// Creates an empty pool
    pub fn new() -> Self {
        Self {
            tasks: Mutex::new(Vec::new()),
        }
    }

    fn tasks(&self) -> MutexGuard<'_, Vec<Task>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends a root task to the pool.
    ///
    /// No duplicate-identity check is performed; keeping identities
    /// unique across the forest is the caller's responsibility.
    pub fn add(&self, task: Task) {
        debug!(task_id = %task.id(), task_type = task.kind(), "task added to pool");
        self.tasks().push(task);
    }

    /// Removes the root task with the given identity, and with it the
    /// whole subtree it owns. A no-op when no root matches; subtasks are
    /// never removed individually.
    pub fn remove_by_id(&self, id: &TaskId) {
        self.tasks().retain(|task| task.id() != id);
    }

    /// Returns the first root task matching both type tag and status.
    /// The scan is flat: subtasks are not considered.
    pub fn find_by_type_and_status(&self, kind: &str, status: TaskStatus) -> Option<Task> {
        self.tasks()
            .iter()
            .find(|task| task.kind() == kind && task.status() == Some(status))
            .cloned()
    }

    /// Looks up a task anywhere in the forest by structural identity,
    /// breadth-first: all roots in insertion order, then their children
    /// level by level.
    pub fn find_by_id(&self, id: &TaskId) -> Option<Task> {
        self.find_breadth_first(|task| task.id() == id)
    }

    /// Forest-wide breadth-first lookup by the rendered (wire) form of
    /// the identity, for callers that only hold the string a client sent.
    pub fn find_by_wire_id(&self, id: &str) -> Option<Task> {
        self.find_breadth_first(|task| task.id().to_string() == id)
    }

    fn find_breadth_first<F>(&self, matches: F) -> Option<Task>
    where
        F: Fn(&Task) -> bool,
    {
        let mut queue: VecDeque<Task> = self.tasks().iter().cloned().collect();
        while let Some(task) = queue.pop_front() {
            if matches(&task) {
                return Some(task);
            }
            queue.extend(task.children());
        }
        None
    }

    /// Snapshot of the root sequence in insertion order
    pub fn roots(&self) -> Vec<Task> {
        self.tasks().clone()
    }

    /// Number of root tasks currently registered
    pub fn len(&self) -> usize {
        self.tasks().len()
    }

    /// Returns true when no root task is registered
    pub fn is_empty(&self) -> bool {
        self.tasks().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn add_preserves_insertion_order() {
        let pool = TaskPool::new();
        let first = Task::new("scan", "u1");
        let second = Task::new("build", "u2");
        pool.add(first.clone());
        pool.add(second.clone());
        let roots = pool.roots();
        assert_eq!(roots.len(), 2);
        assert_eq!(roots[0].id(), first.id());
        assert_eq!(roots[1].id(), second.id());
    }

    #[test]
    fn remove_by_id_takes_exactly_one_root() {
        let pool = TaskPool::new();
        let keep = Task::new("scan", "u1");
        let doomed = Task::new("build", "u1");
        let doomed_child = doomed.spawn_subtask("compile", "u1");
        pool.add(keep.clone());
        pool.add(doomed.clone());

        pool.remove_by_id(doomed.id());
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.roots()[0].id(), keep.id());
        // the subtree went with its root
        assert!(pool.find_by_id(doomed.id()).is_none());
        assert!(pool.find_by_id(doomed_child.id()).is_none());
    }

    #[test]
    fn remove_by_id_is_a_noop_for_absent_and_non_root_ids() {
        let pool = TaskPool::new();
        let root = Task::new("scan", "u1");
        let child = root.spawn_subtask("probe", "u1");
        pool.add(root.clone());

        pool.remove_by_id(&TaskId::root());
        pool.remove_by_id(child.id());
        assert_eq!(pool.len(), 1);
        assert!(pool.find_by_id(child.id()).is_some());
    }

    #[test]
    fn find_by_id_reaches_any_depth() {
        let pool = TaskPool::new();
        let root = Task::new("scan", "u1");
        let child = root.spawn_subtask("probe", "u1");
        let grandchild = child.spawn_subtask("hash", "u1");
        pool.add(root);

        let found = pool.find_by_id(grandchild.id()).unwrap();
        assert_eq!(found.id(), grandchild.id());
        assert!(pool.find_by_id(&TaskId::root()).is_none());
    }

    #[test]
    fn find_by_wire_id_matches_the_rendered_form() {
        let pool = TaskPool::new();
        let root = Task::new("scan", "u1");
        let child = root.spawn_subtask("probe", "u1");
        pool.add(root);

        let wire = child.id().to_string();
        let found = pool.find_by_wire_id(&wire).unwrap();
        assert_eq!(found.id(), child.id());
        assert!(pool.find_by_wire_id("missing").is_none());
    }

    #[test]
    fn find_by_type_and_status_scans_roots_only() {
        let pool = TaskPool::new();
        let root = Task::new("scan", "u1");
        let child = root.spawn_subtask("build", "u1");
        child.set_status(TaskStatus::Running);
        pool.add(root.clone());
        let running = Task::new("build", "u2");
        running.set_status(TaskStatus::Running);
        pool.add(running.clone());

        let found = pool.find_by_type_and_status("build", TaskStatus::Running).unwrap();
        assert_eq!(found.id(), running.id());
        assert!(pool
            .find_by_type_and_status("scan", TaskStatus::Done)
            .is_none());
    }

    #[test]
    fn concurrent_adds_lose_nothing() {
        let pool = Arc::new(TaskPool::new());
        let handles: Vec<_> = (0..100)
            .map(|i| {
                let pool = Arc::clone(&pool);
                thread::spawn(move || {
                    pool.add(Task::new(format!("job-{i}"), "stress"));
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let roots = pool.roots();
        assert_eq!(roots.len(), 100);
        let mut kinds: Vec<String> = roots.iter().map(|t| t.kind().to_string()).collect();
        kinds.sort();
        kinds.dedup();
        assert_eq!(kinds.len(), 100);
    }
}
