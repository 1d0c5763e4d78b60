use tracing::{debug, warn};

use super::Task;
use crate::errors::Error;

/// Drives a task once through its state machine around a caller-supplied
/// unit of work.
///
/// The runner claims the task's single execution slot, records the start
/// time, invokes the work, and lands the task in a terminal state: on
/// failure the error is recorded on the task via `abort` and returned
/// upward, on success the task is marked done. End time is set on every
/// terminal path.
///
/// A second invocation on the same task returns [`Error::AlreadyRan`]
/// without touching the task's state.
///
/// # Arguments
///
/// * `task` - The task to drive; status bookkeeping for display (for
///   example setting `Running` up front) stays with the caller
/// * `work` - The unit of work; any internal concurrency, cancellation
///   or timeout handling is its own business
pub fn run_task<F>(task: &Task, work: F) -> Result<(), Error>
where
    F: FnOnce() -> Result<(), Error>,
{
    if !task.claim_run() {
        warn!(task_id = %task.id(), "task was already run, refusing second execution");
        return Err(Error::AlreadyRan(task.id().to_string()));
    }
    task.mark_started();
    debug!(task_id = %task.id(), task_type = task.kind(), "task started");
    if let Err(err) = work() {
        warn!(task_id = %task.id(), error = %err, "task failed");
        return Err(task.abort(err));
    }
    task.mark_done();
    debug!(task_id = %task.id(), "task done");
    Ok(())
}
