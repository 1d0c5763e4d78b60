#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A forest-wide lookup found no task with the requested identity
    #[error("task id = {0} not found")]
    TaskNotFound(String),
    /// A task was handed to the runner a second time
    #[error("task id = {0} has already been run")]
    AlreadyRan(String),
    /// A registered converter rejected a task's output; the whole
    /// snapshot operation fails with this
    #[error("converting output of kind '{kind}' failed: {message}")]
    Conversion { kind: String, message: String },
    /// A unit of work failed; recorded on the task by `abort`
    #[error("{0}")]
    Execution(String),
}
