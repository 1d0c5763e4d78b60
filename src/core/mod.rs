//! Core module containing the task tracking components
//!
//! This module contains:
//! - The task entity and its state transitions
//! - The concurrency-safe pool of root tasks
//! - The runner driving a task through its state machine

mod pool;
mod runner;
mod task;

pub use pool::*;
pub use runner::*;
pub use task::*;
