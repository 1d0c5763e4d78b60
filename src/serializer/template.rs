use serde::Serialize;

use super::ConverterRegistry;
use crate::core::{Task, TaskPool};
use crate::errors::Error;

/// Wire timestamp format, second precision
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Client-facing snapshot of a task and, recursively, its subtasks.
///
/// Field names and omit-when-absent rules are part of the client
/// contract and must not change.
#[derive(Debug, Serialize)]
pub struct Template {
    pub id: String,
    #[serde(rename = "type")]
    pub task_type: String,
    pub status: String,
    pub created: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<serde_json::Value>,
    #[serde(rename = "subTask", skip_serializing_if = "Option::is_none")]
    pub sub_task: Option<Vec<Template>>,
    #[serde(rename = "startTime", skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(rename = "endTime", skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    #[serde(rename = "parentTaskId", skip_serializing_if = "Option::is_none")]
    pub parent_task_id: Option<String>,
}

/// Builds wire snapshots of live tasks, running registered output
/// converters along the way.
#[derive(Debug, Default)]
pub struct Serializer {
    converters: ConverterRegistry,
}

impl Serializer {
    /// Creates a serializer with no converters registered
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a serializer around an already-populated registry
    pub fn with_registry(converters: ConverterRegistry) -> Self {
        Self { converters }
    }

    /// Registers an output converter, see [`ConverterRegistry::register`]
    pub fn register_converter<F>(&mut self, kind: impl Into<String>, convert: F)
    where
        F: Fn(&serde_json::Value) -> Result<serde_json::Value, Error> + Send + Sync + 'static,
    {
        self.converters.register(kind, convert);
    }

    /// Builds the snapshot of one task and its whole subtree
    ///
    /// # Errors
    ///
    /// Fails when any converter in the subtree rejects its output; no
    /// partial snapshot is returned.
    pub fn template(&self, task: &Task) -> Result<Template, Error> {
        let output = match task.output() {
            Some(output) => Some(self.converters.convert(&output)?),
            None => None,
        };

        let children = task.children();
        let sub_task = if children.is_empty() {
            None
        } else {
            Some(
                children
                    .iter()
                    .map(|child| self.template(child))
                    .collect::<Result<Vec<_>, _>>()?,
            )
        };

        let start_time = task.start_time();
        let end_time = task.end_time();
        // Duration accompanies the end time. A task aborted before it was
        // ever started has no start time; creation time is the base then.
        let duration = end_time.map(|end| {
            let base = start_time.unwrap_or_else(|| task.created());
            end.signed_duration_since(base).num_milliseconds().max(0) as u64
        });

        Ok(Template {
            id: task.id().to_string(),
            task_type: task.kind().to_string(),
            status: task.status_text(),
            created: task.created().format(TIME_FORMAT).to_string(),
            err: task.error(),
            output,
            sub_task,
            start_time: start_time.map(|t| t.format(TIME_FORMAT).to_string()),
            end_time: end_time.map(|t| t.format(TIME_FORMAT).to_string()),
            duration,
            parent_task_id: task.parent_id().map(|id| id.to_string()),
        })
    }

    /// Builds snapshots for every root task in the pool, preserving the
    /// pool's insertion order
    ///
    /// # Errors
    ///
    /// Fails wholesale on the first conversion error anywhere in the
    /// forest.
    pub fn template_list(&self, pool: &TaskPool) -> Result<Vec<Template>, Error> {
        pool.roots()
            .iter()
            .map(|task| self.template(task))
            .collect()
    }
}
