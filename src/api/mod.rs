/// API error types and handling
pub mod errors;
/// API module containing the HTTP polling handlers
pub mod handlers;
/// Routes configuration and setup
pub mod routes;
/// HTTP server implementation
pub mod server;

use crate::core::TaskPool;
use crate::serializer::Serializer;
use std::sync::Arc;

/// Shared state handed to every handler via an `Extension` layer
#[derive(Clone)]
pub struct AppState {
    /// The live registry of root tasks
    pub pool: Arc<TaskPool>,
    /// Snapshot builder with the host's output converters registered
    pub serializer: Arc<Serializer>,
}
