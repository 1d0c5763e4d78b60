//! Main entry point for the application.
//!
//! This module initializes logging, loads environment variables, builds
//! the shared task pool and serializer, and serves the polling API.
//!
//! With `--demo` the pool is seeded with a small sample workload so the
//! endpoints return something observable out of the box.

use clap::Parser;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, warn};

use taskpool::api::{self, AppState};
use taskpool::cli::Cli;
use taskpool::core::{run_task, Task, TaskPool, TaskStatus};
use taskpool::serializer::Serializer;
use taskpool::utils;

/// Main entry point that initializes and runs the application.
///
/// # Initialization steps:
/// 1. Parse CLI arguments
/// 2. Initialize logging system
/// 3. Load environment variables
/// 4. Build the shared pool and serializer
/// 5. Serve the polling API
#[tokio::main]
async fn main() {
    let cli = Cli::try_parse().expect("Failed to parse CLI arguments");
    utils::init_logging(&cli.logging_level, !cli.no_api);

    if let Err(e) = dotenvy::dotenv() {
        warn!("Failed to load .env file: {}", e);
    }

    let mut serializer = Serializer::new();
    serializer.register_converter("file-list", |value| {
        Ok(json!({ "files": value.as_array().map_or(0, Vec::len) }))
    });

    let state = AppState {
        pool: Arc::new(TaskPool::new()),
        serializer: Arc::new(serializer),
    };

    let demo_worker = if cli.demo {
        Some(seed_demo_workload(&state))
    } else {
        None
    };

    if cli.no_api {
        if let Some(worker) = demo_worker {
            if let Err(e) = worker.await {
                error!("Demo worker panicked: {}", e);
            }
        }
        match state.serializer.template_list(&state.pool) {
            Ok(list) => match serde_json::to_string_pretty(&list) {
                Ok(snapshot) => info!("Final snapshot:\n{}", snapshot),
                Err(e) => error!("Failed to encode snapshot: {}", e),
            },
            Err(e) => error!("Failed to build snapshot: {}", e),
        }
        return;
    }

    info!("Starting API server on port {}", cli.api_port);
    if let Err(e) = api::server::launch_server(state, cli.api_port).await {
        error!("Failed to start server: {}", e);
    }
}

/// Registers a sample scan task with two subtasks and drives it on a
/// blocking worker, the way a host application would.
fn seed_demo_workload(state: &AppState) -> tokio::task::JoinHandle<()> {
    let scan = Task::new("scan", "demo");
    scan.set_status(TaskStatus::Running);
    state.pool.add(scan.clone());

    tokio::task::spawn_blocking(move || {
        let result = run_task(&scan, || {
            for name in ["probe", "index"] {
                let step = scan.spawn_subtask(name, "demo");
                step.set_status(TaskStatus::Running);
                run_task(&step, || {
                    std::thread::sleep(std::time::Duration::from_millis(50));
                    Ok(())
                })?;
            }
            scan.set_output("file-list", json!(["a.mp4", "b.mp4"]));
            Ok(())
        });
        if let Err(err) = result {
            warn!("demo workload failed: {}", err);
        }
    })
}
