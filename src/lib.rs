//! In-memory tracking of background units of work.
//!
//! Hosts construct [`core::Task`]s, register them in the shared
//! [`core::TaskPool`], and drive them with [`core::run_task`] on workers
//! of their own choosing. A polling client reads the pool through the
//! [`serializer`] layer, which projects the live forest into wire-safe
//! [`serializer::Template`] snapshots, and through the [`api`] module's
//! list/get endpoints.

pub mod api;
pub mod cli;
pub mod core;
pub mod errors;
pub mod serializer;
pub mod utils;
