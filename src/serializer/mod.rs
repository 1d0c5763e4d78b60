//! Presentation layer projecting live task trees into wire snapshots
//!
//! This module contains:
//! - The recursive `Template` snapshot and its builder
//! - The tagged-variant registry of output converters

mod converter;
mod template;

pub use converter::*;
pub use template::*;
