// src/models/mod.rs

//! Domain models for the scraping pipeline.
//!
//! This module contains all data structures used throughout the
//! application, organized by their primary purpose.

mod config;
mod kinds;
mod record;

// Re-export all public types
pub use config::{Config, FetchConfig, LoggingConfig, OutputConfig, RunConfig};
pub use kinds::{DatasetKind, TableKind};
pub use record::{CellValue, Dataset, TypedRecord};
