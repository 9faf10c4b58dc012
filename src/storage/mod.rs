// src/storage/mod.rs

//! Storage abstractions for dataset emission.
//!
//! A run accumulates records in memory and hands each non-empty dataset
//! to a sink exactly once at the end. The sink owns the persistence
//! format; the pipeline only knows about datasets.

pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Dataset;

// Re-export for convenience
pub use local::LocalCsvSink;

/// Metadata about one dataset write.
#[derive(Debug, Clone)]
pub struct WriteSummary {
    /// Where the dataset landed
    pub location: String,
    /// Number of data rows written
    pub rows: usize,
    /// Number of columns in the header
    pub columns: usize,
}

/// Trait for dataset sinks.
#[async_trait]
pub trait DatasetSink: Send + Sync {
    /// Write one dataset in full.
    async fn write_dataset(&self, dataset: &Dataset) -> Result<WriteSummary>;
}
