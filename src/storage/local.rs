// src/storage/local.rs

//! Local filesystem sink writing one CSV file per dataset.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::Result;
use crate::models::{CellValue, Dataset};
use crate::storage::{DatasetSink, WriteSummary};

/// CSV sink rooted at an output directory.
#[derive(Debug, Clone)]
pub struct LocalCsvSink {
    out_dir: PathBuf,
}

impl LocalCsvSink {
    /// Create a sink writing into the given directory.
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, path: &PathBuf, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }
}

/// Render a dataset as CSV bytes: one stable header row, one row per
/// record, missing values as empty fields.
fn to_csv_bytes(dataset: &Dataset) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(dataset.columns())?;

    for record in dataset.records() {
        let fields: Vec<String> = dataset
            .columns()
            .iter()
            .map(|column| {
                record
                    .get(column)
                    .map_or_else(String::new, CellValue::csv_field)
            })
            .collect();
        writer.write_record(&fields)?;
    }

    writer
        .into_inner()
        .map_err(|e| std::io::Error::other(e.to_string()).into())
}

#[async_trait]
impl DatasetSink for LocalCsvSink {
    async fn write_dataset(&self, dataset: &Dataset) -> Result<WriteSummary> {
        let path = self.out_dir.join(dataset.kind().file_name());
        let bytes = to_csv_bytes(dataset)?;
        self.write_bytes(&path, &bytes).await?;

        Ok(WriteSummary {
            location: path.display().to_string(),
            rows: dataset.len(),
            columns: dataset.columns().len(),
        })
    }
}
