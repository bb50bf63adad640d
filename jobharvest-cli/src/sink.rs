//! JSON-lines record sink.
//!
//! Default persistence for the CLI: acquired postings are appended to
//! a `.jsonl` file, one record per line. Deduplication and richer
//! storage stay outside the orchestrator core by design.

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use jobharvest_core::{CoreError, JobPosting, RecordSink};

/// Appends acquired postings to a JSON-lines file.
pub struct JsonLinesSink {
    path: PathBuf,
}

impl JsonLinesSink {
    /// Creates a sink writing to the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RecordSink for JsonLinesSink {
    async fn persist(&self, records: &[JobPosting]) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;

        let mut buffer = String::new();
        for record in records {
            buffer.push_str(&serde_json::to_string(record)?);
            buffer.push('\n');
        }
        file.write_all(buffer.as_bytes()).await?;
        file.flush().await?;

        debug!(path = %self.path.display(), count = records.len(), "Appended records");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_appends_one_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("postings.jsonl");
        let sink = JsonLinesSink::new(&path);

        let batch = vec![
            JobPosting::new("Analyst", "a"),
            JobPosting::new("Associate", "a"),
        ];
        sink.persist(&batch).await.unwrap();
        sink.persist(&[JobPosting::new("VP", "b")]).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);

        let first: JobPosting = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first.title, "Analyst");
    }
}
