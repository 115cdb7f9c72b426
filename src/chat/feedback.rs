use crate::chat::types::{ChatError, Message};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs as async_fs;
use tracing::{debug, warn};

/// User verdict on a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackLabel {
    Good,
    NeedsImprovement,
}

/// One appended feedback record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub timestamp: DateTime<Local>,
    pub message: Message,
    pub feedback: FeedbackLabel,
}

/// Append-only destination for feedback records.
///
/// Failures are returned as `ChatError::PersistenceFailure` so callers can
/// show a warning and carry on with the conversation.
#[async_trait]
pub trait FeedbackSink: Send + Sync {
    async fn append(&self, entry: FeedbackEntry) -> Result<(), ChatError>;
}

/// Feedback stored as a pretty-printed JSON array in a single file.
///
/// A missing or empty file starts a new log. A file that does not parse is
/// left untouched and the append fails.
#[derive(Debug, Clone)]
pub struct FeedbackLog {
    path: PathBuf,
}

impl FeedbackLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All records currently in the log
    pub async fn load(&self) -> Result<Vec<FeedbackEntry>> {
        let content = match async_fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Feedback log {:?} not found, starting a new one", self.path);
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read feedback log {:?}", self.path));
            }
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content)
            .with_context(|| format!("Feedback log {:?} is not a JSON array of entries", self.path))
    }

    async fn append_inner(&self, entry: FeedbackEntry) -> Result<()> {
        let mut entries = self.load().await?;
        entries.push(entry);

        let json = serde_json::to_string_pretty(&entries)
            .context("Failed to serialize feedback entries")?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                async_fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create directory {:?}", parent))?;
            }
        }

        async_fs::write(&self.path, json)
            .await
            .with_context(|| format!("Failed to write feedback log {:?}", self.path))?;

        Ok(())
    }
}

#[async_trait]
impl FeedbackSink for FeedbackLog {
    async fn append(&self, entry: FeedbackEntry) -> Result<(), ChatError> {
        self.append_inner(entry).await.map_err(|e| {
            warn!("Could not save feedback: {:#}", e);
            ChatError::PersistenceFailure(format!("{:#}", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(label: FeedbackLabel) -> FeedbackEntry {
        FeedbackEntry {
            timestamp: Local::now(),
            message: Message::assistant("Paris is the capital of France."),
            feedback: label,
        }
    }

    #[tokio::test]
    async fn test_missing_log_is_initialized() {
        let temp_dir = TempDir::new().unwrap();
        let log = FeedbackLog::new(temp_dir.path().join("feedback_log.json"));

        log.append(entry(FeedbackLabel::Good)).await.unwrap();

        let entries = log.load().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].feedback, FeedbackLabel::Good);
    }

    #[tokio::test]
    async fn test_empty_log_is_initialized() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("feedback_log.json");
        std::fs::write(&path, "").unwrap();

        let log = FeedbackLog::new(&path);
        log.append(entry(FeedbackLabel::NeedsImprovement)).await.unwrap();
        assert_eq!(log.load().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_appends_preserve_order() {
        let temp_dir = TempDir::new().unwrap();
        let log = FeedbackLog::new(temp_dir.path().join("feedback_log.json"));

        log.append(entry(FeedbackLabel::Good)).await.unwrap();
        log.append(entry(FeedbackLabel::NeedsImprovement)).await.unwrap();
        log.append(entry(FeedbackLabel::Good)).await.unwrap();

        let labels: Vec<_> = log
            .load()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.feedback)
            .collect();
        assert_eq!(
            labels,
            vec![
                FeedbackLabel::Good,
                FeedbackLabel::NeedsImprovement,
                FeedbackLabel::Good
            ]
        );
    }

    #[tokio::test]
    async fn test_record_format() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("feedback_log.json");
        let log = FeedbackLog::new(&path);

        log.append(entry(FeedbackLabel::NeedsImprovement)).await.unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[0]["feedback"], "needs_improvement");
        assert_eq!(value[0]["message"]["role"], "assistant");
        assert!(value[0]["timestamp"].is_string());
        assert!(raw.contains("\n  {"), "log should be indented");
    }

    #[tokio::test]
    async fn test_corrupt_log_is_not_overwritten() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("feedback_log.json");
        std::fs::write(&path, "{not json").unwrap();

        let log = FeedbackLog::new(&path);
        let result = log.append(entry(FeedbackLabel::Good)).await;

        assert!(matches!(result, Err(ChatError::PersistenceFailure(_))));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{not json");
    }

    #[tokio::test]
    async fn test_write_failure_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        // A directory where the file should be makes both read and write fail
        let path = temp_dir.path().join("feedback_log.json");
        std::fs::create_dir(&path).unwrap();

        let log = FeedbackLog::new(&path);
        let err = log.append(entry(FeedbackLabel::Good)).await.unwrap_err();
        assert!(err.user_message().starts_with("Could not save feedback:"));
    }
}
