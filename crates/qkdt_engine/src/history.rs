//! Report history
//!
//! Gantree: L6_Engine → History
//!
//! Stores past reports for later review. Storage sits outside the analysis:
//! a failed save never changes a report that was already produced.

use qkdt_core::{QkdtError, Report};
use std::collections::VecDeque;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;
use thiserror::Error;

/// Report store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// File I/O error
    #[error("History I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// History file is not a JSON array of reports
    #[error("History serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Store cannot serve requests
    #[error("History store unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for QkdtError {
    fn from(err: StoreError) -> Self {
        QkdtError::StorageError(err.to_string())
    }
}

/// Persistence for analysis reports
/// Gantree: ReportStore // 결과 저장소
pub trait ReportStore: Send + Sync {
    /// Persist one report
    fn save(&self, report: &Report) -> Result<(), StoreError>;

    /// Up to `limit` most recent reports, newest first
    fn recent(&self, limit: usize) -> Result<Vec<Report>, StoreError>;

    /// Number of stored reports
    fn len(&self) -> Result<usize, StoreError>;

    /// True when nothing is stored
    fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

// ============================================================================
// InMemoryReportStore
// ============================================================================

/// Bounded in-process history; the oldest report is evicted first
#[derive(Debug)]
pub struct InMemoryReportStore {
    capacity: usize,
    reports: Mutex<VecDeque<Report>>,
}

impl InMemoryReportStore {
    /// Store keeping at most `capacity` reports (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            reports: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn poisoned() -> StoreError {
        StoreError::Unavailable("history lock poisoned".to_string())
    }
}

impl Default for InMemoryReportStore {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_HISTORY_CAPACITY)
    }
}

impl ReportStore for InMemoryReportStore {
    fn save(&self, report: &Report) -> Result<(), StoreError> {
        let mut reports = self.reports.lock().map_err(|_| Self::poisoned())?;
        if reports.len() == self.capacity {
            reports.pop_front();
        }
        reports.push_back(report.clone());
        Ok(())
    }

    fn recent(&self, limit: usize) -> Result<Vec<Report>, StoreError> {
        let reports = self.reports.lock().map_err(|_| Self::poisoned())?;
        Ok(reports.iter().rev().take(limit).cloned().collect())
    }

    fn len(&self) -> Result<usize, StoreError> {
        Ok(self.reports.lock().map_err(|_| Self::poisoned())?.len())
    }
}

// ============================================================================
// JsonFileReportStore
// ============================================================================

/// History persisted as a JSON array, oldest first.
///
/// Saves write a sibling temp file and rename it over the history, so a
/// reader or a crash never sees a half-written file.
#[derive(Debug)]
pub struct JsonFileReportStore {
    path: PathBuf,
    capacity: Option<usize>,
    write_lock: Mutex<()>,
}

impl JsonFileReportStore {
    /// Unbounded store at `path`; the file is created on first save
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            capacity: None,
            write_lock: Mutex::new(()),
        }
    }

    /// Keep at most `capacity` reports in the file
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity.max(1));
        self
    }

    /// File path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Vec<Report>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write_all(&self, reports: &[Report]) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(serde_json::to_string_pretty(reports)?.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl ReportStore for JsonFileReportStore {
    fn save(&self, report: &Report) -> Result<(), StoreError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StoreError::Unavailable("history lock poisoned".to_string()))?;

        let mut reports = self.read_all()?;
        reports.push(report.clone());
        if let Some(capacity) = self.capacity {
            let excess = reports.len().saturating_sub(capacity);
            reports.drain(..excess);
        }

        self.write_all(&reports)?;
        log::debug!(
            "TESTBED: saved report to {} ({} stored)",
            self.path.display(),
            reports.len()
        );
        Ok(())
    }

    fn recent(&self, limit: usize) -> Result<Vec<Report>, StoreError> {
        let reports = self.read_all()?;
        Ok(reports.into_iter().rev().take(limit).collect())
    }

    fn len(&self) -> Result<usize, StoreError> {
        Ok(self.read_all()?.len())
    }
}

// ============================================================================
// Tests
// ============================================================================
