use serde::{Deserialize, Serialize};

/// Lifecycle of a [`BatchJob`](crate::processing::BatchJob).
///
/// `Idle -> Running -> {Completed, Cancelled}`. A job also ends in `Failed`
/// when a fatal error stops it before the first file is processed.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum JobState {
    Idle,
    Running,
    Completed,
    Cancelled,
    Failed,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Failed)
    }
}

/// Snapshot of a batch's progress.
///
/// Observers only ever receive clones of this value; the running job owns
/// the authoritative copy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BatchProgress {
    /// Number of files discovered for this batch; fixed once conversion starts
    pub total: usize,
    /// Files attempted so far (succeeded or failed)
    pub completed: usize,
    /// Files converted successfully
    pub succeeded: usize,
    /// File currently being converted
    #[serde(default)]
    pub current_file: Option<String>,
    /// Whether the batch stopped because cancellation was requested
    pub cancelled: bool,
    /// Job state at the time of the snapshot
    pub state: JobState,
}

impl BatchProgress {
    pub fn new() -> Self {
        Self {
            total: 0,
            completed: 0,
            succeeded: 0,
            current_file: None,
            cancelled: false,
            state: JobState::Idle,
        }
    }

    /// Files attempted that did not convert.
    pub fn failed(&self) -> usize {
        self.completed - self.succeeded
    }

    /// Completion percentage. Only reaches 100 when every file was attempted.
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            if self.state == JobState::Completed { 100.0 } else { 0.0 }
        } else {
            self.completed as f64 / self.total as f64 * 100.0
        }
    }

    /// Human-readable terminal summary.
    pub fn summary(&self) -> String {
        match self.state {
            JobState::Completed if self.total == 0 => "No matching files found".to_string(),
            JobState::Completed => format!(
                "Conversion complete: converted {} / {} files",
                self.succeeded, self.total
            ),
            JobState::Cancelled => format!(
                "Conversion cancelled after {} / {} files ({} converted)",
                self.completed, self.total, self.succeeded
            ),
            JobState::Failed => "Conversion failed".to_string(),
            JobState::Idle | JobState::Running => format!(
                "Converting: {} / {} files ({:.0}%)",
                self.completed,
                self.total,
                self.percentage()
            ),
        }
    }
}

impl Default for BatchProgress {
    fn default() -> Self {
        Self::new()
    }
}
