pub mod algorithms;
pub mod crypto;
pub mod paths;
pub mod ui;
pub mod verification;
pub mod wipe_engine;

// Re-export the engine entry points for convenience
pub use paths::{DisplayItem, PathEnumerator, ProtectedPathSet};
pub use wipe_engine::{CancellationToken, WipeEngine};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum WipeError {
    #[error("cannot access {path}: {reason}")]
    Access { path: PathBuf, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("a wipe job is already running")]
    JobInProgress,

    #[error("wipe cancelled")]
    Cancelled,

    #[error("random generator failure: {0}")]
    Rng(String),

    #[error("unknown wipe method '{0}' (expected dod, nist, gutmann, random or zero)")]
    UnknownMethod(String),
}

pub type WipeResult<T> = Result<T, WipeError>;

/// Named sanitization standard selecting a pass count and pattern sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WipeMethod {
    /// DoD 5220.22-M, 3 passes (zeros, ones, random)
    Dod,
    /// NIST 800-88 Clear, single random pass
    Nist,
    /// Gutmann, 35 passes
    Gutmann,
    /// 7 random passes
    Random,
    /// Single zero-fill pass
    Zero,
}

impl WipeMethod {
    pub const ALL: [WipeMethod; 5] = [
        WipeMethod::Dod,
        WipeMethod::Nist,
        WipeMethod::Gutmann,
        WipeMethod::Random,
        WipeMethod::Zero,
    ];

    /// Human-readable standard name for display.
    pub fn label(&self) -> &'static str {
        match self {
            WipeMethod::Dod => "DoD 5220.22-M",
            WipeMethod::Nist => "NIST 800-88 Clear",
            WipeMethod::Gutmann => "Gutmann",
            WipeMethod::Random => "Random overwrite",
            WipeMethod::Zero => "Zero fill",
        }
    }
}

impl fmt::Display for WipeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            WipeMethod::Dod => "dod",
            WipeMethod::Nist => "nist",
            WipeMethod::Gutmann => "gutmann",
            WipeMethod::Random => "random",
            WipeMethod::Zero => "zero",
        };
        f.write_str(token)
    }
}

impl FromStr for WipeMethod {
    type Err = WipeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dod" => Ok(WipeMethod::Dod),
            "nist" => Ok(WipeMethod::Nist),
            "gutmann" => Ok(WipeMethod::Gutmann),
            "random" => Ok(WipeMethod::Random),
            "zero" => Ok(WipeMethod::Zero),
            other => Err(WipeError::UnknownMethod(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WipeConfig {
    pub method: WipeMethod,
    /// Overrides the method's standard pass count when set.
    pub passes: Option<u32>,
    pub verify: bool,
}

impl Default for WipeConfig {
    fn default() -> Self {
        Self {
            method: WipeMethod::Dod,
            passes: None,
            verify: true,
        }
    }
}

/// A single wipeable file produced by enumeration.
///
/// Tasks are immutable snapshots; a task with `is_protected` set must never
/// be handed to the engine (expansion filters them out).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTask {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub is_protected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobState {
    Idle,
    Running,
    Completed,
    Cancelled,
    Failed,
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobState::Idle => "idle",
            JobState::Running => "running",
            JobState::Completed => "completed",
            JobState::Cancelled => "cancelled",
            JobState::Failed => "failed",
        };
        f.write_str(s)
    }
}

// Progress snapshot emitted synchronously at job start, before each file,
// before each pass and at job end. Counters never decrease within a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WipeProgress {
    pub current_file: Option<PathBuf>,
    pub files_processed: u64,
    pub total_files: u64,
    pub current_pass: u32,
    pub total_passes: u32,
    pub bytes_processed: u64,
    pub total_bytes: u64,
    pub is_complete: bool,
}

/// Terminal job record, produced exactly once per started job.
///
/// `success` reflects only the error list; verification is tracked
/// independently and never gates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WipeReport {
    pub job_id: Uuid,
    pub outcome: JobState,
    pub success: bool,
    pub files_wiped: u64,
    pub bytes_wiped: u64,
    pub time_elapsed_ms: u64,
    pub verification_passed: bool,
    pub errors: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}
