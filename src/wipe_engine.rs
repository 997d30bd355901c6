// Wipe Engine - Sequential overwrite-then-delete job orchestration
//
// The engine runs one job at a time, file by file and pass by pass, with
// no internal parallelism. Sequential single-flight execution keeps the
// "what has definitely been destroyed so far" invariant simple: every
// counted file is fully overwritten and deleted, the current file may be
// partially overwritten, later files are untouched.

use crate::algorithms;
use crate::verification::Verifier;
use crate::{
    FileTask, JobState, WipeConfig, WipeError, WipeMethod, WipeProgress, WipeReport, WipeResult,
};
use chrono::Utc;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// Shared cancellation flag, settable from any thread (UI, signal handler).
///
/// Cancellation is cooperative: the engine observes the flag only at file
/// and pass boundaries, never mid-chunk. Cancelling does not roll back
/// partially overwritten files; that is an accepted property of the
/// design, not a defect.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Orchestrates wipe jobs: at most one job runs at a time per engine.
///
/// The job-state mutex and the cancellation flag are the only shared
/// mutable state; the engine is `Send + Sync` so callers may run a job on
/// a worker thread and cancel it from another.
#[derive(Debug)]
pub struct WipeEngine {
    state: Mutex<JobState>,
    cancel: CancellationToken,
}

impl Default for WipeEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Nominal sustained overwrite throughput used for duration estimates.
const ESTIMATE_THROUGHPUT: u64 = 10 * 1024 * 1024;

impl WipeEngine {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(JobState::Idle),
            cancel: CancellationToken::new(),
        }
    }

    pub fn state(&self) -> JobState {
        *self.state.lock().unwrap()
    }

    pub fn is_running(&self) -> bool {
        self.state() == JobState::Running
    }

    /// Token for cancelling the active (or next) job from another thread.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Run a wipe job without progress reporting.
    pub fn run(&self, files: &[FileTask], config: &WipeConfig) -> WipeResult<WipeReport> {
        self.run_with_progress(files, config, |_| {})
    }

    /// Run a wipe job, invoking `progress` synchronously at job start,
    /// before each file, before each pass and at job end. The file and
    /// byte counters in the emitted snapshots never decrease; the pass
    /// counter restarts for each file.
    ///
    /// Returns `WipeError::JobInProgress` without touching the active job
    /// if one is already running. Every started job produces a terminal
    /// report: per-file failures and cancellation are recorded in the
    /// report, they do not surface as `Err`.
    pub fn run_with_progress(
        &self,
        files: &[FileTask],
        config: &WipeConfig,
        mut progress: impl FnMut(&WipeProgress),
    ) -> WipeResult<WipeReport> {
        {
            let mut state = self.state.lock().unwrap();
            if *state == JobState::Running {
                return Err(WipeError::JobInProgress);
            }
            *state = JobState::Running;
        }
        self.cancel.reset();

        let job_id = Uuid::new_v4();
        let started_at = Utc::now();
        let timer = Instant::now();

        let total_passes = algorithms::pass_count(config.method, config.passes);
        let total_files = files.len() as u64;
        let total_bytes: u64 = files.iter().map(|t| t.size_bytes).sum();

        tracing::info!(
            %job_id,
            method = %config.method,
            files = total_files,
            bytes = total_bytes,
            passes = total_passes,
            "starting wipe job"
        );

        let mut errors: Vec<String> = Vec::new();
        let mut files_processed = 0u64;
        let mut bytes_processed = 0u64;
        let mut files_wiped = 0u64;
        let mut bytes_wiped = 0u64;
        let mut cancelled = false;

        progress(&WipeProgress {
            current_file: None,
            files_processed,
            total_files,
            current_pass: 0,
            total_passes,
            bytes_processed,
            total_bytes,
            is_complete: false,
        });

        for task in files {
            // Expansion filters protected files; none may reach this point.
            debug_assert!(!task.is_protected, "protected task reached the engine");

            if self.cancel.is_cancelled() {
                cancelled = true;
                errors.push("wipe cancelled".to_string());
                tracing::info!(%job_id, "job cancelled at file boundary");
                break;
            }

            let size = match fs::metadata(&task.path) {
                Ok(meta) if meta.is_file() => meta.len(),
                Ok(_) => {
                    errors.push(format!("{}: not a regular file", task.path.display()));
                    continue;
                }
                Err(e) => {
                    errors.push(format!("{}: {}", task.path.display(), e));
                    continue;
                }
            };

            progress(&WipeProgress {
                current_file: Some(task.path.clone()),
                files_processed,
                total_files,
                current_pass: 0,
                total_passes,
                bytes_processed,
                total_bytes,
                is_complete: false,
            });

            let mut on_pass = |pass: u32| {
                progress(&WipeProgress {
                    current_file: Some(task.path.clone()),
                    files_processed,
                    total_files,
                    current_pass: pass,
                    total_passes,
                    bytes_processed,
                    total_bytes,
                    is_complete: false,
                });
            };

            match self.wipe_file(&task.path, size, config.method, total_passes, &mut on_pass) {
                Ok(()) => {
                    files_wiped += 1;
                    bytes_wiped += size;
                    files_processed += 1;
                    bytes_processed += size;
                }
                Err(WipeError::Cancelled) => {
                    cancelled = true;
                    errors.push(format!("wipe cancelled during {}", task.path.display()));
                    tracing::info!(%job_id, file = %task.path.display(), "job cancelled at pass boundary");
                    break;
                }
                Err(e) => {
                    // Per-file failures are contained: record and move on.
                    // The file is abandoned in whatever state the failed
                    // pass left it.
                    tracing::warn!(%job_id, file = %task.path.display(), error = %e, "failed to wipe file");
                    errors.push(format!("failed to wipe {}: {}", task.path.display(), e));
                }
            }
        }

        let verification_passed = if config.verify && !cancelled {
            Verifier::verify_removed(files.iter().map(|t| t.path.as_path()))
        } else {
            false
        };

        progress(&WipeProgress {
            current_file: None,
            files_processed,
            total_files,
            current_pass: if cancelled { 0 } else { total_passes },
            total_passes,
            bytes_processed,
            total_bytes,
            is_complete: true,
        });

        let outcome = if cancelled {
            JobState::Cancelled
        } else if errors.is_empty() {
            JobState::Completed
        } else {
            JobState::Failed
        };
        *self.state.lock().unwrap() = outcome;

        let report = WipeReport {
            job_id,
            outcome,
            success: errors.is_empty(),
            files_wiped,
            bytes_wiped,
            time_elapsed_ms: timer.elapsed().as_millis() as u64,
            verification_passed,
            errors,
            started_at,
            finished_at: Utc::now(),
        };

        tracing::info!(
            %job_id,
            outcome = %report.outcome,
            files_wiped = report.files_wiped,
            bytes_wiped = report.bytes_wiped,
            elapsed_ms = report.time_elapsed_ms,
            "wipe job finished"
        );

        Ok(report)
    }

    /// Overwrite one file pass by pass, then delete it. The cancellation
    /// flag is checked at each pass boundary.
    fn wipe_file(
        &self,
        path: &Path,
        size: u64,
        method: WipeMethod,
        passes: u32,
        on_pass: &mut dyn FnMut(u32),
    ) -> WipeResult<()> {
        for pass in 1..=passes {
            if self.cancel.is_cancelled() {
                return Err(WipeError::Cancelled);
            }

            on_pass(pass);

            let pattern = algorithms::pattern_for_pass(method, pass)?;
            overwrite_with_pattern(path, &pattern, size)?;
        }

        fs::remove_file(path)?;
        Ok(())
    }

    /// Rough wall-clock estimate for a job, at a nominal fixed throughput
    /// per pass. Never less than one second.
    pub fn estimate_duration(files: &[FileTask], config: &WipeConfig) -> Duration {
        let total_bytes: u64 = files.iter().map(|t| t.size_bytes).sum();
        let passes = algorithms::pass_count(config.method, config.passes) as u64;
        let secs = total_bytes.saturating_mul(passes) / ESTIMATE_THROUGHPUT;
        Duration::from_secs(secs.max(1))
    }
}

/// Write `pattern` repeatedly into a sibling temporary file until it
/// matches the original length, fsync it, then atomically replace the
/// original. The replace-then-delete dance keeps the original's directory
/// entry pointing at overwritten bytes for the whole pass.
fn overwrite_with_pattern(path: &Path, pattern: &[u8], size: u64) -> WipeResult<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(parent)?;

    let mut written = 0u64;
    while written < size {
        let remaining = (size - written) as usize;
        let chunk = &pattern[..remaining.min(pattern.len())];
        tmp.as_file_mut().write_all(chunk)?;
        written += chunk.len() as u64;
    }

    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| WipeError::Io(e.error))?;
    Ok(())
}
