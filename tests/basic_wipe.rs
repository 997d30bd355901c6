/// End-to-end wipe scenarios exercising enumeration, the engine and
/// verification together on scratch directories.
use cleanslate::paths::PathEnumerator;
use cleanslate::verification::Verifier;
use cleanslate::{JobState, WipeConfig, WipeEngine, WipeMethod};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    let mut f = File::create(&path).expect("Failed to create test file");
    f.write_all(content).expect("Failed to write test file");
    path
}

fn config(method: WipeMethod, verify: bool) -> WipeConfig {
    WipeConfig {
        method,
        passes: None,
        verify,
    }
}

#[test]
fn test_zero_wipe_two_selected_files() {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let small = write_file(tmp.path(), "small.dat", &[1u8; 10]);
    let large = write_file(tmp.path(), "large.dat", &[2u8; 20]);

    let enumerator = PathEnumerator::default();
    let tasks = enumerator.expand(&[small.clone(), large.clone()]);
    assert_eq!(tasks.len(), 2);

    let engine = WipeEngine::new();
    let report = engine
        .run(&tasks, &config(WipeMethod::Zero, true))
        .expect("Job should start");

    assert!(report.success);
    assert_eq!(report.files_wiped, 2);
    assert_eq!(report.bytes_wiped, 30);
    assert!(report.verification_passed);
    assert!(!small.exists());
    assert!(!large.exists());
    assert!(Verifier::verify_removed([small.as_path(), large.as_path()]));
}

#[test]
fn test_dod_wipe_emits_three_passes_then_deletes() {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let target = write_file(tmp.path(), "secret.txt", b"abc");

    let enumerator = PathEnumerator::default();
    let tasks = enumerator.expand(&[target.clone()]);

    let engine = WipeEngine::new();
    let mut passes_seen = Vec::new();
    let report = engine
        .run_with_progress(&tasks, &config(WipeMethod::Dod, true), |p| {
            if p.current_pass > 0 && !p.is_complete {
                passes_seen.push(p.current_pass);
                assert_eq!(p.total_passes, 3);
            }
        })
        .expect("Job should start");

    assert_eq!(passes_seen, [1, 2, 3]);
    assert!(report.success);
    assert!(report.verification_passed);
    assert!(!target.exists());
}

#[test]
fn test_protected_selection_is_never_touched() {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    fs::create_dir(tmp.path().join("protected")).unwrap();
    let shielded = write_file(&tmp.path().join("protected"), "keep.txt", b"keep me");
    let normal = write_file(tmp.path(), "wipe-me.txt", b"goodbye");

    let mut enumerator = PathEnumerator::default();
    enumerator
        .protected_mut()
        .add_prefix(tmp.path().join("protected").to_string_lossy());

    // The protected file is selected explicitly and still filtered out
    let tasks = enumerator.expand(&[shielded.clone(), normal.clone()]);
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].path, normal);

    let engine = WipeEngine::new();
    let report = engine
        .run(&tasks, &config(WipeMethod::Zero, true))
        .expect("Job should start");

    assert!(report.success);
    assert!(!normal.exists());
    assert!(shielded.exists(), "protected file must survive unchanged");
    assert_eq!(fs::read(&shielded).unwrap(), b"keep me");
}

#[test]
fn test_gutmann_reports_thirty_five_passes() {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let target = write_file(tmp.path(), "g.dat", &[7u8; 64]);

    let enumerator = PathEnumerator::default();
    let tasks = enumerator.expand(&[target]);

    let engine = WipeEngine::new();
    let mut max_pass = 0;
    let report = engine
        .run_with_progress(&tasks, &config(WipeMethod::Gutmann, false), |p| {
            assert_eq!(p.total_passes, 35);
            max_pass = max_pass.max(p.current_pass);
        })
        .expect("Job should start");

    assert_eq!(max_pass, 35);
    assert!(report.success);
}

#[test]
fn test_cancellation_mid_job_is_terminal_and_partial() {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let first = write_file(tmp.path(), "a.dat", &[1u8; 32]);
    let second = write_file(tmp.path(), "b.dat", &[2u8; 32]);
    let third = write_file(tmp.path(), "c.dat", &[3u8; 32]);

    let enumerator = PathEnumerator::default();
    // Preserve selection order by selecting files individually
    let tasks = enumerator.expand(&[first.clone(), second.clone(), third.clone()]);
    assert_eq!(tasks.len(), 3);

    let engine = WipeEngine::new();
    let token = engine.cancel_token();
    let report = engine
        .run_with_progress(&tasks, &config(WipeMethod::Zero, true), |p| {
            if p.files_processed == 1 && p.current_pass == p.total_passes {
                token.cancel();
            }
        })
        .expect("Job should start");

    assert_eq!(report.outcome, JobState::Cancelled);
    assert!(!report.success);
    assert!(report.files_wiped <= tasks.len() as u64);
    assert_eq!(report.files_wiped, 2, "two files completed before the flag was seen");
    assert!(third.exists(), "files beyond the cancellation point stay untouched");
    assert_eq!(fs::read(&third).unwrap(), vec![3u8; 32]);
}

#[test]
fn test_second_run_rejected_while_first_is_active() {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let target = write_file(tmp.path(), "busy.dat", &[9u8; 128]);

    let enumerator = PathEnumerator::default();
    let tasks = enumerator.expand(&[target]);

    let engine = WipeEngine::new();
    let mut progress_events = 0u32;
    let mut rejections = 0u32;

    let report = engine
        .run_with_progress(&tasks, &config(WipeMethod::Random, false), |p| {
            progress_events += 1;
            if !p.is_complete {
                // A competing run must fail fast and leave this job alone
                if engine.run(&[], &config(WipeMethod::Zero, false)).is_err() {
                    rejections += 1;
                }
            }
        })
        .expect("Job should start");

    assert!(rejections > 0);
    assert!(report.success);
    // Job start + (1 before-file + 7 passes) + job end
    assert_eq!(progress_events, 10, "rejected runs must not alter the progress stream");
}

#[test]
fn test_verification_skipped_is_not_failure() {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let target = write_file(tmp.path(), "x.dat", &[0u8; 16]);

    let enumerator = PathEnumerator::default();
    let tasks = enumerator.expand(&[target.clone()]);

    let engine = WipeEngine::new();
    let report = engine
        .run(&tasks, &config(WipeMethod::Nist, false))
        .expect("Job should start");

    assert!(report.success, "success tracks errors only");
    assert!(!report.verification_passed, "verification was not requested");
    assert!(!target.exists());
}

#[test]
fn test_directory_selection_wipes_nested_tree() {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let root = tmp.path().join("stuff");
    fs::create_dir_all(root.join("nested")).unwrap();
    write_file(&root, "top.txt", &[1u8; 5]);
    write_file(&root.join("nested"), "deep.txt", &[2u8; 7]);

    let enumerator = PathEnumerator::default();
    let tasks = enumerator.expand(&[root.clone()]);
    assert_eq!(tasks.len(), 2);

    let engine = WipeEngine::new();
    let report = engine
        .run(&tasks, &config(WipeMethod::Zero, true))
        .expect("Job should start");

    assert!(report.success);
    assert_eq!(report.bytes_wiped, 12);
    assert!(report.verification_passed);
    // Directories themselves are not removed, only their files
    assert!(root.exists());
}
