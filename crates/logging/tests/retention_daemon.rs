//! Integration tests for retention of old log files.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use logging::{Config, Identity, Logger, Severity, StackPolicy, Threshold};

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn config(dir: &Path, program: &str, disable_daemons: bool) -> Config {
    Config {
        log_dir: Some(dir.to_path_buf()),
        identity: Some(Identity {
            program: program.to_owned(),
            host: "host".to_owned(),
            user: "user".to_owned(),
            pid: 99,
            build: String::new(),
            arguments: Vec::new(),
        }),
        stderr_threshold: Threshold::NONE,
        no_stderr_redirect: true,
        disable_daemons,
        stack_policy: StackPolicy::None,
        max_file_size: 700,
        ..Config::default()
    }
}

fn fill(logger: &Logger, entries: u32) {
    for line in 0..entries {
        logger.log(Severity::Info, "fill.rs", line, "y".repeat(120));
    }
    logger.flush().unwrap();
}

fn wait_for(mut done: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(10);
    while Instant::now() < deadline {
        if done() {
            return true;
        }
        thread::sleep(Duration::from_millis(20));
    }
    done()
}

/// Verifies rotation wakes the daemon, which trims to the newest file.
#[test]
fn daemon_trims_after_rotation() {
    let dir = tempfile::tempdir().unwrap();
    let logger = Logger::new(config(dir.path(), "trimmed", false));
    logger.set_stderr_writer(Captured::default());
    logger.set_combined_max_size(1);

    fill(&logger, 30);

    assert!(
        wait_for(|| logger.list_log_files().unwrap().len() == 1),
        "retention never trimmed the directory"
    );
    let current = logger.log_file_path().unwrap();
    assert!(current.exists());
    logger.shutdown();
}

/// Verifies a manual pass keeps files within the budget, newest first.
#[test]
fn manual_pass_respects_budget() {
    let dir = tempfile::tempdir().unwrap();
    let logger = Logger::new(config(dir.path(), "manual", true));
    logger.set_stderr_writer(Captured::default());

    fill(&logger, 30);
    let before = logger.list_log_files().unwrap();
    assert!(before.len() >= 3);

    let budget = before[0].size + before[1].size;
    logger.set_combined_max_size(budget);
    logger.gc_old_files();

    let after = logger.list_log_files().unwrap();
    let names: Vec<&str> = after.iter().map(|info| info.name.as_str()).collect();
    assert_eq!(names, vec![before[0].name.as_str(), before[1].name.as_str()]);
}

/// Verifies disabled daemons leave old files alone.
#[test]
fn disabled_daemons_never_delete() {
    let dir = tempfile::tempdir().unwrap();
    let logger = Logger::new(config(dir.path(), "kept", true));
    logger.set_combined_max_size(1);

    fill(&logger, 30);
    thread::sleep(Duration::from_millis(100));
    assert!(logger.list_log_files().unwrap().len() >= 3);
}

/// Verifies an unreadable directory is reported without stopping the engine.
#[test]
fn scan_failure_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("plain-file");
    fs::write(&blocker, b"not a directory").unwrap();
    let logger = Logger::new(config(&blocker, "blocked", true));
    let stderr = Captured::default();
    logger.set_stderr_writer(stderr.clone());

    logger.gc_old_files();

    let text = String::from_utf8(stderr.0.lock().unwrap().clone()).unwrap();
    assert!(text.contains("unable to GC log files"), "{text}");
}

/// Verifies a directory that does not exist yet is silently skipped.
#[test]
fn missing_directory_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("never-created");
    let logger = Logger::new(config(&missing, "missing", true));
    let stderr = Captured::default();
    logger.set_stderr_writer(stderr.clone());

    logger.gc_old_files();

    assert!(stderr.0.lock().unwrap().is_empty());
    assert!(!fs::exists(&missing).unwrap());
}
