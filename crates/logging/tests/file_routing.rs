//! Integration tests for routing entries into rotating log files.

use std::fs;
use std::io::{BufReader, Write};
use std::path::Path;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use std::thread;

use logging::{Config, EntryDecoder, Identity, Logger, Severity, StackPolicy, Threshold};

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

fn identity(program: &str) -> Identity {
    Identity {
        program: program.to_owned(),
        host: "testhost".to_owned(),
        user: "tester".to_owned(),
        pid: 4242,
        build: "build-7".to_owned(),
        arguments: vec![program.to_owned(), "-v".to_owned()],
    }
}

fn file_logger(dir: &Path, program: &str) -> (Logger, Captured) {
    let logger = Logger::new(Config {
        log_dir: Some(dir.to_path_buf()),
        identity: Some(identity(program)),
        no_stderr_redirect: true,
        disable_daemons: true,
        no_color: true,
        stack_policy: StackPolicy::None,
        ..Config::default()
    });
    let captured = Captured::default();
    logger.set_stderr_writer(captured.clone());
    (logger, captured)
}

fn read_entries(path: &Path) -> Vec<logging::Entry> {
    let file = fs::File::open(path).expect("open log file");
    EntryDecoder::new(BufReader::new(file))
        .collect::<Result<Vec<_>, _>>()
        .expect("decodes")
}

// ============================================================================
// Routing
// ============================================================================

/// Verifies no file exists until an entry is routed to one.
#[test]
fn file_is_created_lazily() {
    let dir = tempfile::tempdir().unwrap();
    let (logger, _captured) = file_logger(dir.path(), "lazy");

    assert!(logger.log_file_path().is_none());
    assert!(logger.list_log_files().unwrap().is_empty());

    logger.log(Severity::Info, "main.rs", 1, "hello");
    let path = logger.log_file_path().expect("created");
    assert!(path.starts_with(dir.path()));
    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("lazy.testhost.tester."));
    assert!(name.ends_with(".4242.log"));
}

/// Verifies the preamble precedes the first entry and names the process.
#[test]
fn preamble_comes_first() {
    let dir = tempfile::tempdir().unwrap();
    let (logger, _captured) = file_logger(dir.path(), "preamble");

    logger.log(Severity::Warning, "server.rs", 88, "low disk");
    logger.flush().unwrap();

    let entries = read_entries(&logger.log_file_path().unwrap());
    assert_eq!(entries.len(), 6);
    assert!(entries[0].message.starts_with("[config] file created at: "));
    assert_eq!(entries[1].message, "[config] running on machine: testhost");
    assert_eq!(entries[2].message, "[config] binary: build-7");
    assert_eq!(entries[3].message, "[config] arguments: [preamble -v]");
    assert!(entries[4].message.starts_with("line format: "));
    assert!(entries[..5].iter().all(|entry| entry.severity == Severity::Info));

    let last = &entries[5];
    assert_eq!(last.severity, Severity::Warning);
    assert_eq!(last.file, "server.rs");
    assert_eq!(last.line, 88);
    assert_eq!(last.message, "low disk");
}

/// Verifies the two thresholds filter independently.
#[test]
fn thresholds_filter_each_destination() {
    let dir = tempfile::tempdir().unwrap();
    let (logger, captured) = file_logger(dir.path(), "thresholds");
    logger.set_stderr_threshold(Threshold::ERROR);
    logger.set_file_threshold(Threshold::WARNING);

    logger.log(Severity::Info, "a.rs", 1, "info entry");
    logger.log(Severity::Warning, "a.rs", 2, "warning entry");
    logger.log(Severity::Error, "a.rs", 3, "error entry");
    logger.flush().unwrap();

    let stderr = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
    assert!(!stderr.contains("info entry"));
    assert!(!stderr.contains("warning entry"));
    assert!(stderr.contains("error entry"));

    let file = fs::read_to_string(logger.log_file_path().unwrap()).unwrap();
    assert!(!file.contains("info entry"));
    assert!(file.contains("warning entry"));
    assert!(file.contains("error entry"));
}

/// Verifies a NONE file threshold never creates a file.
#[test]
fn none_threshold_keeps_directory_empty() {
    let dir = tempfile::tempdir().unwrap();
    let (logger, _captured) = file_logger(dir.path(), "none");
    logger.set_file_threshold(Threshold::NONE);

    logger.log(Severity::Error, "a.rs", 1, "not on disk");
    assert!(logger.log_file_path().is_none());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

// ============================================================================
// Rotation
// ============================================================================

/// Verifies a small size ceiling rotates into fresh files, each with a preamble.
#[test]
fn rotation_starts_new_files_with_preamble() {
    let dir = tempfile::tempdir().unwrap();
    let (logger, _captured) = file_logger(dir.path(), "rotate");
    logger.set_max_file_size(1024);

    for index in 0..40 {
        logger.log(Severity::Info, "rotate.rs", index, format!("entry {index:04} {}", "x".repeat(40)));
    }
    logger.flush().unwrap();

    let files = logger.list_log_files().unwrap();
    assert!(files.len() >= 2, "expected rotation, got {}", files.len());
    for info in &files {
        assert!(info.size <= 1024, "{} is {} bytes", info.name, info.size);
        let entries = read_entries(&dir.path().join(&info.name));
        assert!(entries[0].message.starts_with("[config] file created at: "));
    }

    let current = logger.log_file_path().unwrap();
    assert_eq!(files[0].name, current.file_name().unwrap().to_string_lossy());
    let all: Vec<String> = files
        .iter()
        .flat_map(|info| read_entries(&dir.path().join(&info.name)))
        .filter(|entry| entry.file == "rotate.rs")
        .map(|entry| entry.message)
        .collect();
    assert_eq!(all.len(), 40);
}

/// Verifies the `{program}.log` link follows the newest file.
#[cfg(unix)]
#[test]
fn symlink_tracks_newest_file() {
    let dir = tempfile::tempdir().unwrap();
    let (logger, _captured) = file_logger(dir.path(), "linked");

    logger.log(Severity::Info, "a.rs", 1, "first");
    let target = fs::read_link(dir.path().join("linked.log")).unwrap();
    assert_eq!(
        target.file_name(),
        logger.log_file_path().unwrap().file_name()
    );
}

/// Verifies closing the file makes the next entry open a new one.
#[test]
fn close_file_then_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let (logger, _captured) = file_logger(dir.path(), "reopen");

    logger.log(Severity::Info, "a.rs", 1, "before close");
    let first = logger.log_file_path().unwrap();
    logger.close_file().unwrap();
    assert!(logger.log_file_path().is_none());
    assert!(fs::read_to_string(&first).unwrap().contains("before close"));

    logger.log(Severity::Info, "a.rs", 2, "after close");
    let second = logger.log_file_path().unwrap();
    assert_ne!(first, second);
    assert_eq!(logger.list_log_files().unwrap().len(), 2);
}

/// Verifies sync mode writes each entry through to disk.
#[test]
fn sync_mode_needs_no_explicit_flush() {
    let dir = tempfile::tempdir().unwrap();
    let (logger, _captured) = file_logger(dir.path(), "synced");
    logger.set_sync(true);

    logger.log(Severity::Info, "a.rs", 1, "durable");
    let text = fs::read_to_string(logger.log_file_path().unwrap()).unwrap();
    assert!(text.contains("durable"));
}

/// Verifies the io::Write bridge records parsed locations in the file.
#[test]
fn bridge_writes_parsed_entries() {
    let dir = tempfile::tempdir().unwrap();
    let (logger, _captured) = file_logger(dir.path(), "bridged");

    let mut bridge = logger.bridge(Severity::Error);
    bridge.write_all(b"src/legacy.rs:31: socket closed\n").unwrap();
    bridge.write_all(b"garbage\n").unwrap();
    bridge.flush().unwrap();

    let entries = read_entries(&logger.log_file_path().unwrap());
    let bridged: Vec<_> = entries.iter().skip(5).collect();
    assert_eq!(bridged.len(), 2);
    assert_eq!(bridged[0].severity, Severity::Error);
    assert_eq!(bridged[0].file, "legacy.rs");
    assert_eq!(bridged[0].line, 31);
    assert_eq!(bridged[0].message, "socket closed");
    assert_eq!(bridged[1].file, "???");
    assert_eq!(bridged[1].line, 1);
    assert_eq!(bridged[1].message, "bad log format: garbage");
}

// ============================================================================
// Concurrency
// ============================================================================

/// Verifies concurrent writers across rotations lose and interleave nothing.
#[test]
fn concurrent_writers_survive_rotation() {
    const WRITERS: usize = 4;
    const PER_WRITER: u32 = 200;

    let dir = tempfile::tempdir().unwrap();
    let (logger, _captured) = file_logger(dir.path(), "contended");
    logger.set_stderr_threshold(Threshold::NONE);
    logger.set_max_file_size(4096);

    let handles: Vec<_> = (0..WRITERS)
        .map(|writer| {
            let logger = logger.clone();
            thread::spawn(move || {
                for i in 0..PER_WRITER {
                    logger.log(
                        Severity::Info,
                        "worker.rs",
                        i + 1,
                        format!("writer {writer} entry {i} {}", "z".repeat(24)),
                    );
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    logger.flush().unwrap();

    let files = logger.list_log_files().unwrap();
    assert!(files.len() > 1, "expected rotation, got {} file(s)", files.len());

    let mut seen = BTreeSet::new();
    for info in &files {
        let entries = read_entries(&dir.path().join(&info.name));
        assert!(entries.len() > 5);
        for entry in entries.iter().filter(|entry| entry.file == "worker.rs") {
            assert!(entry.stacks.is_none(), "split line in {}", info.name);
            assert!(entry.message.ends_with(&"z".repeat(24)));
            assert!(seen.insert(entry.message.clone()), "duplicate {}", entry.message);
        }
    }

    assert_eq!(seen.len(), WRITERS * PER_WRITER as usize);
    for writer in 0..WRITERS {
        for i in 0..PER_WRITER {
            let expected = format!("writer {writer} entry {i} {}", "z".repeat(24));
            assert!(seen.contains(&expected), "lost {expected}");
        }
    }
}
