extern crate regex;
#[macro_use]
extern crate slog;
extern crate slog_sinks;
extern crate tempfile;

use regex::Regex;
use slog_sinks::*;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread;

/// Collects what the logger would write to standard error.
#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    fn contents(&self) -> String {
        let buf = self.0.lock().expect("buffer poisoned");
        String::from_utf8(buf.clone()).expect("stderr output is not UTF-8")
    }
}

impl Write for SharedBuf {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("buffer poisoned").write(data)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn read_log(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_default()
}

fn line_regex(rest: &str) -> Regex {
    Regex::new(&format!(r"^\d{{4}}-\d{{2}}-\d{{2}} \d{{2}}:\d{{2}}:\d{{2}}\.\d{{3}} \(\d+\) {}$", rest))
        .expect("invalid test regex")
}

#[test]
fn info_reaches_file_and_stderr() {
    let dir = tempfile::tempdir().expect("couldn't create temp dir");
    let path = dir.path().join("t.log");
    let stderr = SharedBuf::default();

    let logger = Logger::builder(&path)
        .options(Options::FILE | Options::STDERR | Options::MILLISECONDS)
        .stderr_writer(stderr.clone())
        .build();
    logger.set_level(Severity::Info);

    logger.info(format_args!("x={}", 5));

    let file = read_log(&path);
    let lines: Vec<&str> = file.lines().collect();
    assert_eq!(lines.len(), 1, "log file: {:?}", file);
    assert!(line_regex(r"\[INFO\] x=5").is_match(lines[0]), "bad line: {:?}", lines[0]);

    assert_eq!(stderr.contents(), file);

    // The file is not held open between records.
    assert!(!logger.is_file_open());
    assert!(!logger.is_syslog_open());
}

#[test]
fn threshold_filters_all_sinks() {
    let dir = tempfile::tempdir().expect("couldn't create temp dir");
    let path = dir.path().join("t.log");
    let stderr = SharedBuf::default();

    let logger = Logger::builder(&path)
        .stderr()
        .stderr_writer(stderr.clone())
        .build();
    logger.set_level(Severity::Error);

    logger.warn(format_args!("not logged"));
    logger.info(format_args!("not logged"));

    assert!(!path.exists());
    assert_eq!(stderr.contents(), "");
    assert_eq!(logger.file_open_count(), 0);

    logger.error(format_args!("logged"));
    assert!(read_log(&path).contains("[ERROR] logged"));
}

#[test]
fn feature_masks_gate_debug_and_trace() {
    const CSV: Feature = Feature::new("CSV", 0);
    const SQL: Feature = Feature::new("SQL", 9);

    let dir = tempfile::tempdir().expect("couldn't create temp dir");
    let path = dir.path().join("t.log");

    let logger = Logger::builder(&path)
        .level(Severity::Debug)
        .debug_mask(SQL.mask())
        .build();

    logger.debug(CSV, Site::new("parse"), format_args!("csv hidden"));
    logger.debug(SQL, Site::new("query"), format_args!("sql shown"));

    // Trace records need the trace level, even with the feature enabled.
    logger.enable_trace(SQL);
    logger.trace(SQL, Site::new("query"), format_args!("trace hidden"));
    logger.trace_enter(Site::new("query"), format_args!("enter hidden"));

    logger.set_level(Severity::Trace);
    logger.trace(SQL, Site::new("query"), format_args!("trace shown"));

    logger.disable_debug(SQL);
    logger.debug(SQL, Site::new("query"), format_args!("sql hidden again"));

    let log = read_log(&path);
    assert!(!log.contains("hidden"), "log: {:?}", log);

    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 2, "log: {:?}", log);
    assert!(lines[0].contains(") [SQL] query @ test.rs:"), "bad line: {:?}", lines[0]);
    assert!(lines[0].ends_with(" sql shown"));
    assert!(lines[1].contains(") [SQL] query @ test.rs:"));
    assert!(lines[1].ends_with(" trace shown"));
}

#[test]
fn keep_open_reuses_one_handle() {
    let dir = tempfile::tempdir().expect("couldn't create temp dir");
    let path = dir.path().join("t.log");

    let logger = Logger::builder(&path)
        .keep_file_open()
        .flush_file()
        .level(Severity::Info)
        .build();

    // Opened eagerly.
    assert!(logger.is_file_open());
    assert_eq!(logger.file_open_count(), 1);

    for i in 0..5 {
        logger.info(format_args!("record {}", i));
    }

    assert!(logger.is_file_open());
    assert_eq!(logger.file_open_count(), 1);
    assert_eq!(read_log(&path).lines().count(), 5);

    // The held handle still points at the unlinked file.
    fs::remove_file(&path).expect("couldn't remove log file");
    logger.info(format_args!("into the void"));
    assert!(!path.exists());

    logger.close();
    assert!(!logger.is_file_open());
}

#[test]
fn reopens_per_record_without_keep_open() {
    let dir = tempfile::tempdir().expect("couldn't create temp dir");
    let path = dir.path().join("t.log");

    let logger = Logger::builder(&path).level(Severity::Info).build();

    assert!(!logger.is_file_open());
    assert_eq!(logger.file_open_count(), 0);

    logger.info(format_args!("one"));
    fs::remove_file(&path).expect("couldn't remove log file");
    logger.info(format_args!("two"));

    assert!(!logger.is_file_open());
    assert_eq!(logger.file_open_count(), 2);

    let log = read_log(&path);
    assert_eq!(log.lines().count(), 1);
    assert!(log.ends_with(" [INFO] two\n"));
}

#[test]
fn unwritable_path_is_ignored() {
    let dir = tempfile::tempdir().expect("couldn't create temp dir");
    let path = dir.path().join("missing").join("t.log");
    let stderr = SharedBuf::default();

    let logger = Logger::builder(&path)
        .stderr()
        .stderr_writer(stderr.clone())
        .build();

    logger.fatal(format_args!("first"));
    logger.fatal(format_args!("second"));

    assert_eq!(logger.file_open_count(), 0);
    assert_eq!(stderr.contents().lines().count(), 2);
}

#[test]
fn close_twice_then_log() {
    let dir = tempfile::tempdir().expect("couldn't create temp dir");
    let path = dir.path().join("t.log");

    let logger = Logger::open(&path, Options::FILE | Options::KEEP_FILE_OPEN);
    logger.fatal(format_args!("before"));

    logger.close();
    logger.close();

    assert!(logger.is_closed());
    assert!(!logger.is_file_open());
    assert!(!logger.is_syslog_open());

    logger.fatal(format_args!("after"));
    let log = read_log(&path);
    assert!(log.contains("before"));
    assert!(!log.contains("after"));
}

#[test]
fn concurrent_lines_do_not_interleave() {
    let dir = tempfile::tempdir().expect("couldn't create temp dir");
    let path = dir.path().join("t.log");

    let logger = Arc::new(Logger::builder(&path)
        .flush_file()
        .milliseconds()
        .level(Severity::Info)
        .build());

    let threads: Vec<_> = (0..2)
        .map(|t| {
            let logger = logger.clone();
            thread::spawn(move || {
                for i in 0..1000 {
                    logger.info(format_args!("thread {} record {} {}", t, i, "padding".repeat(8)));
                }
            })
        })
        .collect();

    for handle in threads {
        handle.join().expect("logging thread panicked");
    }

    let re = line_regex(r"\[INFO\] thread [01] record \d+ (padding){8}");
    let log = read_log(&path);
    let lines: Vec<&str> = log.lines().collect();

    assert_eq!(lines.len(), 2000);
    for line in &lines {
        assert!(re.is_match(line), "bad line: {:?}", line);
    }

    // Each thread's records stay in order.
    for t in 0..2 {
        let prefix = format!("thread {} record ", t);
        let seq: Vec<usize> = lines.iter()
            .filter_map(|line| line.find(&prefix).map(|i| &line[i + prefix.len()..]))
            .filter_map(|rest| rest.split(' ').next())
            .filter_map(|n| n.parse().ok())
            .collect();
        assert_eq!(seq, (0..1000).collect::<Vec<usize>>());
    }
}

#[test]
fn trace_paths_are_shortened() {
    let dir = tempfile::tempdir().expect("couldn't create temp dir");
    let path = dir.path().join("t.log");

    struct Parser;

    let logger = Logger::builder(&path)
        .init_site("/a/b/c/init.ext")
        .level(Severity::Trace)
        .build();

    logger.trace_enter(Site::at("run", "/a/b/c/other.ext", 7), format_args!("in"));
    logger.trace_exit(Site::at("run", "/a/x/other.ext", 9), format_args!("out"));
    logger.trace_enter(Site::member("7MyClass", "draw"), format_args!("member"));
    logger.trace_exit(Site::of::<Parser>("parse"), format_args!("typed"));

    let log = read_log(&path);
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 4, "log: {:?}", log);

    assert!(lines[0].ends_with(") >>>> run @ other.ext:7 in"), "bad line: {:?}", lines[0]);
    assert!(lines[1].ends_with(") <<<< run @ /a/x/other.ext:9 out"), "bad line: {:?}", lines[1]);
    assert!(lines[2].contains(") >>>> MyClass::draw @ "), "bad line: {:?}", lines[2]);
    assert!(lines[3].contains(") <<<< Parser::parse @ "), "bad line: {:?}", lines[3]);
    assert!(lines[3].ends_with(" typed"));
}

#[test]
fn slog_records_go_to_file() {
    let dir = tempfile::tempdir().expect("couldn't create temp dir");
    let path = dir.path().join("t.log");

    let drain = Arc::new(Logger::builder(&path).level(Severity::Info).build());
    let log = slog::Logger::root(drain.clone(), o!("app" => "test"));

    info!(log, "Hello, world!"; "ignored" => 1);
    warn!(log, "careful");
    drop(log);

    drain.set_level(Severity::Warn);
    drain.info(format_args!("hidden"));

    let contents = read_log(&path);
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2, "log: {:?}", contents);
    assert!(lines[0].contains(" [INFO] "));
    assert!(lines[0].ends_with("Hello, world!"));
    assert!(lines[1].contains(" [WARN] "));
    assert!(lines[1].ends_with("careful"));
}
