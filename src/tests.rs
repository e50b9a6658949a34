use feature::Feature;
use global;
use libc;
use logger::Logger;
use mock;
use options::Options;
use record::Site;
use severity::Severity;
use slog;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use Facility;

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

const SQL: Feature = Feature::new("SQL", 4);

#[test]
fn test_log() {
    let ((), events) = mock::testing(|| {
        let logger = Logger::builder("unused.log")
            .without_file()
            .syslog()
            .level(Severity::Info)
            .facility(Facility::Local0)
            .ident_str("example-app")
            .build();

        // Nothing is opened until the first record.
        assert!(!logger.is_syslog_open());

        logger.info(format_args!("x={}", 5));
        logger.warn(format_args!("disk {}% full", 91));
        logger.debug(SQL, Site::new("query"), format_args!("filtered by level"));
        logger.error(format_args!("a\0b"));

        logger.close();
        logger.close();
    });

    let expected_events = vec![
        mock::Event::OpenLog {
            ident: Some("example-app".to_string()),
            flags: libc::LOG_NDELAY | libc::LOG_CONS,
            facility: libc::LOG_LOCAL0,
        },
        mock::Event::SysLog {
            priority: libc::LOG_INFO | libc::LOG_LOCAL0,
            message_f: "%s".to_string(),
            message: "[INFO] x=5".to_string(),
        },
        mock::Event::SysLog {
            priority: libc::LOG_WARNING | libc::LOG_LOCAL0,
            message_f: "%s".to_string(),
            message: "[WARN] disk 91% full".to_string(),
        },
        // Embedded NUL bytes are dropped.
        mock::Event::SysLog {
            priority: libc::LOG_ERR | libc::LOG_LOCAL0,
            message_f: "%s".to_string(),
            message: "[ERROR] ab".to_string(),
        },
        mock::Event::CloseLog,
    ];

    assert!(events == expected_events, "events didn't match\ngot: {:#?}\nexpected: {:#?}", events, expected_events);
}

#[test]
fn test_keep_open_opens_eagerly() {
    let ((), events) = mock::testing(|| {
        let logger = Logger::builder("unused.log")
            .without_file()
            .syslog()
            .keep_file_open()
            .build();

        assert!(logger.is_syslog_open());

        // Dropping the logger closes the session.
    });

    assert_eq!(events, vec![
        mock::Event::OpenLog {
            ident: None,
            flags: libc::LOG_NDELAY | libc::LOG_CONS,
            facility: libc::LOG_DAEMON,
        },
        mock::Event::CloseLog,
    ]);
}

#[test]
fn test_fatal_ignores_threshold() {
    let ((), events) = mock::testing(|| {
        let logger = Logger::builder("unused.log")
            .without_file()
            .syslog()
            .build();

        logger.error(format_args!("below the default threshold"));
        logger.fatal(format_args!("out of memory"));
    });

    assert_eq!(mock::messages(&events), vec![
        (libc::LOG_CRIT | libc::LOG_DAEMON, "[FATAL] out of memory".to_string()),
    ]);
}

#[test]
fn test_syslog_strips_timestamp_but_keeps_site() {
    let stderr = SharedBuf::default();

    let ((), events) = mock::testing(|| {
        let logger = Logger::builder("unused.log")
            .options(Options::SYSLOG | Options::STDERR | Options::MILLISECONDS)
            .init_site("/src/app/main.rs")
            .level(Severity::Trace)
            .debug_mask(SQL.mask())
            .stderr_writer(stderr.clone())
            .build();

        logger.debug(SQL, Site::at("query", "/src/app/db.rs", 88), format_args!("rows={}", 3));
        logger.trace_enter(Site::at("draw", "/src/app/ui/widget.rs", 40).with_type("6Widget"), format_args!("start"));
        logger.trace_exit(Site::at("draw", "/src/app/ui/widget.rs", 52).with_type("6Widget"), format_args!("done"));
    });

    assert_eq!(mock::messages(&events), vec![
        (libc::LOG_DEBUG | libc::LOG_DAEMON, "[SQL] query @ db.rs:88 rows=3".to_string()),
        (libc::LOG_DEBUG | libc::LOG_DAEMON, ">>>> Widget::draw @ ui/widget.rs:40 start".to_string()),
        (libc::LOG_DEBUG | libc::LOG_DAEMON, "<<<< Widget::draw @ ui/widget.rs:52 done".to_string()),
    ]);

    // Standard error gets the same records with the timestamp and thread id.
    let lines: Vec<String> = stderr.contents().lines().map(String::from).collect();
    assert_eq!(lines.len(), 3);
    for (line, (_, message)) in lines.iter().zip(mock::messages(&events)) {
        assert!(line.ends_with(&format!(") {}", message)), "{:?} does not end with {:?}", line, message);
        assert_eq!(line.as_bytes()[23], b' ', "{:?} has no millisecond timestamp", line);
    }
}

#[test]
fn test_trace_if_uses_trace_mask() {
    let ((), events) = mock::testing(|| {
        let logger = Logger::builder("unused.log")
            .without_file()
            .syslog()
            .level(Severity::Trace)
            .build();

        logger.trace_enter_if(SQL, Site::at("query", "db.rs", 1), format_args!("hidden"));
        logger.trace(SQL, Site::at("query", "db.rs", 2), format_args!("hidden"));

        logger.enable_trace(SQL);
        logger.trace_enter_if(SQL, Site::at("query", "db.rs", 3), format_args!("shown"));
        logger.trace(SQL, Site::at("query", "db.rs", 4), format_args!("shown"));
        logger.trace_exit_if(SQL, Site::at("query", "db.rs", 5), format_args!("shown"));

        // The debug mask is separate.
        logger.debug(SQL, Site::at("query", "db.rs", 6), format_args!("hidden"));
    });

    assert_eq!(mock::messages(&events), vec![
        (libc::LOG_DEBUG | libc::LOG_DAEMON, ">>>> query @ db.rs:3 shown".to_string()),
        (libc::LOG_DEBUG | libc::LOG_DAEMON, "[SQL] query @ db.rs:4 shown".to_string()),
        (libc::LOG_DEBUG | libc::LOG_DAEMON, "<<<< query @ db.rs:5 shown".to_string()),
    ]);
}

#[test]
fn test_disabling_syslog_closes_session() {
    let ((), events) = mock::testing(|| {
        let logger = Logger::builder("unused.log")
            .without_file()
            .syslog()
            .level(Severity::Info)
            .build();

        logger.info(format_args!("one"));
        logger.set_options(Options::empty());
        assert!(!logger.is_syslog_open());
        logger.info(format_args!("dropped"));

        logger.set_options(Options::SYSLOG);
        logger.info(format_args!("two"));
    });

    assert_eq!(events, vec![
        mock::Event::OpenLog { ident: None, flags: libc::LOG_NDELAY | libc::LOG_CONS, facility: libc::LOG_DAEMON },
        mock::Event::SysLog { priority: libc::LOG_INFO | libc::LOG_DAEMON, message_f: "%s".to_string(), message: "[INFO] one".to_string() },
        mock::Event::CloseLog,
        mock::Event::OpenLog { ident: None, flags: libc::LOG_NDELAY | libc::LOG_CONS, facility: libc::LOG_DAEMON },
        mock::Event::SysLog { priority: libc::LOG_INFO | libc::LOG_DAEMON, message_f: "%s".to_string(), message: "[INFO] two".to_string() },
        mock::Event::CloseLog,
    ]);
}

#[test]
fn test_slog_drain() {
    let ((), events) = mock::testing(|| {
        let drain = Logger::builder("unused.log")
            .without_file()
            .syslog()
            .level(Severity::Warn)
            .build();

        let logger = slog::Logger::root(drain, o!("key" => "value"));

        warn!(logger, "Constructed a temporary logger."; "test" => "message");
        info!(logger, "Below the threshold.");
        crit!(logger, "Critical maps to fatal.");
    });

    let messages = mock::messages(&events);
    assert_eq!(messages.len(), 2, "got {:#?}", messages);

    // Key-value pairs are not rendered.
    assert_eq!(messages[0].0, libc::LOG_WARNING | libc::LOG_DAEMON);
    assert!(messages[0].1.starts_with("[WARN] "));
    assert!(messages[0].1.ends_with(" Constructed a temporary logger."));

    assert_eq!(messages[1].0, libc::LOG_CRIT | libc::LOG_DAEMON);
    assert!(messages[1].1.starts_with("[FATAL] "));
    assert!(messages[1].1.ends_with(" Critical maps to fatal."));

    assert_eq!(events.last(), Some(&mock::Event::CloseLog));
}

#[test]
fn test_replacing_global_keeps_new_session() {
    let ((), events) = mock::testing(|| {
        let old = global::set(Logger::builder("unused.log")
            .without_file()
            .syslog()
            .keep_file_open()
            .ident_str("old")
            .build());
        assert!(old.is_syslog_open());

        let new = global::set(Logger::builder("unused.log")
            .without_file()
            .syslog()
            .keep_file_open()
            .level(Severity::Info)
            .ident_str("new")
            .build());

        // Closing the replaced logger leaves the new session alone.
        assert!(old.is_closed());
        assert!(!old.is_syslog_open());
        assert!(new.is_syslog_open());

        global::info(format_args!("after replace"));
        global::close();
        assert!(!new.is_syslog_open());
    });

    assert_eq!(events, vec![
        mock::Event::OpenLog { ident: Some("old".to_string()), flags: libc::LOG_NDELAY | libc::LOG_CONS, facility: libc::LOG_DAEMON },
        mock::Event::CloseLog,
        mock::Event::OpenLog { ident: Some("new".to_string()), flags: libc::LOG_NDELAY | libc::LOG_CONS, facility: libc::LOG_DAEMON },
        mock::Event::SysLog { priority: libc::LOG_INFO | libc::LOG_DAEMON, message_f: "%s".to_string(), message: "[INFO] after replace".to_string() },
        mock::Event::CloseLog,
    ]);
}

#[test]
fn test_closed_logger_never_reopens_syslog() {
    let ((), events) = mock::testing(|| {
        let logger = Logger::builder("unused.log")
            .without_file()
            .syslog()
            .level(Severity::Info)
            .build();

        logger.info(format_args!("open"));
        logger.close();

        logger.set_options(Options::SYSLOG);
        logger.fatal(format_args!("after close"));
        assert!(!logger.is_syslog_open());
    });

    assert_eq!(events, vec![
        mock::Event::OpenLog { ident: None, flags: libc::LOG_NDELAY | libc::LOG_CONS, facility: libc::LOG_DAEMON },
        mock::Event::SysLog { priority: libc::LOG_INFO | libc::LOG_DAEMON, message_f: "%s".to_string(), message: "[INFO] open".to_string() },
        mock::Event::CloseLog,
    ]);
}
