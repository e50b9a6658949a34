use builder::LoggerBuilder;
use feature::Feature;
use format;
use options::Options;
use record::{Label, LogRecord, Site};
use severity::Severity;
use std::cell::RefCell;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use syslog::SyslogSession;
use timestamp::{self, Timestamp};

thread_local! {
    static TL_BUF: RefCell<Vec<u8>> = RefCell::new(Vec::with_capacity(256))
}

/// The sinks written under the lock.
struct Sinks {
    file: Option<File>,
    stderr: Box<dyn Write + Send>,
}

/// The logging core: a severity threshold, debug and trace feature masks,
/// and up to three sinks (a log file, standard error, and syslog).
///
/// A `Logger` is `Sync`. Share it by reference or through an `Arc`, or
/// install one process-wide with [`global::open`].
///
/// Every entry point ([`error`], [`debug`], [`trace_enter`], ...) checks
/// the threshold and masks first, so a suppressed call costs a couple of
/// atomic loads and never formats its message. The checks are also
/// available on their own ([`is_info`], [`is_debug_feature`], ...).
///
/// Lines written to the file and to standard error from different threads
/// never interleave. Syslog submissions happen after the lock is released
/// and are not ordered relative to the other sinks.
///
/// # Example
///
/// ```
/// # extern crate slog_sinks;
/// # extern crate tempfile;
/// use slog_sinks::{Logger, Options, Severity};
///
/// # let dir = tempfile::tempdir().unwrap();
/// # let path = dir.path().join("app.log");
/// let logger = Logger::builder(&path)
///     .options(Options::FILE | Options::MILLISECONDS)
///     .level(Severity::Info)
///     .build();
///
/// logger.info(format_args!("listening on port {}", 8080));
/// logger.close();
/// ```
///
/// [`global::open`]: global/fn.open.html
/// [`error`]: #method.error
/// [`debug`]: #method.debug
/// [`trace_enter`]: #method.trace_enter
/// [`is_info`]: #method.is_info
/// [`is_debug_feature`]: #method.is_debug_feature
pub struct Logger {
    path: PathBuf,
    base_prefix: String,

    level: AtomicU32,
    debug_mask: AtomicU32,
    trace_mask: AtomicU32,
    options: AtomicU32,

    closed: AtomicBool,
    file_opens: AtomicUsize,

    sinks: Mutex<Sinks>,
    syslog: SyslogSession,
}

impl Logger {
    /// Creates a logger writing to `path` with the given options and all
    /// other settings at their defaults.
    ///
    /// Equivalent to `Logger::builder(path).options(options).build()`.
    #[track_caller]
    pub fn open<P: AsRef<Path>>(path: P, options: Options) -> Logger {
        LoggerBuilder::new(path).options(options).build()
    }

    /// Creates a new `LoggerBuilder`.
    ///
    /// Equivalent to `LoggerBuilder::new(path)`. The caller's source file
    /// becomes the base for shortening paths in trace output.
    #[track_caller]
    pub fn builder<P: AsRef<Path>>(path: P) -> LoggerBuilder {
        LoggerBuilder::new(path)
    }

    pub(crate) fn from_builder(builder: LoggerBuilder) -> Logger {
        let LoggerBuilder {
            path,
            options,
            level,
            debug_mask,
            trace_mask,
            facility,
            ident,
            init_site,
            stderr,
        } = builder;

        let logger = Logger {
            base_prefix: format::base_prefix(&init_site).to_string(),
            path,

            level: AtomicU32::new(level.as_int()),
            debug_mask: AtomicU32::new(debug_mask),
            trace_mask: AtomicU32::new(trace_mask),
            options: AtomicU32::new(options.bits()),

            closed: AtomicBool::new(false),
            file_opens: AtomicUsize::new(0),

            sinks: Mutex::new(Sinks { file: None, stderr }),
            syslog: SyslogSession::new(ident, facility),
        };

        if options.contains(Options::KEEP_FILE_OPEN) {
            if options.contains(Options::FILE) {
                let mut sinks = logger.lock_sinks();
                sinks.file = logger.open_file();
            }
            if options.contains(Options::SYSLOG) {
                logger.syslog.open();
            }
        }

        logger
    }

    fn lock_sinks(&self) -> MutexGuard<'_, Sinks> {
        // A panic while holding the lock leaves at worst a partial line.
        self.sinks.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Opens the log file for appending, creating it if needed. Failures
    /// are dropped; the next record tries again.
    fn open_file(&self) -> Option<File> {
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .ok();

        if file.is_some() {
            self.file_opens.fetch_add(1, Ordering::Relaxed);
        }

        file
    }

    /// Shuts the logger down: closes the log file and the syslog session.
    ///
    /// Records logged afterwards are dropped. Calling `close` again does
    /// nothing. Dropping a `Logger` closes it.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);

        {
            let mut sinks = self.lock_sinks();
            sinks.file = None;
            let _ = sinks.stderr.flush();
        }

        // A record that got past the `closed` check cannot reopen it.
        self.syslog.shutdown();
    }

    /// Whether `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// The log file's path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The directory prefix stripped from source paths in trace output.
    pub fn base_prefix(&self) -> &str {
        &self.base_prefix
    }

    /// The current options.
    #[inline]
    pub fn options(&self) -> Options {
        Options::from_bits_truncate(self.options.load(Ordering::Relaxed))
    }

    /// Replaces the options.
    ///
    /// Disabling the file sink (or `KEEP_FILE_OPEN`) closes a kept-open log
    /// file; disabling the syslog sink closes the syslog session.
    pub fn set_options(&self, options: Options) {
        self.options.store(options.bits(), Ordering::Relaxed);

        if !options.contains(Options::FILE | Options::KEEP_FILE_OPEN) {
            self.lock_sinks().file = None;
        }

        if !options.contains(Options::SYSLOG) {
            self.syslog.close();
        }
    }

    /// The severity threshold.
    #[inline]
    pub fn level(&self) -> Severity {
        Severity::from_int_saturating(self.level.load(Ordering::Relaxed))
    }

    /// Sets the severity threshold. Records more verbose than `level` are
    /// dropped, except `Fatal` ones, which are never dropped.
    pub fn set_level(&self, level: Severity) {
        self.level.store(level.as_int(), Ordering::Relaxed);
    }

    /// The debug feature mask.
    #[inline]
    pub fn debug_mask(&self) -> u32 {
        self.debug_mask.load(Ordering::Relaxed)
    }

    /// Replaces the debug feature mask.
    pub fn set_debug_mask(&self, mask: u32) {
        self.debug_mask.store(mask, Ordering::Relaxed);
    }

    /// Turns on debug records for `feature`.
    pub fn enable_debug(&self, feature: Feature) {
        self.debug_mask.fetch_or(feature.mask(), Ordering::Relaxed);
    }

    /// Turns off debug records for `feature`.
    pub fn disable_debug(&self, feature: Feature) {
        self.debug_mask.fetch_and(!feature.mask(), Ordering::Relaxed);
    }

    /// The trace feature mask.
    #[inline]
    pub fn trace_mask(&self) -> u32 {
        self.trace_mask.load(Ordering::Relaxed)
    }

    /// Replaces the trace feature mask.
    pub fn set_trace_mask(&self, mask: u32) {
        self.trace_mask.store(mask, Ordering::Relaxed);
    }

    /// Turns on feature-gated trace records for `feature`.
    pub fn enable_trace(&self, feature: Feature) {
        self.trace_mask.fetch_or(feature.mask(), Ordering::Relaxed);
    }

    /// Turns off feature-gated trace records for `feature`.
    pub fn disable_trace(&self, feature: Feature) {
        self.trace_mask.fetch_and(!feature.mask(), Ordering::Relaxed);
    }

    /// Whether records of `severity` pass the threshold. Always true for
    /// `Fatal`.
    #[inline]
    pub fn is_enabled(&self, severity: Severity) -> bool {
        severity == Severity::Fatal || severity <= self.level()
    }

    /// Whether `error` records are logged.
    #[inline]
    pub fn is_error(&self) -> bool {
        self.is_enabled(Severity::Error)
    }

    /// Whether `warn` records are logged.
    #[inline]
    pub fn is_warn(&self) -> bool {
        self.is_enabled(Severity::Warn)
    }

    /// Whether `info` records are logged.
    #[inline]
    pub fn is_info(&self) -> bool {
        self.is_enabled(Severity::Info)
    }

    /// Whether the threshold admits debug records. Each record also needs its
    /// feature enabled, see [`is_debug_feature`](#method.is_debug_feature).
    #[inline]
    pub fn is_debug(&self) -> bool {
        self.is_enabled(Severity::Debug)
    }

    /// Whether the threshold admits trace records.
    #[inline]
    pub fn is_trace(&self) -> bool {
        self.is_enabled(Severity::Trace)
    }

    /// Whether any bit of `mask` is set in the debug mask.
    #[inline]
    pub fn is_debug_feature(&self, mask: u32) -> bool {
        self.debug_mask() & mask != 0
    }

    /// Whether any bit of `mask` is set in the trace mask.
    #[inline]
    pub fn is_trace_feature(&self, mask: u32) -> bool {
        self.trace_mask() & mask != 0
    }

    /// Whether the log file is currently held open.
    pub fn is_file_open(&self) -> bool {
        self.lock_sinks().file.is_some()
    }

    /// Whether the syslog session is open.
    pub fn is_syslog_open(&self) -> bool {
        self.syslog.is_open()
    }

    /// How many times the log file has been opened so far.
    pub fn file_open_count(&self) -> usize {
        self.file_opens.load(Ordering::Relaxed)
    }

    /// Writes `record` to every enabled sink.
    ///
    /// This does not look at the threshold or the feature masks; the
    /// severity-specific methods do that before building a record. It does
    /// nothing once the logger is closed.
    pub fn log(&self, record: &LogRecord) {
        if self.is_closed() {
            return;
        }

        let options = self.options();
        if !options.intersects(Options::FILE | Options::STDERR | Options::SYSLOG) {
            return;
        }

        TL_BUF.with(|tl_buf| match tl_buf.try_borrow_mut() {
            Ok(mut buf) => self.emit(&mut buf, options, record),

            // Already borrowed: a `Display` impl in the message is logging
            // through this thread's buffer.
            Err(_) => self.emit(&mut Vec::new(), options, record),
        })
    }

    fn emit(&self, buf: &mut Vec<u8>, options: Options, record: &LogRecord) {
        buf.clear();

        let label_at = format::write_line(
            buf,
            Timestamp::now(options.contains(Options::MILLISECONDS)),
            timestamp::thread_id(),
            record,
            &self.base_prefix,
        );

        if options.intersects(Options::FILE | Options::STDERR) {
            let mut sinks = self.lock_sinks();

            // `close` may have run while we waited for the lock.
            if self.is_closed() {
                buf.clear();
                return;
            }

            if options.contains(Options::FILE) {
                self.write_file(&mut sinks, buf, options);
            }

            if options.contains(Options::STDERR) {
                let _ = sinks.stderr.write_all(buf);
            }
        }

        if options.contains(Options::SYSLOG) {
            // Syslog keeps its own timestamps: send the label onwards,
            // without the newline.
            buf.pop();
            buf.drain(..label_at);
            self.syslog.submit(record.severity(), buf);
        }

        buf.clear();
    }

    fn write_file(&self, sinks: &mut Sinks, line: &[u8], options: Options) {
        if sinks.file.is_none() {
            sinks.file = self.open_file();
        }

        if let Some(ref mut file) = sinks.file {
            let _ = file.write_all(line);

            if options.contains(Options::FLUSH_FILE) {
                let _ = file.flush();
            }
        }

        if !options.contains(Options::KEEP_FILE_OPEN) {
            sinks.file = None;
        }
    }

    /// Logs a `Fatal` record. Fatal records ignore the threshold.
    ///
    /// The process keeps running; see [`fatal_exit`](#method.fatal_exit).
    pub fn fatal(&self, args: fmt::Arguments) {
        self.log(&LogRecord::new(Severity::Fatal, args));
    }

    /// Logs a `Fatal` record, closes the logger, and aborts the process.
    pub fn fatal_exit(&self, args: fmt::Arguments) -> ! {
        self.fatal(args);
        self.close();
        process::abort()
    }

    /// Logs an `Error` record if the threshold admits it.
    pub fn error(&self, args: fmt::Arguments) {
        if self.is_error() {
            self.log(&LogRecord::new(Severity::Error, args));
        }
    }

    /// Logs a `Warn` record if the threshold admits it.
    pub fn warn(&self, args: fmt::Arguments) {
        if self.is_warn() {
            self.log(&LogRecord::new(Severity::Warn, args));
        }
    }

    /// Logs an `Info` record if the threshold admits it.
    pub fn info(&self, args: fmt::Arguments) {
        if self.is_info() {
            self.log(&LogRecord::new(Severity::Info, args));
        }
    }

    /// Logs a debug record labelled with the feature's name, if the
    /// threshold admits debug records and `feature` is in the debug mask.
    ///
    /// ```
    /// # extern crate slog_sinks;
    /// # extern crate tempfile;
    /// use slog_sinks::{Feature, Logger, Severity, Site};
    ///
    /// const SQL: Feature = Feature::new("SQL", 3);
    ///
    /// # let dir = tempfile::tempdir().unwrap();
    /// let logger = Logger::builder(dir.path().join("app.log"))
    ///     .level(Severity::Debug)
    ///     .debug_mask(SQL.mask())
    ///     .build();
    ///
    /// // [SQL] query @ lib.rs:NN rows=3
    /// logger.debug(SQL, Site::new("query"), format_args!("rows={}", 3));
    /// ```
    pub fn debug(&self, feature: Feature, site: Site, args: fmt::Arguments) {
        if self.is_debug() && self.is_debug_feature(feature.mask()) {
            self.log(&LogRecord::new(Severity::Debug, args)
                .with_label(Label::Feature(feature))
                .with_site(site));
        }
    }

    /// Logs a trace record labelled with the feature's name, if the
    /// threshold admits trace records and `feature` is in the trace mask.
    pub fn trace(&self, feature: Feature, site: Site, args: fmt::Arguments) {
        if self.is_trace() && self.is_trace_feature(feature.mask()) {
            self.log(&LogRecord::new(Severity::Trace, args)
                .with_label(Label::Feature(feature))
                .with_site(site));
        }
    }

    /// Marks entry into `site`'s function (`>>>>`), if the threshold admits
    /// trace records. The trace mask is not consulted.
    pub fn trace_enter(&self, site: Site, args: fmt::Arguments) {
        if self.is_trace() {
            self.log_marker(Label::Enter, site, args);
        }
    }

    /// Marks exit from `site`'s function (`<<<<`), if the threshold admits
    /// trace records. The trace mask is not consulted.
    pub fn trace_exit(&self, site: Site, args: fmt::Arguments) {
        if self.is_trace() {
            self.log_marker(Label::Exit, site, args);
        }
    }

    /// Like [`trace_enter`](#method.trace_enter), but only if `feature` is
    /// also in the trace mask.
    pub fn trace_enter_if(&self, feature: Feature, site: Site, args: fmt::Arguments) {
        if self.is_trace() && self.is_trace_feature(feature.mask()) {
            self.log_marker(Label::Enter, site, args);
        }
    }

    /// Like [`trace_exit`](#method.trace_exit), but only if `feature` is
    /// also in the trace mask.
    pub fn trace_exit_if(&self, feature: Feature, site: Site, args: fmt::Arguments) {
        if self.is_trace() && self.is_trace_feature(feature.mask()) {
            self.log_marker(Label::Exit, site, args);
        }
    }

    fn log_marker(&self, label: Label, site: Site, args: fmt::Arguments) {
        self.log(&LogRecord::new(Severity::Trace, args)
            .with_label(label)
            .with_site(site));
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Logger")
            .field("path", &self.path)
            .field("base_prefix", &self.base_prefix)
            .field("level", &self.level())
            .field("debug_mask", &format_args!("{:#x}", self.debug_mask()))
            .field("trace_mask", &format_args!("{:#x}", self.trace_mask()))
            .field("options", &self.options())
            .field("closed", &self.is_closed())
            .field("syslog", &self.syslog)
            .finish()
    }
}

#[cfg(test)]
use tempfile;

#[cfg(test)]
fn quiet(dir: &tempfile::TempDir) -> Logger {
    Logger::builder(dir.path().join("unit.log"))
        .options(Options::empty())
        .build()
}

#[test]
fn test_threshold_predicates() {
    let dir = tempfile::tempdir().expect("tempdir");
    let logger = quiet(&dir);

    assert_eq!(logger.level(), Severity::Fatal);
    assert!(logger.is_enabled(Severity::Fatal));
    assert!(!logger.is_error());

    logger.set_level(Severity::Warn);
    assert!(logger.is_error());
    assert!(logger.is_warn());
    assert!(!logger.is_info());
    assert!(!logger.is_debug());

    logger.set_level(Severity::Trace);
    assert!(logger.is_info() && logger.is_debug() && logger.is_trace());
}

#[test]
fn test_feature_masks() {
    const CSV: Feature = Feature::new("CSV", 0);
    const SQL: Feature = Feature::new("SQL", 5);

    let dir = tempfile::tempdir().expect("tempdir");
    let logger = quiet(&dir);

    logger.enable_debug(CSV);
    logger.enable_debug(SQL);
    assert_eq!(logger.debug_mask(), 0b10_0001);
    logger.disable_debug(CSV);
    assert!(!logger.is_debug_feature(CSV.mask()));
    assert!(logger.is_debug_feature(SQL.mask() | CSV.mask()));

    logger.set_trace_mask(0xff);
    logger.disable_trace(SQL);
    assert_eq!(logger.trace_mask(), 0xdf);
    assert!(logger.is_trace_feature(CSV.mask()));
}

#[test]
fn test_base_prefix_from_init_site() {
    let dir = tempfile::tempdir().expect("tempdir");
    let logger = Logger::builder(dir.path().join("unit.log"))
        .init_site("/a/b/c/init.ext")
        .build();
    assert_eq!(logger.base_prefix(), "/a/b/c/");

    // The default init site is this file.
    let logger = quiet(&dir);
    assert!(file!().starts_with(logger.base_prefix()));
}

#[test]
fn test_set_options_releases_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let logger = Logger::open(dir.path().join("unit.log"), Options::FILE | Options::KEEP_FILE_OPEN);
    assert!(logger.is_file_open());
    assert_eq!(logger.file_open_count(), 1);

    logger.set_options(Options::FILE | Options::STDERR);
    assert!(!logger.is_file_open());
    assert_eq!(logger.options(), Options::FILE | Options::STDERR);
}

#[test]
fn test_close_is_idempotent() {
    let dir = tempfile::tempdir().expect("tempdir");
    let logger = Logger::open(dir.path().join("unit.log"), Options::FILE | Options::KEEP_FILE_OPEN);

    logger.close();
    logger.close();
    assert!(logger.is_closed());
    assert!(!logger.is_file_open());

    logger.fatal(format_args!("dropped"));
    assert!(!logger.is_file_open());
    assert_eq!(logger.file_open_count(), 1);
}
