use facility::Facility;
use logger::Logger;
use options::Options;
use severity::Severity;
use std::borrow::Cow;
use std::ffi::{CStr, CString};
use std::fmt;
use std::io::{self, Write};
use std::panic::Location;
use std::path::{Path, PathBuf};

/// Builds a [`Logger`].
///
/// Only the log file's path is required. By default a logger writes to that
/// file alone, reopening it for every record, and only logs `Fatal`
/// records; most applications will at least want to set the `level`.
///
/// [`Logger`]: struct.Logger.html
pub struct LoggerBuilder {
    pub(crate) path: PathBuf,
    pub(crate) options: Options,
    pub(crate) level: Severity,
    pub(crate) debug_mask: u32,
    pub(crate) trace_mask: u32,
    pub(crate) facility: Facility,
    pub(crate) ident: Option<Cow<'static, CStr>>,
    pub(crate) init_site: Cow<'static, str>,
    pub(crate) stderr: Box<dyn Write + Send>,
}

impl LoggerBuilder {
    /// Makes a new `LoggerBuilder` for a log file at `path`.
    ///
    /// The path is not checked here. If the file cannot be opened for
    /// appending, records meant for it are dropped.
    ///
    /// The source file this is called from becomes the init site: its
    /// directory is stripped from source paths in trace output. See
    /// [`init_site`](#method.init_site).
    #[track_caller]
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        LoggerBuilder {
            path: path.as_ref().to_path_buf(),
            options: Options::default(),
            level: Severity::default(),
            debug_mask: 0,
            trace_mask: 0,
            facility: Facility::default(),
            ident: None,
            init_site: Cow::Borrowed(Location::caller().file()),
            stderr: Box::new(io::stderr()),
        }
    }

    /// Replaces all options at once.
    ///
    /// The default is [`Options::FILE`].
    ///
    /// [`Options::FILE`]: struct.Options.html#associatedconstant.FILE
    pub fn options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Keeps the log file open between records, and opens the log file and
    /// syslog session (whichever are enabled) when the logger is built.
    #[inline]
    pub fn keep_file_open(mut self) -> Self {
        self.options.insert(Options::KEEP_FILE_OPEN);
        self
    }

    /// Flushes the log file after every record.
    #[inline]
    pub fn flush_file(mut self) -> Self {
        self.options.insert(Options::FLUSH_FILE);
        self
    }

    /// Does not write to the log file.
    #[inline]
    pub fn without_file(mut self) -> Self {
        self.options.remove(Options::FILE);
        self
    }

    /// Also submits records to syslog.
    #[inline]
    pub fn syslog(mut self) -> Self {
        self.options.insert(Options::SYSLOG);
        self
    }

    /// Also writes records to standard error.
    #[inline]
    pub fn stderr(mut self) -> Self {
        self.options.insert(Options::STDERR);
        self
    }

    /// Includes milliseconds in timestamps.
    #[inline]
    pub fn milliseconds(mut self) -> Self {
        self.options.insert(Options::MILLISECONDS);
        self
    }

    /// Sets the severity threshold.
    ///
    /// By default, this is [`Severity::Fatal`].
    ///
    /// [`Severity::Fatal`]: enum.Severity.html#variant.Fatal
    pub fn level(mut self, level: Severity) -> Self {
        self.level = level;
        self
    }

    /// Sets the debug feature mask. By default no features are enabled.
    pub fn debug_mask(mut self, mask: u32) -> Self {
        self.debug_mask = mask;
        self
    }

    /// Sets the trace feature mask. By default no features are enabled.
    pub fn trace_mask(mut self, mask: u32) -> Self {
        self.trace_mask = mask;
        self
    }

    /// Sets the syslog facility to send records to.
    ///
    /// By default, this is [`Facility::Daemon`].
    ///
    /// [`Facility::Daemon`]: enum.Facility.html#variant.Daemon
    pub fn facility(mut self, facility: Facility) -> Self {
        self.facility = facility;
        self
    }

    /// Sets the name of this program, for inclusion with syslog messages.
    /// (POSIX calls this the “tag”.)
    ///
    /// If a name is not given, the libc implementation picks one; most use
    /// the process name.
    ///
    /// The string must stay available until `closelog` is called, which
    /// happens when the `Logger` is closed. Taking either an owned string or
    /// a `'static` one guarantees that.
    ///
    /// ```
    /// use slog_sinks::LoggerBuilder;
    /// use std::ffi::CStr;
    ///
    /// let builder = LoggerBuilder::new("app.log")
    ///     .syslog()
    ///     .ident(CStr::from_bytes_with_nul(b"example-app\0").unwrap());
    /// ```
    pub fn ident<S: Into<Cow<'static, CStr>>>(mut self, ident: S) -> Self {
        self.ident = Some(ident.into());
        self
    }

    /// Sets the program name from an ordinary Rust string, such as one read
    /// from a configuration file. See [`ident`](#method.ident).
    ///
    /// # Panics
    ///
    /// This method panics if the supplied string contains any null bytes.
    pub fn ident_str<S: AsRef<str>>(self, ident: S) -> Self {
        let cs = CString::new(ident.as_ref())
            .expect("`LoggerBuilder::ident_str` called with string that contains null bytes");

        self.ident(Cow::Owned(cs))
    }

    /// Overrides the init site. Its directory part (up to the last `/` or
    /// `\`) is stripped from the front of source paths in trace output.
    pub fn init_site<S: Into<Cow<'static, str>>>(mut self, init_site: S) -> Self {
        self.init_site = init_site.into();
        self
    }

    /// Sends what would go to standard error to `writer` instead.
    pub fn stderr_writer<W: Write + Send + 'static>(mut self, writer: W) -> Self {
        self.stderr = Box::new(writer);
        self
    }

    /// Builds a `Logger` from the settings provided.
    pub fn build(self) -> Logger {
        Logger::from_builder(self)
    }
}

impl fmt::Debug for LoggerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("LoggerBuilder")
            .field("path", &self.path)
            .field("options", &self.options)
            .field("level", &self.level)
            .field("debug_mask", &self.debug_mask)
            .field("trace_mask", &self.trace_mask)
            .field("facility", &self.facility)
            .field("ident", &self.ident)
            .field("init_site", &self.init_site)
            .finish()
    }
}

#[test]
fn test_builder_flags() {
    let builder = LoggerBuilder::new("unit.log")
        .without_file()
        .stderr()
        .milliseconds()
        .keep_file_open()
        .flush_file()
        .syslog();

    assert_eq!(
        builder.options,
        Options::STDERR | Options::MILLISECONDS | Options::KEEP_FILE_OPEN | Options::FLUSH_FILE | Options::SYSLOG
    );
    assert_eq!(builder.path, PathBuf::from("unit.log"));
}

#[test]
fn test_builder_defaults() {
    let builder = LoggerBuilder::new("unit.log").ident_str("unit");

    assert_eq!(builder.options, Options::FILE);
    assert_eq!(builder.level, Severity::Fatal);
    assert_eq!(builder.facility, Facility::Daemon);
    assert_eq!(builder.init_site, file!());
    assert_eq!(builder.ident.as_ref().map(|s| s.to_bytes()), Some(&b"unit"[..]));
}
