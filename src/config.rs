//! Configuring a [`Logger`] from a configuration file using [serde].
//! Requires Cargo feature `serde`.
//!
//! ```
//! # extern crate slog_sinks;
//! # extern crate toml;
//! use slog_sinks::{Facility, Severity};
//! use slog_sinks::config::LoggerConfig;
//!
//! # const TOML_CONFIG: &'static str = r#"
//! path = "/var/log/app.log"
//! level = "info"
//! stderr = true
//! syslog = true
//! facility = "local0"
//! # "#;
//! #
//! # let config: LoggerConfig = toml::de::from_str(TOML_CONFIG).expect("deserialization failed");
//! # assert_eq!(config.level, Severity::Info);
//! # assert_eq!(config.facility, Facility::Local0);
//! # assert!(config.file);
//! ```
//!
//! [serde]: https://serde.rs/
//! [`Logger`]: ../struct.Logger.html

use ::{Facility, Logger, LoggerBuilder, Options, Severity};
use std::borrow::Cow;
use std::ffi::CStr;
use std::path::PathBuf;
#[cfg(test)] use toml;

/// Deserializable configuration for a [`Logger`].
///
/// Call the [`build`] method to create a [`Logger`] from a `LoggerConfig`.
/// Every field is optional in the configuration file.
///
/// [`build`]: #method.build
/// [`Logger`]: ../struct.Logger.html
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// The log file. Defaults to `app.log` in the working directory.
    pub path: PathBuf,

    /// The severity threshold: one of `fatal`, `error`, `warn`, `info`,
    /// `debug`, `trace`.
    pub level: Severity,

    /// The debug feature mask.
    pub debug_mask: u32,

    /// The trace feature mask.
    pub trace_mask: u32,

    /// Keep the log file (and syslog session) open between records.
    pub keep_file_open: bool,

    /// Flush the log file after every record.
    pub flush: bool,

    /// Write to the log file. Defaults to `true`.
    pub file: bool,

    /// Submit records to syslog.
    pub syslog: bool,

    /// Write records to standard error.
    pub stderr: bool,

    /// Include milliseconds in timestamps.
    pub milliseconds: bool,

    /// The syslog facility to send records to.
    pub facility: Facility,

    /// The program name for syslog messages. (POSIX calls this the “tag”.)
    ///
    /// The string must not contain any zero (ASCII NUL) bytes. If it is not
    /// given, libc picks a name, usually the process name.
    pub ident: Option<Cow<'static, CStr>>,

    #[serde(skip)]
    __non_exhaustive: (),
}

impl LoggerConfig {
    /// Creates a new `LoggerConfig` with default settings.
    pub fn new() -> Self {
        Default::default()
    }

    /// The `Options` these settings describe.
    pub fn options(&self) -> Options {
        let flags = [
            (self.keep_file_open, Options::KEEP_FILE_OPEN),
            (self.flush, Options::FLUSH_FILE),
            (self.file, Options::FILE),
            (self.syslog, Options::SYSLOG),
            (self.stderr, Options::STDERR),
            (self.milliseconds, Options::MILLISECONDS),
        ];

        flags.iter()
            .filter(|&&(set, _)| set)
            .fold(Options::empty(), |options, &(_, flag)| options | flag)
    }

    /// Creates a new `LoggerBuilder` from the settings.
    ///
    /// The init site is the caller's source file, as with
    /// [`LoggerBuilder::new`](../struct.LoggerBuilder.html#method.new).
    #[track_caller]
    pub fn into_builder(self) -> LoggerBuilder {
        let b = LoggerBuilder::new(&self.path)
            .options(self.options())
            .level(self.level)
            .debug_mask(self.debug_mask)
            .trace_mask(self.trace_mask)
            .facility(self.facility);

        match self.ident {
            Some(ident) => b.ident(ident),
            None => b,
        }
    }

    /// Creates a new `Logger` from the settings.
    #[track_caller]
    pub fn build(self) -> Logger {
        self.into_builder().build()
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        LoggerConfig {
            path: PathBuf::from("app.log"),
            level: Severity::default(),
            debug_mask: 0,
            trace_mask: 0,
            keep_file_open: false,
            flush: false,
            file: true,
            syslog: false,
            stderr: false,
            milliseconds: false,
            facility: Facility::default(),
            ident: None,
            __non_exhaustive: (),
        }
    }
}

#[test]
fn test_config() {
    const TOML_CONFIG: &'static str = r#"
path = "/tmp/test.log"
level = "warning"
debug_mask = 48
keep_file_open = true
file = false
stderr = true
milliseconds = true
ident = "foo"
facility = "local1"
"#;

    let config: LoggerConfig = toml::de::from_str(TOML_CONFIG).expect("deserialization failed");

    assert_eq!(config.path, PathBuf::from("/tmp/test.log"));
    assert_eq!(config.level, Severity::Warn);
    assert_eq!(config.debug_mask, 0x30);
    assert_eq!(config.trace_mask, 0);
    assert_eq!(config.options(), Options::KEEP_FILE_OPEN | Options::STDERR | Options::MILLISECONDS);

    let builder = config.into_builder();
    assert_eq!(builder.facility, Facility::Local1);
    assert_eq!(builder.level, Severity::Warn);
    assert_eq!(builder.ident.as_ref().map(|s| s.to_bytes()), Some(&b"foo"[..]));
    assert_eq!(builder.init_site, file!());
}

#[test]
fn test_config_defaults() {
    let config: LoggerConfig = toml::de::from_str("").expect("deserialization failed");

    assert_eq!(config.options(), Options::FILE);
    assert_eq!(config.level, Severity::Fatal);
    assert_eq!(config.facility, Facility::Daemon);
    assert!(config.ident.is_none());
}

#[test]
fn test_config_rejects_unknown_level() {
    let result: Result<LoggerConfig, _> = toml::de::from_str("level = \"loud\"");
    assert!(result.is_err());
}
