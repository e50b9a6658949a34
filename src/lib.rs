//! A process-wide, thread-safe logging core for Unix-like platforms.
//!
//! Every record funnels through one [`Logger`], which decides whether the
//! call is active (by [`Severity`] threshold and, for debug and trace
//! records, by [`Feature`] mask), renders a line with a timestamp, the
//! thread id and optional call-site metadata, and writes it to any of three
//! sinks: an append-only log file, standard error, and the system logger
//! through the [POSIX syslog API].
//!
//! ```text
//! 2019-03-07 04:05:06.042 (4711) [INFO] listening on port 8080
//! 2019-03-07 04:05:06.043 (4711) [SQL] query @ db.rs:88 rows=3
//! 2019-03-07 04:05:06.043 (4712) >>>> Parser::parse @ parser.rs:12 input=17 bytes
//! ```
//!
//! A `Logger` also implements slog's [`Drain`], so it can back an
//! `slog::Logger`.
//!
//! [`Drain`]: https://docs.rs/slog/2/slog/trait.Drain.html
//! [`Feature`]: struct.Feature.html
//! [`Logger`]: struct.Logger.html
//! [`Severity`]: enum.Severity.html
//! [POSIX syslog API]: https://pubs.opengroup.org/onlinepubs/9699919799/functions/closelog.html
//!
//! # Example
//!
//! ```
//! # extern crate slog_sinks;
//! # extern crate tempfile;
//! use slog_sinks::{Feature, Logger, Options, Severity, Site};
//!
//! const PARSER: Feature = Feature::new("PARSER", 2);
//!
//! struct Parser;
//!
//! impl Parser {
//!     fn parse(&self, logger: &Logger, input: &str) {
//!         logger.trace_enter(Site::of::<Parser>("parse"), format_args!("input={} bytes", input.len()));
//!         logger.debug(PARSER, Site::of::<Parser>("parse"), format_args!("first={:?}", input.chars().next()));
//!         logger.trace_exit(Site::of::<Parser>("parse"), format_args!("done"));
//!     }
//! }
//!
//! # let dir = tempfile::tempdir().unwrap();
//! # let path = dir.path().join("app.log");
//! let logger = Logger::builder(&path)
//!     .options(Options::FILE | Options::KEEP_FILE_OPEN | Options::MILLISECONDS)
//!     .level(Severity::Trace)
//!     .debug_mask(PARSER.mask())
//!     .build();
//!
//! logger.info(format_args!("Hello, world!"));
//! Parser.parse(&logger, "x = 1");
//!
//! logger.close();
//! ```
//!
//! # Cargo features
//!
//! If the Cargo feature `serde` is enabled, logger settings can be loaded
//! from a configuration file using [`config::LoggerConfig`].
//!
//! [`config::LoggerConfig`]: config/struct.LoggerConfig.html
//!
//! # Concurrency
//!
//! Lines written to the log file and to standard error are serialized by one
//! lock: concurrent records never interleave, and within one record the
//! file is written before standard error. Syslog submissions happen after
//! that lock is released, so their order relative to the other sinks is not
//! defined.
//!
//! POSIX doesn't support more than one connection to the syslog server at a
//! time, and `openlog` settings are process-global. The `Logger` that opened
//! syslog last owns the connection, and closing an older one leaves it
//! alone. Still, only one `Logger` with the syslog sink enabled should exist
//! at a time, or they will keep reopening the connection under their own
//! settings; the [`global`] module is the usual way to arrange that. Libraries should not open a `Logger`
//! with syslog enabled unless told to by the application.
//!
//! [`global`]: global/index.html

#![cfg(unix)]
#![warn(missing_docs)]

extern crate chrono;
extern crate libc;

#[macro_use]
extern crate lazy_static;

#[cfg(feature = "serde")]
#[macro_use]
extern crate serde;

#[cfg_attr(test, macro_use)]
extern crate slog;

#[cfg(test)]
extern crate tempfile;

#[cfg(all(test, feature = "serde"))]
extern crate toml;

mod builder;
pub use builder::*;

#[cfg(feature = "serde")]
pub mod config;

mod drain;

mod facility;
pub use facility::*;

mod feature;
pub use feature::*;

pub mod format;

pub mod global;

mod logger;
pub use logger::*;

#[cfg(test)]
mod mock;
#[cfg(test)]
mod tests;

mod options;
pub use options::*;

mod record;
pub use record::*;

mod severity;
pub use severity::*;

pub mod syslog;

mod timestamp;
pub use timestamp::*;
