//! The process-wide logger.
//!
//! An application opens one [`Logger`] at start-up with [`open`] (or builds
//! one and installs it with [`set`]), logs through the free functions in
//! this module from anywhere, and calls [`close`] before exiting. Until a
//! logger is installed, and after it is closed, the free functions do
//! nothing (except [`fatal_exit`], which still aborts).
//!
//! ```
//! # extern crate slog_sinks;
//! # extern crate tempfile;
//! use slog_sinks::{global, Options, Severity};
//!
//! # let dir = tempfile::tempdir().unwrap();
//! # let path = dir.path().join("app.log");
//! global::open(&path, Options::FILE | Options::MILLISECONDS);
//! global::set_level(Severity::Info);
//!
//! global::info(format_args!("started"));
//!
//! global::close();
//! ```
//!
//! Libraries should log through this module but leave opening and closing
//! it to the application.
//!
//! [`Logger`]: ../struct.Logger.html
//! [`open`]: fn.open.html
//! [`set`]: fn.set.html
//! [`close`]: fn.close.html
//! [`fatal_exit`]: fn.fatal_exit.html

use feature::Feature;
use logger::Logger;
use options::Options;
use record::Site;
use severity::Severity;
use std::fmt;
use std::path::Path;
use std::process;
use std::sync::{Arc, RwLock};

lazy_static! {
    static ref GLOBAL: RwLock<Option<Arc<Logger>>> = RwLock::new(None);
}

fn replace(logger: Option<Arc<Logger>>) -> Option<Arc<Logger>> {
    let mut global = GLOBAL.write().unwrap_or_else(|e| e.into_inner());
    ::std::mem::replace(&mut *global, logger)
}

/// Opens a logger writing to `path` and installs it.
///
/// The caller's source file is the init site for path shortening. A
/// previously installed logger is closed.
#[track_caller]
pub fn open<P: AsRef<Path>>(path: P, options: Options) -> Arc<Logger> {
    set(Logger::open(path, options))
}

/// Installs `logger` as the process-wide logger and returns a handle to it.
/// A previously installed logger is closed. If both have syslog enabled, the
/// new logger's session has already taken over and stays open.
pub fn set(logger: Logger) -> Arc<Logger> {
    let logger = Arc::new(logger);

    if let Some(previous) = replace(Some(logger.clone())) {
        previous.close();
    }

    logger
}

/// The installed logger, if any.
pub fn get() -> Option<Arc<Logger>> {
    GLOBAL.read().unwrap_or_else(|e| e.into_inner()).clone()
}

/// Closes and uninstalls the process-wide logger. Does nothing if none is
/// installed.
pub fn close() {
    if let Some(logger) = replace(None) {
        logger.close();
    }
}

// The lock is released before logging, so a message's `Display` impl may
// itself log, and `fatal_exit` may close.
#[inline]
fn with<F: FnOnce(&Logger)>(f: F) {
    if let Some(logger) = get() {
        f(&logger);
    }
}

/// Sets the installed logger's severity threshold.
pub fn set_level(level: Severity) {
    with(|logger| logger.set_level(level));
}

/// Replaces the installed logger's debug mask.
pub fn set_debug_mask(mask: u32) {
    with(|logger| logger.set_debug_mask(mask));
}

/// Replaces the installed logger's trace mask.
pub fn set_trace_mask(mask: u32) {
    with(|logger| logger.set_trace_mask(mask));
}

/// Turns on debug records for `feature`.
pub fn enable_debug(feature: Feature) {
    with(|logger| logger.enable_debug(feature));
}

/// Turns off debug records for `feature`.
pub fn disable_debug(feature: Feature) {
    with(|logger| logger.disable_debug(feature));
}

/// Turns on feature-gated trace records for `feature`.
pub fn enable_trace(feature: Feature) {
    with(|logger| logger.enable_trace(feature));
}

/// Turns off feature-gated trace records for `feature`.
pub fn disable_trace(feature: Feature) {
    with(|logger| logger.disable_trace(feature));
}

/// Whether the installed logger admits records of `severity`. False when
/// no logger is installed.
pub fn is_enabled(severity: Severity) -> bool {
    get().map_or(false, |logger| logger.is_enabled(severity))
}

/// See [`Logger::fatal`](../struct.Logger.html#method.fatal).
pub fn fatal(args: fmt::Arguments) {
    with(|logger| logger.fatal(args));
}

/// Logs a `Fatal` record, closes the process-wide logger, and aborts.
pub fn fatal_exit(args: fmt::Arguments) -> ! {
    fatal(args);
    close();
    process::abort()
}

/// See [`Logger::error`](../struct.Logger.html#method.error).
pub fn error(args: fmt::Arguments) {
    with(|logger| logger.error(args));
}

/// See [`Logger::warn`](../struct.Logger.html#method.warn).
pub fn warn(args: fmt::Arguments) {
    with(|logger| logger.warn(args));
}

/// See [`Logger::info`](../struct.Logger.html#method.info).
pub fn info(args: fmt::Arguments) {
    with(|logger| logger.info(args));
}

/// See [`Logger::debug`](../struct.Logger.html#method.debug).
pub fn debug(feature: Feature, site: Site, args: fmt::Arguments) {
    with(|logger| logger.debug(feature, site, args));
}

/// See [`Logger::trace`](../struct.Logger.html#method.trace).
pub fn trace(feature: Feature, site: Site, args: fmt::Arguments) {
    with(|logger| logger.trace(feature, site, args));
}

/// See [`Logger::trace_enter`](../struct.Logger.html#method.trace_enter).
pub fn trace_enter(site: Site, args: fmt::Arguments) {
    with(|logger| logger.trace_enter(site, args));
}

/// See [`Logger::trace_exit`](../struct.Logger.html#method.trace_exit).
pub fn trace_exit(site: Site, args: fmt::Arguments) {
    with(|logger| logger.trace_exit(site, args));
}

/// See [`Logger::trace_enter_if`](../struct.Logger.html#method.trace_enter_if).
pub fn trace_enter_if(feature: Feature, site: Site, args: fmt::Arguments) {
    with(|logger| logger.trace_enter_if(feature, site, args));
}

/// See [`Logger::trace_exit_if`](../struct.Logger.html#method.trace_exit_if).
pub fn trace_exit_if(feature: Feature, site: Site, args: fmt::Arguments) {
    with(|logger| logger.trace_exit_if(feature, site, args));
}
