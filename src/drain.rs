use logger::Logger;
use record::{LogRecord, Site};
use severity::Severity;
use slog::{self, Drain, OwnedKVList, Record};

/// Lets a `Logger` back an [`slog::Logger`].
///
/// Records are filtered by the logger's threshold (`Critical` counts as
/// `Fatal` and is never filtered). Key-value pairs are discarded; only the
/// message is written. When slog captured a function name, the record
/// carries `func @ file:line`.
///
/// ```
/// #[macro_use] extern crate slog;
/// # extern crate slog_sinks;
/// # extern crate tempfile;
///
/// use slog_sinks::{Logger, Severity};
///
/// # fn main() {
/// # let dir = tempfile::tempdir().unwrap();
/// let drain = Logger::builder(dir.path().join("app.log"))
///     .level(Severity::Info)
///     .build();
///
/// let log = slog::Logger::root(drain, o!());
/// info!(log, "Hello, world!"; "ignored" => "key-value pairs");
/// # }
/// ```
///
/// [`slog::Logger`]: https://docs.rs/slog/2/slog/struct.Logger.html
impl Drain for Logger {
    type Ok = ();
    type Err = slog::Never;

    fn log(&self, record: &Record, _values: &OwnedKVList) -> Result<Self::Ok, Self::Err> {
        let severity = Severity::from_slog(record.level());

        if !self.is_enabled(severity) {
            return Ok(());
        }

        let log_record = LogRecord::new(severity, *record.msg());

        if record.function().is_empty() {
            Logger::log(self, &log_record);
        } else {
            let site = Site::at(record.function(), record.file(), record.line());
            Logger::log(self, &log_record.with_site(site));
        }

        Ok(())
    }

    #[inline]
    fn is_enabled(&self, level: slog::Level) -> bool {
        Logger::is_enabled(self, Severity::from_slog(level))
    }
}
