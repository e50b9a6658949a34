use slog;
use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// The severity of a log record. Not to be confused with [`slog::Level`],
/// although there is a one-to-one mapping between the two.
///
/// Severities are ordered from most to least important. A record is emitted
/// when its severity is less than or equal to the logger's threshold, so a
/// threshold of [`Info`] lets `Fatal`, `Error`, `Warn` and `Info` records
/// through. [`Fatal`] records are never filtered.
///
/// [`Fatal`]: #variant.Fatal
/// [`Info`]: #variant.Info
/// [`slog::Level`]: https://docs.rs/slog/2/slog/enum.Level.html
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Severity {
    /// The program cannot continue.
    #[cfg_attr(feature = "serde", serde(alias = "critical"))]
    Fatal = 0,

    /// Something has definitely gone wrong.
    Error = 1,

    /// Something has probably gone wrong.
    #[cfg_attr(feature = "serde", serde(alias = "warning"))]
    Warn = 2,

    /// Normal informational messages.
    Info = 3,

    /// Feature-gated debugging output.
    Debug = 4,

    /// Feature-gated call tracing.
    Trace = 5,
}

impl Severity {
    /// Gets the name of this `Severity`, like `fatal` or `warn`.
    ///
    /// The `FromStr` implementation accepts the same names, but it is
    /// case-insensitive.
    pub fn name(&self) -> &'static str {
        match *self {
            Severity::Fatal => "fatal",
            Severity::Error => "error",
            Severity::Warn => "warn",
            Severity::Info => "info",
            Severity::Debug => "debug",
            Severity::Trace => "trace",
        }
    }

    /// The bracketed tag written into every rendered line, like `[WARN]`.
    pub fn label(&self) -> &'static str {
        match *self {
            Severity::Fatal => "[FATAL]",
            Severity::Error => "[ERROR]",
            Severity::Warn => "[WARN]",
            Severity::Info => "[INFO]",
            Severity::Debug => "[DEBUG]",
            Severity::Trace => "[TRACE]",
        }
    }

    /// Converts a numeric rank (`0` for `Fatal` through `5` for `Trace`) to a
    /// `Severity`.
    ///
    /// Returns `None` if the value is out of range.
    pub fn from_int(value: u32) -> Option<Severity> {
        match value {
            0 => Some(Severity::Fatal),
            1 => Some(Severity::Error),
            2 => Some(Severity::Warn),
            3 => Some(Severity::Info),
            4 => Some(Severity::Debug),
            5 => Some(Severity::Trace),
            _ => None,
        }
    }

    /// Like `from_int`, but out-of-range values saturate to `Trace`.
    pub(crate) fn from_int_saturating(value: u32) -> Severity {
        Severity::from_int(value).unwrap_or(Severity::Trace)
    }

    /// The numeric rank of this `Severity`.
    #[inline]
    pub fn as_int(self) -> u32 {
        self as u32
    }

    /// Maps a [`slog::Level`] to a `Severity`.
    ///
    /// [`Critical`][slog critical] becomes `Fatal`; every other level maps to
    /// the variant of the same name.
    ///
    /// [`slog::Level`]: https://docs.rs/slog/2/slog/enum.Level.html
    /// [slog critical]: https://docs.rs/slog/2/slog/enum.Level.html#variant.Critical
    pub fn from_slog(level: slog::Level) -> Self {
        match level {
            slog::Level::Critical => Severity::Fatal,
            slog::Level::Error => Severity::Error,
            slog::Level::Warning => Severity::Warn,
            slog::Level::Info => Severity::Info,
            slog::Level::Debug => Severity::Debug,
            slog::Level::Trace => Severity::Trace,
        }
    }
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Fatal
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<Severity> for slog::Level {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Fatal => slog::Level::Critical,
            Severity::Error => slog::Level::Error,
            Severity::Warn => slog::Level::Warning,
            Severity::Info => slog::Level::Info,
            Severity::Debug => slog::Level::Debug,
            Severity::Trace => slog::Level::Trace,
        }
    }
}

impl FromStr for Severity {
    type Err = UnknownSeverityError;

    fn from_str(s: &str) -> Result<Self, <Self as FromStr>::Err> {
        let s = s.to_ascii_lowercase();

        match &*s {
            "fatal" | "critical" | "crit" => Ok(Severity::Fatal),
            "error" | "err" => Ok(Severity::Error),
            "warn" | "warning" => Ok(Severity::Warn),
            "info" => Ok(Severity::Info),
            "debug" => Ok(Severity::Debug),
            "trace" => Ok(Severity::Trace),
            _ => Err(UnknownSeverityError {
                name: s,
            })
        }
    }
}

/// Indicates that `<Severity as FromStr>::from_str` was called with an
/// unknown severity name.
#[derive(Clone, Debug)]
#[cfg_attr(test, derive(Eq, PartialEq))]
pub struct UnknownSeverityError {
    name: String,
}

impl UnknownSeverityError {
    /// The unrecognized severity name.
    pub fn name(&self) -> &str {
        &*self.name
    }
}

impl Display for UnknownSeverityError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unrecognized severity name `{}`", self.name)
    }
}

impl Error for UnknownSeverityError {}

#[test]
fn test_severity_from_str() {
    assert_eq!(Severity::from_str("WARNING"), Ok(Severity::Warn));
    assert_eq!(Severity::from_str("crit"), Ok(Severity::Fatal));
    assert_eq!(Severity::from_str("verbose"), Err(UnknownSeverityError { name: "verbose".to_string() }));
    assert_eq!(Severity::from_str("verbose").unwrap_err().to_string(), "unrecognized severity name `verbose`");
}

#[test]
fn test_severity_ordering() {
    assert!(Severity::Fatal < Severity::Error);
    assert!(Severity::Debug < Severity::Trace);
    assert_eq!(Severity::from_int(Severity::Warn.as_int()), Some(Severity::Warn));
    assert_eq!(Severity::from_int(6), None);
    assert_eq!(Severity::from_int_saturating(42), Severity::Trace);
}

#[test]
fn test_severity_slog_mapping() {
    assert_eq!(Severity::from_slog(slog::Level::Critical), Severity::Fatal);
    assert_eq!(Severity::from_slog(slog::Level::Warning), Severity::Warn);
    assert_eq!(slog::Level::from(Severity::Trace), slog::Level::Trace);
}
