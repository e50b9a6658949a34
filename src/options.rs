use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign, Not};

/// Sink and formatting switches for a [`Logger`].
///
/// `Options` values combine with `|`. The default is [`FILE`] alone, which
/// writes to the log file, closing it after every record.
///
/// ```
/// use slog_sinks::Options;
///
/// let options = Options::FILE | Options::STDERR | Options::MILLISECONDS;
/// assert!(options.contains(Options::STDERR));
/// assert!(!options.contains(Options::SYSLOG));
/// ```
///
/// [`FILE`]: #associatedconstant.FILE
/// [`Logger`]: struct.Logger.html
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct Options(u32);

impl Options {
    /// Keep the log file (and syslog session) open between records instead
    /// of reopening it every time.
    pub const KEEP_FILE_OPEN: Options = Options(1 << 0);

    /// Flush the log file after every record.
    pub const FLUSH_FILE: Options = Options(1 << 1);

    /// Write records to the log file.
    pub const FILE: Options = Options(1 << 2);

    /// Submit records to the system logger.
    pub const SYSLOG: Options = Options(1 << 3);

    /// Write records to the standard error stream.
    pub const STDERR: Options = Options(1 << 4);

    /// Include milliseconds in timestamps.
    pub const MILLISECONDS: Options = Options(1 << 5);

    const ALL: u32 = (1 << 6) - 1;

    /// No options at all. A logger with empty options discards everything.
    #[inline]
    pub const fn empty() -> Options {
        Options(0)
    }

    /// The raw bit pattern.
    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Converts a raw bit pattern, dropping unknown bits.
    #[inline]
    pub const fn from_bits_truncate(bits: u32) -> Options {
        Options(bits & Options::ALL)
    }

    /// Whether every bit of `other` is set in `self`.
    #[inline]
    pub fn contains(self, other: Options) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether any bit of `other` is set in `self`.
    #[inline]
    pub fn intersects(self, other: Options) -> bool {
        self.0 & other.0 != 0
    }

    /// Sets the bits of `other`.
    #[inline]
    pub fn insert(&mut self, other: Options) {
        self.0 |= other.0;
    }

    /// Clears the bits of `other`.
    #[inline]
    pub fn remove(&mut self, other: Options) {
        self.0 &= !other.0;
    }
}

impl Default for Options {
    fn default() -> Self {
        Options::FILE
    }
}

impl BitOr for Options {
    type Output = Options;

    fn bitor(self, rhs: Options) -> Options {
        Options(self.0 | rhs.0)
    }
}

impl BitOrAssign for Options {
    fn bitor_assign(&mut self, rhs: Options) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Options {
    type Output = Options;

    fn bitand(self, rhs: Options) -> Options {
        Options(self.0 & rhs.0)
    }
}

impl Not for Options {
    type Output = Options;

    fn not(self) -> Options {
        Options(!self.0 & Options::ALL)
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        const NAMES: [(Options, &'static str); 6] = [
            (Options::KEEP_FILE_OPEN, "KEEP_FILE_OPEN"),
            (Options::FLUSH_FILE, "FLUSH_FILE"),
            (Options::FILE, "FILE"),
            (Options::SYSLOG, "SYSLOG"),
            (Options::STDERR, "STDERR"),
            (Options::MILLISECONDS, "MILLISECONDS"),
        ];

        let mut first = true;
        for &(flag, name) in NAMES.iter() {
            if self.contains(flag) {
                if !first {
                    f.write_str(" | ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        if first {
            f.write_str("(empty)")?;
        }
        Ok(())
    }
}

#[test]
fn test_options_bits() {
    let mut options = Options::default();
    assert_eq!(options, Options::FILE);

    options |= Options::SYSLOG | Options::KEEP_FILE_OPEN;
    assert!(options.contains(Options::FILE | Options::SYSLOG));
    assert!(options.intersects(Options::SYSLOG | Options::STDERR));
    assert!(!options.contains(Options::STDERR));

    options.remove(Options::FILE);
    assert!(!options.contains(Options::FILE));
    assert_eq!(options.bits(), 0b1001);

    assert_eq!(Options::from_bits_truncate(0xffff_ffff).bits(), 0b11_1111);
    assert_eq!(!Options::FILE & Options::FILE, Options::empty());
}

#[test]
fn test_options_debug() {
    assert_eq!(format!("{:?}", Options::FILE | Options::STDERR), "FILE | STDERR");
    assert_eq!(format!("{:?}", Options::empty()), "(empty)");
}
