use libc::{self, c_int};
use std::error::Error;
use std::fmt::{self, Display};
use std::str::FromStr;

/// A syslog facility. Conversions are provided to and from `c_int`.
///
/// Only the facilities that every Unix-like platform provides are offered.
///
/// The default facility is [`Daemon`].
///
/// [`Daemon`]: #variant.Daemon
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Facility {
    /// Authentication, authorization, and other security-related matters.
    Auth,

    /// Daemons that don't fall into a more specific category.
    Daemon,

    /// Operating system kernel. Programs other than the kernel are
    /// typically not allowed to use it.
    Kern,

    /// Reserved for local use.
    Local0,

    /// Reserved for local use.
    Local1,

    /// Reserved for local use.
    Local2,

    /// Reserved for local use.
    Local3,

    /// Reserved for local use.
    Local4,

    /// Reserved for local use.
    Local5,

    /// Reserved for local use.
    Local6,

    /// Reserved for local use.
    Local7,

    /// Print server.
    Lpr,

    /// Mail transport and delivery agents.
    Mail,

    /// Usenet news system.
    News,

    /// Messages generated internally by the syslog daemon.
    Syslog,

    /// General user processes.
    User,

    /// Unix-to-Unix Copy system.
    Uucp,
}

static FACILITIES: [(Facility, &'static str, c_int); 17] = [
    (Facility::Auth, "auth", libc::LOG_AUTH),
    (Facility::Daemon, "daemon", libc::LOG_DAEMON),
    (Facility::Kern, "kern", libc::LOG_KERN),
    (Facility::Local0, "local0", libc::LOG_LOCAL0),
    (Facility::Local1, "local1", libc::LOG_LOCAL1),
    (Facility::Local2, "local2", libc::LOG_LOCAL2),
    (Facility::Local3, "local3", libc::LOG_LOCAL3),
    (Facility::Local4, "local4", libc::LOG_LOCAL4),
    (Facility::Local5, "local5", libc::LOG_LOCAL5),
    (Facility::Local6, "local6", libc::LOG_LOCAL6),
    (Facility::Local7, "local7", libc::LOG_LOCAL7),
    (Facility::Lpr, "lpr", libc::LOG_LPR),
    (Facility::Mail, "mail", libc::LOG_MAIL),
    (Facility::News, "news", libc::LOG_NEWS),
    (Facility::Syslog, "syslog", libc::LOG_SYSLOG),
    (Facility::User, "user", libc::LOG_USER),
    (Facility::Uucp, "uucp", libc::LOG_UUCP),
];

impl Facility {
    fn entry(&self) -> &'static (Facility, &'static str, c_int) {
        // The table lists the variants in declaration order.
        &FACILITIES[*self as usize]
    }

    /// Gets the name of this `Facility`, in lowercase.
    ///
    /// The `FromStr` implementation accepts the same names, but it is
    /// case-insensitive.
    pub fn name(&self) -> &'static str {
        self.entry().1
    }

    /// Converts a `libc::LOG_*` numeric constant to a `Facility` value.
    ///
    /// Returns `None` if the value is not one of the supported facilities.
    pub fn from_int(value: c_int) -> Option<Facility> {
        FACILITIES.iter()
            .find(|entry| entry.2 == value)
            .map(|entry| entry.0)
    }
}

impl Default for Facility {
    fn default() -> Self {
        Facility::Daemon
    }
}

impl Display for Facility {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<Facility> for c_int {
    fn from(facility: Facility) -> Self {
        facility.entry().2
    }
}

impl FromStr for Facility {
    type Err = UnknownFacilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.to_ascii_lowercase();

        FACILITIES.iter()
            .find(|entry| entry.1 == s)
            .map(|entry| entry.0)
            .ok_or(UnknownFacilityError { name: s })
    }
}

/// Indicates that `<Facility as FromStr>::from_str` was called with an unknown
/// facility name.
#[derive(Clone, Debug)]
#[cfg_attr(test, derive(Eq, PartialEq))]
pub struct UnknownFacilityError {
    name: String,
}

impl UnknownFacilityError {
    /// The unrecognized facility name.
    pub fn name(&self) -> &str {
        &*self.name
    }
}

impl Display for UnknownFacilityError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unrecognized syslog facility name `{}`", self.name)
    }
}

impl Error for UnknownFacilityError {}

#[test]
fn test_facility_from_str() {
    assert_eq!(Facility::from_str("DAEMON"), Ok(Facility::Daemon));
    assert_eq!(Facility::from_str("foobar"), Err(UnknownFacilityError { name: "foobar".to_string() }));
    assert_eq!(Facility::from_str("foobar").unwrap_err().to_string(), "unrecognized syslog facility name `foobar`");
}

#[test]
fn test_facility_table_order() {
    for (i, entry) in FACILITIES.iter().enumerate() {
        assert_eq!(entry.0 as usize, i, "{} is out of place", entry.1);
        assert_eq!(Facility::from_int(entry.2), Some(entry.0));
        assert_eq!(entry.0.name(), entry.1);
    }
    assert_eq!(c_int::from(Facility::Local3), libc::LOG_LOCAL3);
}
