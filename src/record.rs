use feature::Feature;
use format::short_type_name;
use severity::Severity;
use std::any;
use std::fmt::{self, Display};
use std::panic::Location;

/// The tag that follows the thread id in a rendered line.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Label {
    /// `[ERROR]`, `[INFO]`, and so on.
    Severity(Severity),

    /// The feature's name in brackets, like `[SQL]`.
    Feature(Feature),

    /// Function entry marker, `>>>>`.
    Enter,

    /// Function exit marker, `<<<<`.
    Exit,
}

impl Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Label::Severity(severity) => f.write_str(severity.label()),
            Label::Feature(feature) => write!(f, "[{}]", feature.name()),
            Label::Enter => f.write_str(">>>>"),
            Label::Exit => f.write_str("<<<<"),
        }
    }
}

/// Where a tracing or debugging call was made: a function name, optionally
/// the type that function belongs to, and the source file and line.
///
/// The constructors are `#[track_caller]`, so the file and line are those of
/// the code that builds the `Site`:
///
/// ```
/// use slog_sinks::Site;
///
/// struct Parser;
///
/// let site = Site::of::<Parser>("parse");
/// assert_eq!(site.type_name(), Some("Parser"));
/// assert_eq!(site.func(), "parse");
/// assert!(site.file().ends_with(".rs"));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Site<'a> {
    type_name: Option<&'a str>,
    func: &'a str,
    file: &'a str,
    line: u32,
}

impl<'a> Site<'a> {
    /// A free function called `func`, located at the caller.
    #[track_caller]
    pub fn new(func: &'a str) -> Site<'a> {
        let location = Location::caller();
        Site::at(func, location.file(), location.line())
    }

    /// The method `func` of the type named `type_name`, located at the
    /// caller.
    ///
    /// `type_name` is demangled when rendered: a leading run of decimal
    /// digits (as emitted by some C++ ABIs) is skipped.
    #[track_caller]
    pub fn member(type_name: &'a str, func: &'a str) -> Site<'a> {
        Site::new(func).with_type(type_name)
    }

    /// The method `func` of type `T`, located at the caller. The type's
    /// module path is dropped.
    #[track_caller]
    pub fn of<T: ?Sized>(func: &'a str) -> Site<'a> {
        Site::new(func).with_type(short_type_name(any::type_name::<T>()))
    }

    /// A site with an explicit file and line.
    pub fn at(func: &'a str, file: &'a str, line: u32) -> Site<'a> {
        Site {
            type_name: None,
            func,
            file,
            line,
        }
    }

    /// Sets the owning type's name.
    pub fn with_type(mut self, type_name: &'a str) -> Site<'a> {
        self.type_name = Some(type_name);
        self
    }

    /// The owning type's name, if any, as given.
    pub fn type_name(&self) -> Option<&'a str> {
        self.type_name
    }

    /// The function name.
    pub fn func(&self) -> &'a str {
        self.func
    }

    /// The source file, as given (not shortened).
    pub fn file(&self) -> &'a str {
        self.file
    }

    /// The source line.
    pub fn line(&self) -> u32 {
        self.line
    }
}

/// One log event, built and consumed within a single call to
/// [`Logger::log`].
///
/// The message is kept as unformatted [`fmt::Arguments`]; it is only
/// rendered if the record reaches a sink.
///
/// [`fmt::Arguments`]: https://doc.rust-lang.org/std/fmt/struct.Arguments.html
/// [`Logger::log`]: struct.Logger.html#method.log
#[derive(Clone, Copy, Debug)]
pub struct LogRecord<'a> {
    severity: Severity,
    label: Label,
    site: Option<Site<'a>>,
    args: fmt::Arguments<'a>,
}

impl<'a> LogRecord<'a> {
    /// A record with no call-site metadata, labelled with its severity.
    pub fn new(severity: Severity, args: fmt::Arguments<'a>) -> LogRecord<'a> {
        LogRecord {
            severity,
            label: Label::Severity(severity),
            site: None,
            args,
        }
    }

    /// Replaces the label.
    pub fn with_label(mut self, label: Label) -> LogRecord<'a> {
        self.label = label;
        self
    }

    /// Attaches call-site metadata.
    pub fn with_site(mut self, site: Site<'a>) -> LogRecord<'a> {
        self.site = Some(site);
        self
    }

    /// The record's severity.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// The record's label.
    pub fn label(&self) -> Label {
        self.label
    }

    /// The call site, if one was attached.
    pub fn site(&self) -> Option<&Site<'a>> {
        self.site.as_ref()
    }

    /// The unformatted message.
    pub fn args(&self) -> &fmt::Arguments<'a> {
        &self.args
    }
}

#[test]
fn test_label_display() {
    const SQL: Feature = Feature::new("SQL", 7);

    assert_eq!(Label::Severity(Severity::Warn).to_string(), "[WARN]");
    assert_eq!(Label::Feature(SQL).to_string(), "[SQL]");
    assert_eq!(Label::Enter.to_string(), ">>>>");
    assert_eq!(Label::Exit.to_string(), "<<<<");
}

#[test]
fn test_site_captures_caller() {
    let line = line!() + 1;
    let site = Site::new("connect");
    assert_eq!(site.file(), file!());
    assert_eq!(site.line(), line);
    assert_eq!(site.type_name(), None);

    let member = Site::member("7Widget", "draw");
    assert_eq!(member.type_name(), Some("7Widget"));
    assert_eq!(member.func(), "draw");
}

#[test]
fn test_site_of_type() {
    struct Widget;

    assert_eq!(Site::of::<Widget>("draw").type_name(), Some("Widget"));
    assert_eq!(Site::of::<Vec<u8>>("push").type_name(), Some("Vec<u8>"));
}

#[test]
fn test_record_builders() {
    fn check(record: LogRecord, site: Site) {
        assert_eq!(record.severity(), Severity::Debug);
        assert_eq!(record.label(), Label::Enter);
        assert_eq!(record.site(), Some(&site));
        assert_eq!(record.args().to_string(), "x=5");
    }

    let site = Site::at("main", "src/main.rs", 10);
    check(
        LogRecord::new(Severity::Debug, format_args!("x={}", 5))
            .with_label(Label::Enter)
            .with_site(site),
        site,
    );
}
