//! Rendering of log lines.
//!
//! A rendered line looks like
//!
//! ```text
//! 2019-03-07 04:05:06.042 (4711) [INFO] message
//! 2019-03-07 04:05:06.042 (4711) [SQL] query @ db.rs:88 message
//! 2019-03-07 04:05:06.042 (4711) >>>> Parser::parse @ parser.rs:12 message
//! ```
//!
//! The timestamp and thread id are only useful to the file and stderr sinks.
//! Syslog keeps its own timestamps, so [`write_line`] reports where the part
//! after them starts.
//!
//! [`write_line`]: fn.write_line.html

use record::LogRecord;
use std::io::{self, Write};
use timestamp::Timestamp;

/// The directory part of `init_site`, including the trailing separator.
///
/// Both `/` and `\` count as separators, whichever comes last wins. A path
/// without separators yields an empty prefix.
///
/// ```
/// use slog_sinks::format::base_prefix;
///
/// assert_eq!(base_prefix("/a/b/c/init.rs"), "/a/b/c/");
/// assert_eq!(base_prefix("C:\\src\\main.rs"), "C:\\src\\");
/// assert_eq!(base_prefix("main.rs"), "");
/// ```
pub fn base_prefix(init_site: &str) -> &str {
    match init_site.rfind(|c: char| c == '/' || c == '\\') {
        Some(i) => &init_site[..i + 1],
        None => "",
    }
}

/// Removes `prefix` from the front of `file` if the whole prefix matches.
/// Anything else, including `None`, is returned unchanged.
pub fn strip_base_prefix<'a>(file: Option<&'a str>, prefix: &str) -> Option<&'a str> {
    file.map(|file| {
        if prefix.is_empty() {
            file
        } else if file.starts_with(prefix) {
            &file[prefix.len()..]
        } else {
            file
        }
    })
}

/// Skips a leading run of decimal digits, the length prefix that some C++
/// ABIs put in front of type names (`7MyClass` becomes `MyClass`).
///
/// Names without leading digits, names made only of digits, and `None` are
/// returned unchanged.
pub fn demangle(name: Option<&str>) -> Option<&str> {
    name.map(|name| {
        let rest = name.trim_start_matches(|c: char| c.is_ascii_digit());
        if rest.is_empty() { name } else { rest }
    })
}

/// Drops the module path from a Rust type name, as produced by
/// `std::any::type_name`. Generic arguments are left alone.
///
/// ```
/// use slog_sinks::format::short_type_name;
///
/// assert_eq!(short_type_name("my_app::parser::Parser"), "Parser");
/// assert_eq!(short_type_name("alloc::vec::Vec<my_app::Row>"), "Vec<my_app::Row>");
/// ```
pub fn short_type_name(full: &str) -> &str {
    let head_end = full.find('<').unwrap_or(full.len());
    match full[..head_end].rfind("::") {
        Some(i) => &full[i + 2..],
        None => full,
    }
}

/// Writes one complete line for `record` (newline included) into `buf`.
///
/// Returns the byte offset, relative to where writing started, at which
/// the label begins. Everything before it is the timestamp and thread id.
pub fn write_line(
    buf: &mut Vec<u8>,
    timestamp: Timestamp,
    thread_id: u64,
    record: &LogRecord,
    base_prefix: &str,
) -> usize {
    let start = buf.len();

    assert_format_success(write!(buf, "{} ({}) ", timestamp, thread_id));
    let label_at = buf.len() - start;

    // Fails only if a `Display` impl in the message does. Whatever was
    // written up to that point is kept.
    let _ = write_body(&mut *buf, record, base_prefix);
    buf.push(b'\n');

    label_at
}

/// Panics on I/O error, but only in debug builds.
///
/// Used for `io::Write`s into a `Vec`, which should never fail.
#[inline]
fn assert_format_success(result: io::Result<()>) {
    debug_assert!(result.is_ok(), "unexpected formatting error");
}

fn write_body<W: Write>(mut w: W, record: &LogRecord, base_prefix: &str) -> io::Result<()> {
    write!(w, "{}", record.label())?;

    if let Some(site) = record.site() {
        let file = strip_base_prefix(Some(site.file()), base_prefix).unwrap_or("");

        match demangle(site.type_name()) {
            Some(type_name) => write!(w, " {}::{} @ {}:{}", type_name, site.func(), file, site.line())?,
            None => write!(w, " {} @ {}:{}", site.func(), file, site.line())?,
        }
    }

    write!(w, " {}", record.args())
}

#[cfg(test)]
use record::{Label, Site};
#[cfg(test)]
use severity::Severity;

#[cfg(test)]
fn render(record: &LogRecord, base_prefix: &str) -> (String, usize) {
    use chrono::NaiveDate;

    let time = NaiveDate::from_ymd_opt(2019, 3, 7)
        .and_then(|d| d.and_hms_milli_opt(4, 5, 6, 42))
        .expect("valid test date");

    let mut buf = Vec::new();
    let label_at = write_line(&mut buf, Timestamp::at(time, true), 4711, record, base_prefix);
    (String::from_utf8(buf).expect("utf-8 line"), label_at)
}

#[test]
fn test_strip_base_prefix() {
    let prefix = base_prefix("/a/b/c/init.ext");
    assert_eq!(strip_base_prefix(Some("/a/b/c/other.ext"), prefix), Some("other.ext"));
    assert_eq!(strip_base_prefix(Some("/a/b/c/d/deep.ext"), prefix), Some("d/deep.ext"));
    assert_eq!(strip_base_prefix(Some("/a/x/other.ext"), prefix), Some("/a/x/other.ext"));
    assert_eq!(strip_base_prefix(Some("/a/b/c/other.ext"), ""), Some("/a/b/c/other.ext"));
    assert_eq!(strip_base_prefix(None, prefix), None);
}

#[test]
fn test_base_prefix_mixed_separators() {
    assert_eq!(base_prefix("C:\\work/src\\lib.rs"), "C:\\work/src\\");
    assert_eq!(base_prefix("C:\\work\\src/lib.rs"), "C:\\work\\src/");
    assert_eq!(base_prefix("/"), "/");
}

#[test]
fn test_demangle() {
    assert_eq!(demangle(Some("7MyClass")), Some("MyClass"));
    assert_eq!(demangle(Some("N3foo3BarE")), Some("N3foo3BarE"));
    assert_eq!(demangle(Some("MyClass")), Some("MyClass"));
    assert_eq!(demangle(Some("12345")), Some("12345"));
    assert_eq!(demangle(None), None);
}

#[test]
fn test_write_line_plain() {
    let (line, label_at) = render(&LogRecord::new(Severity::Info, format_args!("x={}", 5)), "");
    assert_eq!(line, "2019-03-07 04:05:06.042 (4711) [INFO] x=5\n");
    assert_eq!(&line[label_at..], "[INFO] x=5\n");
}

#[test]
fn test_write_line_function_site() {
    let (line, _) = render(
        &LogRecord::new(Severity::Trace, format_args!("start"))
            .with_label(Label::Enter)
            .with_site(Site::at("run", "/src/app/main.rs", 12)),
        "/src/app/",
    );
    assert_eq!(line, "2019-03-07 04:05:06.042 (4711) >>>> run @ main.rs:12 start\n");
}

#[test]
fn test_write_line_member_site() {
    let (line, label_at) = render(
        &LogRecord::new(Severity::Trace, format_args!("done"))
            .with_label(Label::Exit)
            .with_site(Site::at("draw", "/elsewhere/widget.rs", 40).with_type("6Widget")),
        "/src/app/",
    );
    assert_eq!(line, "2019-03-07 04:05:06.042 (4711) <<<< Widget::draw @ /elsewhere/widget.rs:40 done\n");
    assert_eq!(label_at, "2019-03-07 04:05:06.042 (4711) ".len());
}

#[test]
fn test_label_offset_tracks_thread_id_width() {
    let time = ::chrono::NaiveDate::from_ymd_opt(2019, 3, 7)
        .and_then(|d| d.and_hms_opt(4, 5, 6))
        .expect("valid test date");

    for &tid in [7u64, 4711, 123_456_789].iter() {
        let mut buf = b"junk".to_vec();
        let label_at = write_line(
            &mut buf,
            Timestamp::at(time, false),
            tid,
            &LogRecord::new(Severity::Warn, format_args!("w")),
            "",
        );
        assert_eq!(&buf[4 + label_at..], &b"[WARN] w\n"[..]);
    }
}
