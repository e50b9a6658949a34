//! The syslog sink.
//!
//! POSIX allows one connection to the system logger per process, and its
//! settings (`ident`, options, facility) live in libc globals. Every call
//! into libc's syslog functions happens while holding one process-wide lock,
//! which also records the session that last called `openlog`.
//!
//! Only that session counts as open. When another session opens, it closes
//! the connection first and takes over; the superseded session then skips
//! `closelog` when it is closed, so it cannot tear down its successor. It
//! reopens on its next submission.

use facility::Facility;
use libc::{self, c_int};
use severity::Severity;
use std::borrow::Cow;
use std::ffi::CStr;
use std::ptr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

#[cfg(not(test))]
use libc::{closelog, openlog, syslog};
#[cfg(test)]
use mock::{closelog, openlog, syslog};

lazy_static! {
    /// The id of the session whose settings libc holds, or 0 if none does.
    /// Locked around every `openlog`, `syslog` and `closelog` call.
    static ref OWNER: Mutex<usize> = Mutex::new(0);
}

static NEXT_SESSION_ID: AtomicUsize = AtomicUsize::new(1);

fn lock_owner() -> MutexGuard<'static, usize> {
    // The owner is written right after the call it describes, and none of
    // those calls panic, so a poisoned value is still accurate.
    OWNER.lock().unwrap_or_else(|e| e.into_inner())
}

/// Options passed to `openlog`: connect immediately, and fall back to the
/// console if the system logger cannot be reached.
pub const OPENLOG_OPTIONS: c_int = libc::LOG_NDELAY | libc::LOG_CONS;

/// Maps a severity to the nearest syslog severity level.
///
/// `Fatal` becomes `LOG_CRIT`; `Debug` and `Trace` both become `LOG_DEBUG`.
pub fn priority(severity: Severity) -> c_int {
    match severity {
        Severity::Fatal => libc::LOG_CRIT,
        Severity::Error => libc::LOG_ERR,
        Severity::Warn => libc::LOG_WARNING,
        Severity::Info => libc::LOG_INFO,
        _ => libc::LOG_DEBUG,
    }
}

/// A connection to the system logger, opened on first use.
#[derive(Debug)]
pub struct SyslogSession {
    id: usize,
    /// Passed to `openlog`. Must outlive libc's use of it: libc drops the
    /// pointer on `closelog` or when another session opens with its own.
    ident: Option<Cow<'static, CStr>>,
    facility: Facility,
    shut_down: AtomicBool,
}

impl SyslogSession {
    /// A closed session with the given identity and facility.
    pub fn new(ident: Option<Cow<'static, CStr>>, facility: Facility) -> SyslogSession {
        SyslogSession {
            id: NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed),
            ident,
            facility,
            shut_down: AtomicBool::new(false),
        }
    }

    /// Whether libc currently holds this session's `openlog` settings.
    pub fn is_open(&self) -> bool {
        *lock_owner() == self.id
    }

    /// Calls `openlog` unless this session is already open or has been shut
    /// down. A connection opened by another session is closed first.
    pub fn open(&self) {
        self.open_locked(&mut lock_owner());
    }

    fn open_locked(&self, owner: &mut usize) -> bool {
        if self.shut_down.load(Ordering::Acquire) {
            return false;
        }

        if *owner == self.id {
            return true;
        }

        // With a null ident, libc would otherwise keep the previous
        // session's pointer.
        if *owner != 0 {
            unsafe { closelog(); }
        }

        let ident = match self.ident {
            Some(ref ident) => ident.as_ptr(),
            None => ptr::null(),
        };

        unsafe { openlog(ident, OPENLOG_OPTIONS, self.facility.into()); }
        *owner = self.id;
        true
    }

    /// Calls `closelog` if this session is open. Closing a closed or
    /// superseded session does nothing. The session reopens on the next
    /// submission.
    pub fn close(&self) {
        self.close_locked(&mut lock_owner());
    }

    fn close_locked(&self, owner: &mut usize) {
        if *owner == self.id {
            unsafe { closelog(); }
            *owner = 0;
        }
    }

    /// Closes the session for good: later submissions and `open` calls do
    /// nothing.
    pub fn shutdown(&self) {
        let mut owner = lock_owner();
        self.shut_down.store(true, Ordering::Release);
        self.close_locked(&mut owner);
    }

    /// Submits one message, opening the session first if needed. Does
    /// nothing after `shutdown`.
    ///
    /// `message` is consumed as scratch space: NUL bytes are removed and a
    /// terminator is appended.
    pub fn submit(&self, severity: Severity, message: &mut Vec<u8>) {
        let priority = priority(severity) | c_int::from(self.facility);
        let message = make_cstr_lossy(message);

        let mut owner = lock_owner();
        if !self.open_locked(&mut owner) {
            return;
        }

        unsafe {
            syslog(
                priority,
                CStr::from_bytes_with_nul_unchecked(b"%s\0").as_ptr(),
                message.as_ptr(),
            );
        }
    }
}

impl Drop for SyslogSession {
    fn drop(&mut self) {
        // libc may still hold a pointer to `ident`.
        self.close();
    }
}

/// Creates a `&CStr` from the given `Vec<u8>`, removing middle null bytes and
/// adding a null terminator as needed.
pub fn make_cstr_lossy(s: &mut Vec<u8>) -> &CStr {
    s.retain(|b| *b != 0);
    s.push(0);

    // Sound: the only NUL left is the terminator we just pushed.
    unsafe { CStr::from_bytes_with_nul_unchecked(&*s) }
}

#[cfg(test)]
use mock;

#[test]
fn test_priority_mapping() {
    assert_eq!(priority(Severity::Fatal), libc::LOG_CRIT);
    assert_eq!(priority(Severity::Error), libc::LOG_ERR);
    assert_eq!(priority(Severity::Warn), libc::LOG_WARNING);
    assert_eq!(priority(Severity::Info), libc::LOG_INFO);
    assert_eq!(priority(Severity::Debug), libc::LOG_DEBUG);
    assert_eq!(priority(Severity::Trace), libc::LOG_DEBUG);
}

#[test]
fn test_make_cstr_lossy() {
    let mut buf = b"a\0b\0c".to_vec();
    assert_eq!(make_cstr_lossy(&mut buf).to_bytes(), b"abc");
}

#[test]
fn test_session_lifecycle() {
    let ((), events) = mock::testing(|| {
        let session = SyslogSession::new(
            Some(Cow::Borrowed(CStr::from_bytes_with_nul(b"unit\0").expect("valid C string"))),
            Facility::Local2,
        );
        assert!(!session.is_open());

        session.submit(Severity::Warn, &mut b"first".to_vec());
        session.submit(Severity::Trace, &mut b"second".to_vec());
        assert!(session.is_open());

        session.close();
        session.close();
        assert!(!session.is_open());
    });

    assert_eq!(events, vec![
        mock::Event::OpenLog {
            ident: Some("unit".to_string()),
            flags: libc::LOG_NDELAY | libc::LOG_CONS,
            facility: libc::LOG_LOCAL2,
        },
        mock::Event::SysLog {
            priority: libc::LOG_WARNING | libc::LOG_LOCAL2,
            message_f: "%s".to_string(),
            message: "first".to_string(),
        },
        mock::Event::SysLog {
            priority: libc::LOG_DEBUG | libc::LOG_LOCAL2,
            message_f: "%s".to_string(),
            message: "second".to_string(),
        },
        mock::Event::CloseLog,
    ]);
}

#[test]
fn test_session_closed_on_drop() {
    let ((), events) = mock::testing(|| {
        let session = SyslogSession::new(None, Facility::default());
        session.open();
        session.open();
    });

    assert_eq!(events, vec![
        mock::Event::OpenLog {
            ident: None,
            flags: OPENLOG_OPTIONS,
            facility: libc::LOG_DAEMON,
        },
        mock::Event::CloseLog,
    ]);
}

#[test]
fn test_newer_session_takes_over() {
    let ((), events) = mock::testing(|| {
        let old = SyslogSession::new(
            Some(Cow::Borrowed(CStr::from_bytes_with_nul(b"old\0").expect("valid C string"))),
            Facility::Local0,
        );
        let new = SyslogSession::new(
            Some(Cow::Borrowed(CStr::from_bytes_with_nul(b"new\0").expect("valid C string"))),
            Facility::Local1,
        );

        old.open();
        new.open();
        assert!(!old.is_open());
        assert!(new.is_open());

        // The superseded session must leave its successor's connection alone.
        old.close();
        drop(old);
        assert!(new.is_open());

        new.submit(Severity::Info, &mut b"still here".to_vec());
        new.close();
        assert!(!new.is_open());
    });

    assert_eq!(events, vec![
        mock::Event::OpenLog { ident: Some("old".to_string()), flags: OPENLOG_OPTIONS, facility: libc::LOG_LOCAL0 },
        mock::Event::CloseLog,
        mock::Event::OpenLog { ident: Some("new".to_string()), flags: OPENLOG_OPTIONS, facility: libc::LOG_LOCAL1 },
        mock::Event::SysLog {
            priority: libc::LOG_INFO | libc::LOG_LOCAL1,
            message_f: "%s".to_string(),
            message: "still here".to_string(),
        },
        mock::Event::CloseLog,
    ]);
}

#[test]
fn test_superseded_session_reopens_on_submit() {
    let ((), events) = mock::testing(|| {
        let first = SyslogSession::new(None, Facility::User);
        let second = SyslogSession::new(None, Facility::Mail);

        first.open();
        second.open();
        first.submit(Severity::Error, &mut b"back".to_vec());
        assert!(first.is_open());
        assert!(!second.is_open());

        drop(second);
        drop(first);
    });

    assert_eq!(events, vec![
        mock::Event::OpenLog { ident: None, flags: OPENLOG_OPTIONS, facility: libc::LOG_USER },
        mock::Event::CloseLog,
        mock::Event::OpenLog { ident: None, flags: OPENLOG_OPTIONS, facility: libc::LOG_MAIL },
        mock::Event::CloseLog,
        mock::Event::OpenLog { ident: None, flags: OPENLOG_OPTIONS, facility: libc::LOG_USER },
        mock::Event::SysLog {
            priority: libc::LOG_ERR | libc::LOG_USER,
            message_f: "%s".to_string(),
            message: "back".to_string(),
        },
        mock::Event::CloseLog,
    ]);
}

#[test]
fn test_shutdown_refuses_to_reopen() {
    let ((), events) = mock::testing(|| {
        let session = SyslogSession::new(None, Facility::default());
        session.submit(Severity::Warn, &mut b"before".to_vec());

        session.shutdown();
        assert!(!session.is_open());

        session.submit(Severity::Warn, &mut b"after".to_vec());
        session.open();
        assert!(!session.is_open());

        // Unlike `shutdown`, `close` allows reopening.
        let other = SyslogSession::new(None, Facility::default());
        other.submit(Severity::Warn, &mut b"one".to_vec());
        other.close();
        other.submit(Severity::Warn, &mut b"two".to_vec());
        assert!(other.is_open());
    });

    assert_eq!(mock::messages(&events), vec![
        (libc::LOG_WARNING | libc::LOG_DAEMON, "before".to_string()),
        (libc::LOG_WARNING | libc::LOG_DAEMON, "one".to_string()),
        (libc::LOG_WARNING | libc::LOG_DAEMON, "two".to_string()),
    ]);
    assert_eq!(events.iter().filter(|e| **e == mock::Event::CloseLog).count(), 3);
}
