//! Stand-ins for the libc syslog functions, used by unit tests. Every call is
//! recorded as an `Event` instead of reaching the system logger.

use libc::{c_char, c_int};
use std::ffi::CStr;
use std::sync::{Mutex, MutexGuard};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Event {
    OpenLog {
        ident: Option<String>,
        flags: c_int,
        facility: c_int,
    },
    SysLog {
        priority: c_int,
        message_f: String,
        message: String,
    },
    CloseLog,
}

lazy_static! {
    static ref EVENTS: Mutex<Vec<Event>> = Mutex::new(Vec::new());

    /// Held for the duration of `testing`, so that tests touching syslog do
    /// not see each other's events.
    static ref TESTING: Mutex<()> = Mutex::new(());
}

fn events() -> MutexGuard<'static, Vec<Event>> {
    EVENTS.lock().unwrap_or_else(|e| e.into_inner())
}

pub fn push_event(event: Event) {
    events().push(event);
}

unsafe fn string_at(s: *const c_char) -> String {
    String::from(CStr::from_ptr(s).to_string_lossy())
}

pub unsafe fn openlog(ident: *const c_char, flags: c_int, facility: c_int) {
    let ident = if ident.is_null() { None } else { Some(string_at(ident)) };
    push_event(Event::OpenLog { ident, flags, facility });
}

pub unsafe fn syslog(priority: c_int, message_f: *const c_char, message: *const c_char) {
    push_event(Event::SysLog {
        priority,
        message_f: string_at(message_f),
        message: string_at(message),
    });
}

pub unsafe fn closelog() {
    push_event(Event::CloseLog);
}

/// Runs `f` with a clean event log and returns what it recorded.
pub fn testing<F: FnOnce() -> R, R>(f: F) -> (R, Vec<Event>) {
    let _guard = TESTING.lock().unwrap_or_else(|e| e.into_inner());
    events().clear();

    let result = f();

    let recorded = ::std::mem::replace(&mut *events(), Vec::new());
    (result, recorded)
}

/// Only the `SysLog` events, as `(priority, message)` pairs.
pub fn messages(events: &[Event]) -> Vec<(c_int, String)> {
    events.iter()
        .filter_map(|event| match *event {
            Event::SysLog { priority, ref message, .. } => Some((priority, message.clone())),
            _ => None,
        })
        .collect()
}
