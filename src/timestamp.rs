//! Wall-clock timestamps and thread identities for the line prefix.

use chrono::{Local, NaiveDateTime, Timelike};
use libc;
use std::fmt::{self, Display};

/// A local wall-clock time, rendered as `YYYY-MM-DD HH:MM:SS` or, with
/// milliseconds, `YYYY-MM-DD HH:MM:SS.mmm`.
///
/// The rendering does not depend on the process locale and always has the
/// same width. Two records emitted within the same tick may carry identical
/// timestamps; their order in a sink is decided by the logger's lock alone.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Timestamp {
    time: NaiveDateTime,
    millis: bool,
}

impl Timestamp {
    /// The current time in the local timezone.
    pub fn now(millis: bool) -> Timestamp {
        Timestamp::at(Local::now().naive_local(), millis)
    }

    /// A fixed point in (already localized) time.
    pub fn at(time: NaiveDateTime, millis: bool) -> Timestamp {
        Timestamp { time, millis }
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.time.format("%Y-%m-%d %H:%M:%S"))?;

        if self.millis {
            // Leap seconds are reported with nanoseconds past 1e9.
            let ms = (self.time.nanosecond() / 1_000_000).min(999);
            write!(f, ".{:03}", ms)?;
        }

        Ok(())
    }
}

/// The OS-level identifier of the calling thread (the kernel task id on
/// Linux, not the process id and not a `pthread_t`).
///
/// Looked up on every call rather than cached, so a child process created
/// by `fork` reports its own id.
pub fn thread_id() -> u64 {
    os_thread_id()
}

#[cfg(any(target_os = "linux", target_os = "android"))]
fn os_thread_id() -> u64 {
    unsafe { libc::syscall(libc::SYS_gettid) as u64 }
}

#[cfg(any(target_os = "macos", target_os = "ios"))]
fn os_thread_id() -> u64 {
    let mut id: u64 = 0;
    unsafe { libc::pthread_threadid_np(0 as libc::pthread_t, &mut id); }
    id
}

#[cfg(not(any(
    target_os = "linux",
    target_os = "android",
    target_os = "macos",
    target_os = "ios",
)))]
fn os_thread_id() -> u64 {
    unsafe { libc::pthread_self() as usize as u64 }
}

#[cfg(test)]
fn fixed(ms: u32) -> NaiveDateTime {
    use chrono::NaiveDate;

    NaiveDate::from_ymd_opt(2019, 3, 7)
        .and_then(|d| d.and_hms_milli_opt(4, 5, 6, ms))
        .expect("valid test date")
}

#[test]
fn test_timestamp_format() {
    assert_eq!(Timestamp::at(fixed(42), false).to_string(), "2019-03-07 04:05:06");
    assert_eq!(Timestamp::at(fixed(42), true).to_string(), "2019-03-07 04:05:06.042");
    assert_eq!(Timestamp::at(fixed(0), true).to_string(), "2019-03-07 04:05:06.000");
}

#[test]
fn test_timestamp_now_width() {
    assert_eq!(Timestamp::now(false).to_string().len(), 19);
    assert_eq!(Timestamp::now(true).to_string().len(), 23);
}

#[test]
fn test_thread_id_per_thread() {
    use std::thread;

    let main_id = thread_id();
    assert_eq!(main_id, thread_id());

    let other_id = thread::spawn(thread_id).join().expect("thread panicked");
    assert_ne!(main_id, other_id);
}

#[cfg(target_os = "linux")]
#[test]
fn test_thread_id_after_fork() {
    // Looked up in the parent first, as a logging thread would have.
    let parent_id = thread_id();

    let child = unsafe { libc::fork() };
    assert!(child >= 0, "fork failed");

    if child == 0 {
        // The child's only thread has the child's pid as its task id.
        let ok = thread_id() == unsafe { libc::getpid() } as u64;
        unsafe { libc::_exit(if ok { 0 } else { 1 }); }
    }

    let mut status = 0;
    assert_eq!(unsafe { libc::waitpid(child, &mut status, 0) }, child);
    assert_eq!(status, 0, "child saw the parent's thread id");
    assert_ne!(parent_id, child as u64);
}
