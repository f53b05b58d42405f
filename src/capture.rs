//! Per-case output capture
//!
//! Test bodies write through [`outln!`](crate::outln) and
//! [`errln!`](crate::errln). While a capture scope is installed on the
//! executing thread those writes land in per-case buffers; otherwise they pass
//! through to the process streams. Capture is thread-local, so concurrently
//! running cases never see each other's text as long as each case runs wholly
//! on one thread.

use std::cell::RefCell;
use std::fmt;
use std::io::{self, Write};

#[derive(Debug, Default)]
struct Sinks {
    out: String,
    err: String,
}

thread_local! {
    static SINKS: RefCell<Option<Sinks>> = const { RefCell::new(None) };
}

/// Scoped capture of the current thread's test output.
///
/// The previously installed sinks are restored on every exit path: either by
/// [`finish`](CaptureGuard::finish) or, if the scope unwinds, by `Drop`.
#[derive(Debug)]
pub struct CaptureGuard {
    prev: Option<Sinks>,
    finished: bool,
}

impl CaptureGuard {
    /// Install fresh capture buffers on this thread.
    pub fn install() -> Self {
        let prev = SINKS.with(|s| s.borrow_mut().replace(Sinks::default()));
        Self {
            prev,
            finished: false,
        }
    }

    /// Tear down the scope and hand back the captured (stdout, stderr) text.
    pub fn finish(mut self) -> (String, String) {
        let current = SINKS.with(|s| std::mem::replace(&mut *s.borrow_mut(), self.prev.take()));
        self.finished = true;
        let sinks = current.unwrap_or_default();
        (sinks.out, sinks.err)
    }
}

impl Drop for CaptureGuard {
    fn drop(&mut self) {
        if !self.finished {
            SINKS.with(|s| *s.borrow_mut() = self.prev.take());
        }
    }
}

/// Write to the captured stdout, or the real one when no capture is active.
pub fn write_out(args: fmt::Arguments<'_>) {
    let passthrough = SINKS.with(|s| match &mut *s.borrow_mut() {
        Some(sinks) => {
            sinks.out.push_str(&args.to_string());
            false
        }
        None => true,
    });
    if passthrough {
        let _ = io::stdout().write_fmt(args);
    }
}

/// Write to the captured stderr, or the real one when no capture is active.
pub fn write_err(args: fmt::Arguments<'_>) {
    let passthrough = SINKS.with(|s| match &mut *s.borrow_mut() {
        Some(sinks) => {
            sinks.err.push_str(&args.to_string());
            false
        }
        None => true,
    });
    if passthrough {
        let _ = io::stderr().write_fmt(args);
    }
}

/// `println!` substitute whose output is captured per test case.
#[macro_export]
macro_rules! outln {
    () => {
        $crate::capture::write_out(::core::format_args!("\n"))
    };
    ($($arg:tt)*) => {{
        $crate::capture::write_out(::core::format_args!($($arg)*));
        $crate::capture::write_out(::core::format_args!("\n"));
    }};
}

/// `eprintln!` substitute whose output is captured per test case.
#[macro_export]
macro_rules! errln {
    () => {
        $crate::capture::write_err(::core::format_args!("\n"))
    };
    ($($arg:tt)*) => {{
        $crate::capture::write_err(::core::format_args!($($arg)*));
        $crate::capture::write_err(::core::format_args!("\n"));
    }};
}
