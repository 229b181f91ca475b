//! Process-wide output formatting
//!
//! One `Formatter` exists per process. It is created on first use through a
//! `OnceLock`, so concurrent first calls still initialize it exactly once.
//! The line terminator lives behind an `RwLock`: every read sees either the
//! old or the new value, never a torn one. There is no ordering between a
//! writer and readers running at the same time; callers that need their own
//! terminator for one call should use `to_xml_with` instead.

use std::sync::{OnceLock, PoisonError, RwLock};

/// Indent unit written once per nesting level
pub const INDENT: &str = "\t";

static FORMATTER: OnceLock<Formatter> = OnceLock::new();

/// Shared serialization settings
#[derive(Debug)]
pub struct Formatter {
    line_terminator: RwLock<String>,
}

/// Get the process-wide formatter, creating it on first use
pub fn formatter() -> &'static Formatter {
    FORMATTER.get_or_init(Formatter::new)
}

/// Line ending convention of the target platform
pub fn default_line_terminator() -> &'static str {
    if cfg!(windows) {
        "\r\n"
    } else {
        "\n"
    }
}

impl Formatter {
    fn new() -> Self {
        Formatter {
            line_terminator: RwLock::new(default_line_terminator().to_string()),
        }
    }

    /// Currently configured line terminator
    pub fn line_terminator(&self) -> String {
        self.line_terminator
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the line terminator used by all later serializations
    pub fn set_line_terminator(&self, terminator: impl Into<String>) {
        let terminator = terminator.into();
        log::debug!("line terminator set to {terminator:?}");
        *self
            .line_terminator
            .write()
            .unwrap_or_else(PoisonError::into_inner) = terminator;
    }

    /// Restore the platform default terminator
    pub fn reset(&self) {
        self.set_line_terminator(default_line_terminator());
    }
}

/// Serializes tests that read or change the process-wide formatter
#[cfg(test)]
pub(crate) fn global_test_lock() -> std::sync::MutexGuard<'static, ()> {
    static LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
    LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}
