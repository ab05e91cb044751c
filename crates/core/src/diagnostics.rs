//! Logging and failure capability passed into every resolution step.
//!
//! Nothing in the core reaches for a global logger directly when reporting
//! package problems; callers hand in a [`Diagnostics`] implementation instead.
//! The CLI uses [`TracingDiagnostics`], tests use `testing::RecordingDiagnostics`.

use std::fmt;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Debug,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Debug => write!(f, "debug"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Sink for non-fatal messages plus the session-wide fatal exit.
pub trait Diagnostics: Send + Sync {
    /// Emit a message at the given severity.
    fn log(&self, severity: Severity, message: &str);

    /// Emit `message` and abort the whole session.
    fn fail(&self, message: &str) -> !;
}

/// Diagnostics backed by `tracing`; `fail` exits the process with status 1.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn log(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Debug => tracing::debug!("{message}"),
            Severity::Warning => tracing::warn!("{message}"),
            Severity::Error => tracing::error!("{message}"),
        }
    }

    fn fail(&self, message: &str) -> ! {
        tracing::error!("{message}");
        std::process::exit(1)
    }
}

/// Holds one package's messages so they reach the parent as a single block.
pub struct BufferedDiagnostics<'a> {
    parent: &'a dyn Diagnostics,
    entries: Mutex<Vec<(Severity, String)>>,
}

impl<'a> BufferedDiagnostics<'a> {
    pub fn new(parent: &'a dyn Diagnostics) -> Self {
        Self {
            parent,
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Replay every buffered message into the parent, in emission order.
    pub fn flush(self) {
        let entries = self
            .entries
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        for (severity, message) in entries {
            self.parent.log(severity, &message);
        }
    }

    fn take(&self) -> Vec<(Severity, String)> {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        std::mem::take(&mut *entries)
    }
}

impl Diagnostics for BufferedDiagnostics<'_> {
    fn log(&self, severity: Severity, message: &str) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((severity, message.to_string()));
    }

    fn fail(&self, message: &str) -> ! {
        for (severity, buffered) in self.take() {
            self.parent.log(severity, &buffered);
        }
        self.parent.fail(message)
    }
}
