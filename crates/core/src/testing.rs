//! Test doubles for the capabilities the core depends on.
//!
//! Only compiled for this crate's tests or with the `test-support` feature.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::assets::ProcessRunner;
use crate::diagnostics::{Diagnostics, Severity};
use crate::error::{Error, Result};

/// Diagnostics that remember every message; `fail` panics with `fatal: <message>`.
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    entries: Mutex<Vec<(Severity, String)>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(Severity, String)> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn messages_at(&self, severity: Severity) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(s, _)| *s == severity)
            .map(|(_, message)| message)
            .collect()
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn log(&self, severity: Severity, message: &str) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((severity, message.to_string()));
    }

    fn fail(&self, message: &str) -> ! {
        panic!("fatal: {message}")
    }
}

/// Process runner that answers from a table keyed by `program arg arg ...`.
#[derive(Debug, Default)]
pub struct FakeProcessRunner {
    responses: HashMap<String, String>,
    calls: Mutex<Vec<(String, PathBuf)>>,
}

impl FakeProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, command_line: &str, stdout: &str) -> Self {
        self.responses
            .insert(command_line.to_string(), stdout.to_string());
        self
    }

    /// Command lines seen so far, with the working directory each ran in.
    pub fn calls(&self) -> Vec<(String, PathBuf)> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl ProcessRunner for FakeProcessRunner {
    fn read_stdout(&self, program: &str, args: &[String], cwd: &Path) -> Result<String> {
        let mut command_line = program.to_string();
        for arg in args {
            command_line.push(' ');
            command_line.push_str(arg);
        }
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((command_line.clone(), cwd.to_path_buf()));

        self.responses.get(&command_line).cloned().ok_or_else(|| {
            Error::Other(format!("unexpected command in fake runner: {command_line}"))
        })
    }
}
