use std::path::{Path, PathBuf};
use std::process::Command;

use super::interrupt::InterruptShield;
use crate::error::{Error, Result};

/// An external tool invocation the session hands control to.
///
/// Arguments go to the program as-is; no shell is involved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCommand {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
}

impl SessionCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            working_dir: None,
        }
    }

    pub fn with_working_dir(mut self, dir: &Path) -> Self {
        self.working_dir = Some(dir.to_path_buf());
        self
    }

    /// A copy-pasteable rendering for previews and logs.
    pub fn to_shell_command(&self) -> String {
        let mut cmd = shell_quote(&self.program);
        for arg in &self.args {
            cmd.push(' ');
            cmd.push_str(&shell_quote(arg));
        }
        cmd
    }

    /// Run to completion. Interrupts go to the child only while it runs.
    pub fn execute(&self) -> Result<()> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        // Set working directory if specified
        if let Some(ref dir) = self.working_dir {
            cmd.current_dir(dir);
        }

        tracing::debug!("Executing: {}", self.to_shell_command());
        let mut child = cmd.spawn().map_err(|source| Error::SpawnError {
            program: self.program.clone(),
            source,
        })?;

        let status = {
            let _shield = InterruptShield::install();
            child.wait()?
        };

        if status.success() {
            Ok(())
        } else {
            Err(Error::ProcessFailed {
                program: self.program.clone(),
                status,
            })
        }
    }
}

/// POSIX single-quoting, skipped for words that need none.
pub fn shell_quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_-./=:,+@%".contains(c));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

/// `value` as a Haskell string literal.
pub fn haskell_string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\{}\\&", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
