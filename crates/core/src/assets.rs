//! Static asset location for `run`.
//!
//! The asset attribute of the project's nix expression is either a
//! derivation, which has to be built to get a store path, or a plain path
//! that can be read directly. Resolution asks nix which one it is first.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::diagnostics::{Diagnostics, Severity};
use crate::error::{Error, Result};

/// Runs an external program to completion and returns its stdout.
pub trait ProcessRunner: Send + Sync {
    fn read_stdout(&self, program: &str, args: &[String], cwd: &Path) -> Result<String>;
}

/// Runs programs for real. Stderr is captured and logged at debug level.
pub struct SystemProcessRunner<'a> {
    diagnostics: &'a dyn Diagnostics,
}

impl<'a> SystemProcessRunner<'a> {
    pub fn new(diagnostics: &'a dyn Diagnostics) -> Self {
        Self { diagnostics }
    }
}

impl ProcessRunner for SystemProcessRunner<'_> {
    fn read_stdout(&self, program: &str, args: &[String], cwd: &Path) -> Result<String> {
        tracing::debug!("Running {program} {} in {}", args.join(" "), cwd.display());

        let output = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| Error::SpawnError {
                program: program.to_string(),
                source,
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            self.diagnostics
                .log(Severity::Debug, &format!("{program}: {}", stderr.trim_end()));
        }

        if !output.status.success() {
            return Err(Error::ProcessFailed {
                program: program.to_string(),
                status: output.status,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetState {
    /// Not yet known whether the attribute is a derivation.
    NeedIntrospect,
    /// A derivation; build it and use the output path.
    BuildThenRead,
    /// A plain path; evaluate it directly.
    ReadRaw,
    Resolved(String),
}

/// Drives [`AssetState`] to `Resolved` with nix commands run at the project root.
pub struct AssetResolver<'a> {
    runner: &'a dyn ProcessRunner,
    project_root: PathBuf,
    attribute: String,
}

impl<'a> AssetResolver<'a> {
    pub fn new(runner: &'a dyn ProcessRunner, project_root: &Path, attribute: &str) -> Self {
        Self {
            runner,
            project_root: project_root.to_path_buf(),
            attribute: attribute.to_string(),
        }
    }

    /// Advance one state. `Resolved` is returned unchanged.
    pub fn step(&self, state: AssetState) -> Result<AssetState> {
        match state {
            AssetState::NeedIntrospect => {
                let expr = format!(
                    "(let a = import ./. {{}}; in toString (a.reflex.nixpkgs.lib.isDerivation a.{}))",
                    self.attribute
                );
                let is_derivation = self.nix("nix", &["eval", "--raw", &expr])?;
                Ok(if is_derivation == "1" {
                    AssetState::BuildThenRead
                } else {
                    AssetState::ReadRaw
                })
            }
            AssetState::BuildThenRead => {
                let out = self.nix("nix-build", &["-A", &self.attribute, "--no-out-link"])?;
                Ok(AssetState::Resolved(out.trim_end().to_string()))
            }
            AssetState::ReadRaw => {
                let out = self.nix("nix", &["eval", "-f", ".", &self.attribute, "--raw"])?;
                Ok(AssetState::Resolved(out))
            }
            resolved @ AssetState::Resolved(_) => Ok(resolved),
        }
    }

    /// Run the state machine from `NeedIntrospect` to a path.
    pub fn resolve(&self) -> Result<String> {
        let mut state = AssetState::NeedIntrospect;
        loop {
            state = self.step(state)?;
            if let AssetState::Resolved(path) = state {
                tracing::debug!("Static assets at {path}");
                return Ok(path);
            }
        }
    }

    fn nix(&self, program: &str, args: &[&str]) -> Result<String> {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        self.runner.read_stdout(program, &args, &self.project_root)
    }
}
