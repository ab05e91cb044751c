//! Session entry points: `run`, `watch`, `repl` and `ide-args`.
//!
//! Every entry point resolves the configured packages first and fails before
//! touching the filesystem when none resolve. The interactive ones then
//! write the init script into a temp directory, hand a [`SessionCommand`] to
//! the caller's `handoff`, and remove the directory once `handoff` returns.

use std::path::{Path, PathBuf};

use crate::assets::{AssetResolver, ProcessRunner};
use crate::command::{SessionCommand, haskell_string_literal, shell_quote};
use crate::config::SessionConfig;
use crate::diagnostics::Diagnostics;
use crate::ephemeral::{free_port, with_init_script};
use crate::error::Result;
use crate::session::{SessionScript, aggregate_packages};

pub struct Launcher<'a> {
    project_root: PathBuf,
    config: SessionConfig,
    diagnostics: &'a dyn Diagnostics,
    runner: &'a dyn ProcessRunner,
}

impl<'a> Launcher<'a> {
    pub fn new(
        project_root: &Path,
        config: SessionConfig,
        diagnostics: &'a dyn Diagnostics,
        runner: &'a dyn ProcessRunner,
    ) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config,
            diagnostics,
            runner,
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Configured package directories, anchored at the project root.
    pub fn package_dirs(&self) -> Vec<PathBuf> {
        self.config
            .packages
            .iter()
            .map(|package| self.project_root.join(package))
            .collect()
    }

    /// Resolve every package and build the interpreter flags.
    pub fn prepare(&self) -> Result<SessionScript> {
        let settings = aggregate_packages(&self.package_dirs(), self.diagnostics)?;
        Ok(SessionScript::build(&settings))
    }

    /// Interpreter flags on one line, for editor integrations.
    pub fn ide_args(&self) -> Result<String> {
        Ok(self.prepare()?.args_line())
    }

    pub fn repl_command(&self, script: &SessionScript, script_path: &Path) -> SessionCommand {
        let mut args = vec![
            "-ghci-script".to_string(),
            script_path.display().to_string(),
        ];
        args.extend(script.interpreter_args.iter().cloned());
        SessionCommand::new(&self.config.interpreter, args).with_working_dir(&self.project_root)
    }

    /// The reloader command; `test` is evaluated after every successful load.
    pub fn reloader_command(
        &self,
        script: &SessionScript,
        script_path: &Path,
        test: Option<&str>,
    ) -> SessionCommand {
        let script_path = script_path.display().to_string();
        let interpreter = std::iter::once(&self.config.interpreter)
            .chain(&self.config.reload_options)
            .chain(&script.interpreter_args)
            .chain(["-ghci-script".to_string(), script_path].iter())
            .map(|word| shell_quote(word))
            .collect::<Vec<_>>()
            .join(" ");

        let mut args = vec![
            "-W".to_string(),
            format!("--command={interpreter}"),
            "--reload=config".to_string(),
            format!("--outputfile={}", self.config.reload_output_file),
        ];
        if let Some(test) = test {
            args.push(format!("--test={test}"));
        }
        SessionCommand::new(&self.config.reloader, args).with_working_dir(&self.project_root)
    }

    /// Start an interactive interpreter with the session loaded.
    pub fn repl<F>(&self, handoff: F) -> Result<()>
    where
        F: FnOnce(&SessionCommand) -> Result<()>,
    {
        let script = self.prepare()?;
        with_init_script(&script.init_script_text, |script_path| {
            handoff(&self.repl_command(&script, script_path))
        })
    }

    /// Reload on change without serving the app.
    pub fn watch<F>(&self, handoff: F) -> Result<()>
    where
        F: FnOnce(&SessionCommand) -> Result<()>,
    {
        let script = self.prepare()?;
        with_init_script(&script.init_script_text, |script_path| {
            handoff(&self.reloader_command(&script, script_path, None))
        })
    }

    /// Reload on change and serve the app on a free port after every load.
    pub fn run<F>(&self, handoff: F) -> Result<()>
    where
        F: FnOnce(&SessionCommand) -> Result<()>,
    {
        let script = self.prepare()?;
        let assets =
            AssetResolver::new(self.runner, &self.project_root, &self.config.asset_attribute)
                .resolve()?;
        let port = free_port()?;
        tracing::info!("Serving on port {port}");

        let test = run_expression(port, &assets);
        with_init_script(&script.init_script_text, |script_path| {
            handoff(&self.reloader_command(&script, script_path, Some(&test)))
        })
    }
}

/// Expression that serves the app once the session has loaded.
pub fn run_expression(port: u16, assets: &str) -> String {
    format!(
        "Obelisk.Run.run {port} (Obelisk.Run.runServeAsset {}) Backend.backend Frontend.frontend",
        haskell_string_literal(assets)
    )
}
