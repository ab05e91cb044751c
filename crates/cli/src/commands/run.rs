use anyhow::Result;
use tracing::info;

use hsboot_core::{Launcher, SessionCommand, SystemProcessRunner, TracingDiagnostics};

use super::SessionOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    Run,
    Watch,
    Repl,
}

pub fn session_command(mode: SessionMode, options: &SessionOptions, dry_run: bool) -> Result<()> {
    let (root, config) = options.load()?;
    let diagnostics = TracingDiagnostics;
    let runner = SystemProcessRunner::new(&diagnostics);
    let launcher = Launcher::new(&root, config, &diagnostics, &runner);

    let handoff = |command: &SessionCommand| -> hsboot_core::Result<()> {
        if dry_run {
            println!("{}", command.to_shell_command());
            if let Some(ref dir) = command.working_dir {
                println!("Working directory: {}", dir.display());
            }
            Ok(())
        } else {
            info!("Running: {}", command.to_shell_command());
            command.execute()
        }
    };

    match mode {
        SessionMode::Run => launcher.run(handoff)?,
        SessionMode::Watch => launcher.watch(handoff)?,
        SessionMode::Repl => launcher.repl(handoff)?,
    }
    Ok(())
}
