use anyhow::Result;

use hsboot_core::{Launcher, SystemProcessRunner, TracingDiagnostics};

use super::SessionOptions;

pub fn ide_args_command(options: &SessionOptions, json: bool) -> Result<()> {
    let (root, config) = options.load()?;
    let diagnostics = TracingDiagnostics;
    let runner = SystemProcessRunner::new(&diagnostics);
    let launcher = Launcher::new(&root, config, &diagnostics, &runner);

    if json {
        let script = launcher.prepare()?;
        println!("{}", serde_json::to_string(&script.interpreter_args)?);
    } else {
        println!("{}", launcher.ide_args()?);
    }
    Ok(())
}
