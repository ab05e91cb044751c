use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::{
    SessionMode, SessionOptions, ide_args_command, init_command, session_command,
};

#[derive(Parser, Debug)]
#[command(name = "hsboot")]
#[command(version, about, long_about = None)]
#[command(subcommand_required = true, arg_required_else_help = true)]
#[command(after_help = "ENVIRONMENT:\n    RUST_LOG=debug    Enable debug logging")]
pub struct Cli {
    /// Project root (defaults to the nearest directory with a .hsboot.json)
    #[arg(long, global = true, env = "HSBOOT_PROJECT_ROOT", value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Package directory to load, relative to the root (repeatable)
    #[arg(short, long = "package", global = true, value_name = "DIR")]
    pub packages: Vec<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Reload on change and serve the app after every successful load
    #[command(visible_alias = "r")]
    Run {
        /// Print the command without executing it
        #[arg(short, long)]
        dry_run: bool,
    },
    /// Reload on change without serving the app
    #[command(visible_alias = "w")]
    Watch {
        /// Print the command without executing it
        #[arg(short, long)]
        dry_run: bool,
    },
    /// Start an interactive interpreter with every package loaded
    Repl {
        /// Print the command without executing it
        #[arg(short, long)]
        dry_run: bool,
    },
    /// Print the interpreter flags for editor integrations
    IdeArgs {
        /// Print the flags as a JSON array
        #[arg(long)]
        json: bool,
    },
    /// Write a .hsboot.json for this project
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Execute the command
    pub fn execute(self) -> Result<()> {
        let options = SessionOptions {
            root: self.root,
            packages: self.packages,
        };

        match self.command {
            Commands::Run { dry_run } => session_command(SessionMode::Run, &options, dry_run),
            Commands::Watch { dry_run } => session_command(SessionMode::Watch, &options, dry_run),
            Commands::Repl { dry_run } => session_command(SessionMode::Repl, &options, dry_run),
            Commands::IdeArgs { json } => ide_args_command(&options, json),
            Commands::Init { force } => init_command(&options, force),
        }
    }
}
