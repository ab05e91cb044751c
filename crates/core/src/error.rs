use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

/// Errors that can occur while bootstrapping a development session
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to parse {}: {message}", .path.display())]
    DecodeError { path: PathBuf, message: String },

    #[error("No valid pkgs found in {}", .0.join(", "))]
    NoPackagesResolved(Vec<String>),

    #[error("Invalid project root {}: {reason}", .path.display())]
    InvalidProjectRoot { path: PathBuf, reason: String },

    #[error("Failed to launch {program}: {source}")]
    SpawnError {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} exited with {status}")]
    ProcessFailed { program: String, status: ExitStatus },

    #[error("{0}")]
    Other(String),
}

/// Result type alias for hsboot operations
pub type Result<T> = std::result::Result<T, Error>;
