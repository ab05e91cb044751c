//! hsboot - Bootstrap interactive development sessions for multi-package
//! Haskell projects
//!
//! This crate provides functionality to:
//! - Read library metadata from `.cabal` files, falling back to hpack `package.yaml`
//! - Merge source directories and language extensions across local packages
//! - Generate interpreter flags and an init script for a single session
//! - Hand the session to `ghci` or `ghcid` with scoped temporary resources
pub mod assets;
pub mod cabal;
pub mod command;
pub mod config;
pub mod diagnostics;
pub mod ephemeral;
pub mod error;
pub mod hpack;
pub mod launcher;
pub mod package;
pub mod session;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{Error, Result};

// Re-export main API components
pub use assets::{AssetResolver, AssetState, ProcessRunner, SystemProcessRunner};
pub use command::SessionCommand;
pub use config::{SessionConfig, discover_project_root};
pub use diagnostics::{Diagnostics, Severity, TracingDiagnostics};
pub use launcher::Launcher;
pub use package::{PackageInfo, SourceDirs, resolve_package};
pub use session::{SessionScript, SessionSettings, aggregate_packages};
