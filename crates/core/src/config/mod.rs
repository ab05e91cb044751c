//! Configuration management for hsboot

mod settings;

pub use settings::{CONFIG_FILE_NAME, SessionConfig, discover_project_root};
