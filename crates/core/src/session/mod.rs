//! Combining resolved packages into one interpreter session.

pub mod aggregate;
pub mod script;

pub use aggregate::{SessionSettings, aggregate_packages};
pub use script::{DISABLE_USER_PACKAGE_DB, INIT_SCRIPT, PATH_LIST_SEPARATOR, SessionScript};
