//! External tool invocation

pub mod interrupt;
pub mod session_command;

// Re-export commonly used types
pub use interrupt::InterruptShield;
pub use session_command::{SessionCommand, haskell_string_literal, shell_quote};
