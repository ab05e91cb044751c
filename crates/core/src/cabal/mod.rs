//! Cabal package description parsing.
//!
//! Only as much of the grammar as session bootstrap needs is modelled:
//! package identity, flags, components with their build fields, `if`/`else`
//! conditionals and `common` stanza imports. Everything else is accepted
//! and skipped, with warnings for names Cabal itself would not recognise.

pub mod description;
pub mod extension;
pub mod fields;
pub mod layout;
pub mod parser;

use std::fmt;

pub use description::{BuildInfo, CondBranch, CondTree, Condition, Flag, GenericPackageDescription};
pub use extension::LanguageExtension;
pub use parser::parse_generic_package_description;

/// A warning or error tied to a source line. Line 0 means "whole file".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMessage {
    pub line: usize,
    pub message: String,
}

impl ParseMessage {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line == 0 {
            write!(f, "{}", self.message)
        } else {
            write!(f, "line {}: {}", self.line, self.message)
        }
    }
}

/// Outcome of a parse: warnings are always available, the description only
/// when no error was found.
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub warnings: Vec<ParseMessage>,
    pub result: Result<GenericPackageDescription, Vec<ParseMessage>>,
}
