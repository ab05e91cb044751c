pub mod serde_helpers;

pub use serde_helpers::{one_or_many, present, scalar_string};
