//! Command-line driver for the session facade.

pub mod script;

pub use script::{Op, ScriptError, ScriptRunner};
