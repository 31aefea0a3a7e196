//! CLI commands

pub mod context;
pub mod preview;
pub mod run;
pub mod style;
