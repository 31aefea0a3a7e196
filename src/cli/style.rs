//! Terminal styling helpers

use owo_colors::OwoColorize;
use std::fmt::Display;

/// Check mark glyph
pub const CHECK: &str = "✓";

/// Semantic styles for CLI output
pub trait Stylize: Display + Sized {
    /// Bold text for headings
    fn emphasis(&self) -> String {
        self.bold().to_string()
    }

    /// Highlighted values
    fn accent(&self) -> String {
        self.cyan().to_string()
    }

    /// Success messages
    fn success(&self) -> String {
        self.green().to_string()
    }
}

impl<T: Display> Stylize for T {}

/// Green check mark
pub fn check() -> String {
    CHECK.success()
}
