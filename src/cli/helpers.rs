//! Shared helper functions for CLI commands
//!
//! This module contains utility functions that are used across multiple
//! command modules to avoid code duplication.

use console::style;
use miette::Result;

use crate::core::site::Site;
use crate::cli::GlobalOpts;

/// Resolve the site for a command from `--site` or the current directory
pub fn open_site(global: &GlobalOpts) -> Result<Site> {
    Site::locate(global.site.as_deref()).map_err(|e| miette::miette!("{}", e))
}

/// Truncate a string to max_len characters, adding "..." if truncated
///
/// Useful for table columns that need fixed-width output.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Parse a boolean option value the way operators type it (`1`, `0`, `yes`, ...)
pub fn parse_flag(s: &str) -> Result<bool, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "no" | "n" | "off" | "" => Ok(false),
        other => Err(format!(
            "invalid boolean '{}'. Use 1/0, true/false or yes/no",
            other
        )),
    }
}

/// Print a non-fatal warning to stderr
pub fn warn(message: impl std::fmt::Display) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), message);
}
