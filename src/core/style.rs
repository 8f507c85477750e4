//! Consistent colored terminal output for autopush.
//!
//! All user-facing lines go through these helpers so colors are uniform.
//! `colored` disables itself when the output is not a TTY.

use colored::Colorize;

// ---------- Banner ----------

/// "Git Push Automation Tool [v0.1.0]"
pub fn banner(version: &str) -> String {
    format!("{} {}", "Git Push Automation Tool".bold(), format!("[v{}]", version).dimmed())
}

// ---------- Status indicators ----------

/// Green "SUCCESS:" line
pub fn success(msg: &str) -> String {
    format!("{}", format!("SUCCESS: {}", msg).green().bold())
}

/// Yellow "WARNING:" line
pub fn warning(msg: &str) -> String {
    format!("{}", format!("WARNING: {}", msg).yellow())
}

/// Red "ERROR:" line
pub fn error(msg: &str) -> String {
    format!("{}", format!("ERROR: {}", msg).red().bold())
}

/// Magenta "HELP:" line, always printed right after an error
pub fn help(msg: &str) -> String {
    format!("{}", format!("HELP: {}", msg).magenta().bold())
}

/// Dim hint
pub fn hint(msg: &str) -> String {
    format!("{}", msg.dimmed())
}

// ---------- Values ----------

/// Cyan highlight for user-supplied names
pub fn name(value: &str) -> String {
    format!("{}", value.cyan())
}

/// Short commit hash
pub fn commit_hash(hash: &str) -> String {
    format!("{}", hash.yellow())
}

/// Clickable repository link
pub fn link(url: &str) -> String {
    format!("{}", url.underline())
}

/// Input marker placed on its own line under a question
pub fn prompt_marker() -> String {
    format!("{}", ">>> ".cyan())
}

/// Format a key-value summary line with aligned values
pub fn summary_line(key: &str, value: &str) -> String {
    format!("  {:<16} {}", format!("{}:", key).dimmed(), value)
}
