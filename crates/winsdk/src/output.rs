//! Terminal output utilities
//!
//! In quiet mode everything except errors is suppressed.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicBool, Ordering};
use winsdk_core::Warning;

static QUIET: AtomicBool = AtomicBool::new(false);

/// Suppress non-error output
pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

fn is_quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

/// Print a success message
pub fn success(msg: &str) {
    if !is_quiet() {
        println!("{} {}", style("✓").green().bold(), msg);
    }
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", style("✗").red().bold(), msg);
}

/// Print a warning message
pub fn warning(msg: &str) {
    if !is_quiet() {
        eprintln!("{} {}", style("⚠").yellow().bold(), msg);
    }
}

/// Print every warning of a best-effort operation
pub fn warnings(warnings: &[Warning]) {
    for w in warnings {
        warning(&w.to_string());
    }
}

/// Print an info message
pub fn info(msg: &str) {
    if !is_quiet() {
        println!("{} {}", style("ℹ").blue().bold(), msg);
    }
}

/// Print a header
pub fn header(msg: &str) {
    if !is_quiet() {
        println!("\n{}", style(msg).bold().underlined());
    }
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    if !is_quiet() {
        println!("  {}: {}", style(key).dim(), value);
    }
}

/// Print detail lines (captured tool output)
pub fn detail(text: &str) {
    for line in text.lines() {
        eprintln!("  {}", style(line).dim());
    }
}

/// Create a spinner
pub fn spinner(msg: &str) -> ProgressBar {
    if is_quiet() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(spinner_style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
