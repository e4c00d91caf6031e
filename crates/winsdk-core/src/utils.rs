//! Shared utility functions for winsdk crates

use anyhow::anyhow;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex is valid"));

/// Get the user's home directory
///
/// Prefers `HOME`, then `USERPROFILE`, so test harnesses and CI runners can
/// redirect it; falls back to `dirs::home_dir()`.
pub fn get_home_dir() -> anyhow::Result<PathBuf> {
    for var in ["HOME", "USERPROFILE"] {
        if let Ok(home) = std::env::var(var) {
            if !home.is_empty() {
                return Ok(PathBuf::from(home));
            }
        }
    }

    dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))
}

/// Current user name, `Developer` when unknown
pub fn user_name() -> String {
    ["USERNAME", "USER"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .map(|name| name.trim().to_string())
        .find(|name| !name.is_empty())
        .unwrap_or_else(|| "Developer".to_string())
}

/// Default publisher distinguished name for the current user (`CN=<user>`)
pub fn default_publisher() -> String {
    format!("CN={}", user_name())
}

/// Default package name for a project directory
///
/// The folder name with whitespace runs replaced by `-`, lowercased;
/// `app` when that leaves nothing.
pub fn default_package_name(dir: &Path) -> String {
    let folder = dir
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let normalized = WHITESPACE_RE
        .replace_all(folder.trim(), "-")
        .to_lowercase();

    if normalized.is_empty() {
        "app".to_string()
    } else {
        normalized
    }
}

/// Make a string usable as an MSIX package name
///
/// Package names allow ASCII letters, digits, `.` and `-`, between 3 and 50
/// characters. Other characters become `-`.
pub fn clean_package_name(name: &str) -> String {
    let mut cleaned: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect();

    cleaned = cleaned.trim_matches(|c| c == '.' || c == '-').to_string();
    if cleaned.is_empty() {
        return "Package".to_string();
    }
    cleaned.truncate(50);
    while cleaned.len() < 3 {
        cleaned.push('0');
    }
    cleaned
}

/// Ensure a publisher string is a distinguished name (`CN=...`)
pub fn normalize_publisher(publisher: &str) -> String {
    let trimmed = publisher.trim();
    if trimmed.to_ascii_uppercase().starts_with("CN=") {
        trimmed.to_string()
    } else {
        format!("CN={}", trimmed)
    }
}

/// Escape text for use inside an XML attribute value
pub fn xml_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
