//! `.gitignore` maintenance
//!
//! Entries are appended under a comment line, once: a file that already has
//! a line trimming to the entry is left untouched. Failures never abort a
//! flow; they come back as warnings.

use std::fs;
use std::path::Path;
use tracing::{debug, info};
use winsdk_core::paths::WORKSPACE_DIR_NAME;
use winsdk_core::{Outcome, Warning};

/// Ignore file name
pub const GITIGNORE_FILE: &str = ".gitignore";

const WORKSPACE_COMMENT: &str = "# Windows SDK packages and generated files";
const CERTIFICATE_COMMENT: &str = "# Development certificate";

/// Exclude the `.winsdk` folder from version control
///
/// Returns whether the file changed.
pub fn update_gitignore(project_dir: &Path) -> Outcome<bool> {
    let outcome = append_entry(project_dir, WORKSPACE_COMMENT, WORKSPACE_DIR_NAME);
    if outcome.value {
        info!("Added {} to {}", WORKSPACE_DIR_NAME, GITIGNORE_FILE);
    }
    outcome
}

/// Exclude a certificate file from version control
///
/// Returns whether the file changed.
pub fn add_certificate_to_gitignore(project_dir: &Path, certificate_file: &str) -> Outcome<bool> {
    let outcome = append_entry(project_dir, CERTIFICATE_COMMENT, certificate_file);
    if outcome.value {
        info!("Added {} to {}", certificate_file, GITIGNORE_FILE);
    }
    outcome
}

fn append_entry(project_dir: &Path, comment: &str, entry: &str) -> Outcome<bool> {
    let path = project_dir.join(GITIGNORE_FILE);
    let context = path.display().to_string();

    let existing = if path.exists() {
        match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => return Outcome::degraded(false, Warning::new(context, e)),
        }
    } else {
        String::new()
    };

    if existing.lines().any(|line| line.trim() == entry.trim()) {
        debug!("{} already lists {}", GITIGNORE_FILE, entry);
        return Outcome::clean(false);
    }

    match fs::write(&path, with_entry(&existing, comment, entry)) {
        Ok(()) => Outcome::clean(true),
        Err(e) => Outcome::degraded(false, Warning::new(context, e)),
    }
}

/// `existing` with a blank line, the comment and the entry appended
fn with_entry(existing: &str, comment: &str, entry: &str) -> String {
    let mut content = existing.to_string();
    if !content.is_empty() && !content.ends_with('\n') {
        content.push('\n');
    }
    content.push('\n');
    content.push_str(comment);
    content.push('\n');
    content.push_str(entry);
    content.push('\n');
    content
}
