//! User confirmation seam
//!
//! The setup flow has a single interactive decision (overwrite pinned
//! versions with latest). It asks through [`ConfirmationPort`] so the CLI can
//! prompt on a terminal while scripts and tests answer automatically.

/// Asks the user a yes/no question
pub trait ConfirmationPort: Send + Sync {
    /// Return true to proceed
    fn confirm(&self, prompt: &str) -> bool;
}

/// Answers every question with yes
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl ConfirmationPort for AssumeYes {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Answers every question with no
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeNo;

impl ConfirmationPort for AssumeNo {
    fn confirm(&self, _prompt: &str) -> bool {
        false
    }
}
