//! Interactive confirmation on the terminal

use console::Term;
use dialoguer::Confirm;
use winsdk_core::ConfirmationPort;

/// Asks on the terminal; answers no when there is no terminal to ask on
pub struct TerminalConfirm;

impl ConfirmationPort for TerminalConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        if !Term::stderr().is_term() {
            return false;
        }
        Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or(false)
    }
}
