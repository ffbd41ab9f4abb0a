use dialoguer::{Confirm, Input};
use sfm_core::Prompter;

/// Asks on the terminal unless the answer was given on the command line.
/// Without a terminal every question counts as declined.
pub struct TerminalPrompter {
    assume_yes: bool,
    text: Option<String>,
}

impl TerminalPrompter {
    pub fn new(assume_yes: bool, text: Option<String>) -> Self {
        Self { assume_yes, text }
    }
}

impl Prompter for TerminalPrompter {
    fn confirm(&mut self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        match Confirm::new()
            .with_prompt(message)
            .default(false)
            .interact_opt()
        {
            Ok(Some(answer)) => answer,
            Ok(None) => false,
            Err(e) => {
                log::debug!("confirmation unavailable: {}", e);
                false
            }
        }
    }

    fn prompt_text(&mut self, message: &str, default: &str) -> Option<String> {
        if let Some(t) = self.text.take() {
            return Some(t);
        }
        Input::<String>::new()
            .with_prompt(message)
            .with_initial_text(default)
            .allow_empty(true)
            .interact_text()
            .map_err(|e| log::debug!("text prompt unavailable: {}", e))
            .ok()
    }
}
