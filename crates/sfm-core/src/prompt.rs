//! The yes/no and free-text questions asked before destructive steps.

/// Answers questions on behalf of the user.
pub trait Prompter {
    /// `true` only on an explicit yes.
    fn confirm(&mut self, message: &str) -> bool;
    /// `None` when the user cancelled.
    fn prompt_text(&mut self, message: &str, default: &str) -> Option<String>;
}

/// Fixed answers, for tests and non-interactive runs.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompter {
    pub confirm: bool,
    pub text: Option<String>,
    pub asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn yes() -> Self {
        Self {
            confirm: true,
            ..Self::default()
        }
    }

    pub fn no() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&mut self, message: &str) -> bool {
        self.asked.push(message.to_string());
        self.confirm
    }

    fn prompt_text(&mut self, message: &str, _default: &str) -> Option<String> {
        self.asked.push(message.to_string());
        self.text.clone()
    }
}
