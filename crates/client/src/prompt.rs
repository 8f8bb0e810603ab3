//! Yes/no gate shown before destructive actions.

/// Outcome emitted when the prompt closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptSignal {
    Confirmed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPrompt {
    show: bool,
    title: String,
    message: String,
    confirm_text: String,
    cancel_text: String,
}

impl Default for ConfirmPrompt {
    fn default() -> Self {
        Self {
            show: false,
            title: String::new(),
            message: String::new(),
            confirm_text: "Confirmar".to_string(),
            cancel_text: "Cancelar".to_string(),
        }
    }
}

impl ConfirmPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_labels(mut self, confirm_text: impl Into<String>, cancel_text: impl Into<String>) -> Self {
        self.confirm_text = confirm_text.into();
        self.cancel_text = cancel_text.into();
        self
    }

    /// Show the prompt with `message`.
    pub fn open(&mut self, message: impl Into<String>) {
        self.message = message.into();
        self.show = true;
    }

    pub fn is_open(&self) -> bool {
        self.show
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn confirm_text(&self) -> &str {
        &self.confirm_text
    }

    pub fn cancel_text(&self) -> &str {
        &self.cancel_text
    }

    pub fn confirm(&mut self) -> PromptSignal {
        self.show = false;
        PromptSignal::Confirmed
    }

    pub fn cancel(&mut self) -> PromptSignal {
        self.show = false;
        PromptSignal::Cancelled
    }
}
