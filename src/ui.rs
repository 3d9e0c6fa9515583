// UI layer: the interactive prompts the upload workflow needs. The
// workflow receives a `Prompter` explicitly; the terminal version below
// is built on `dialoguer`, `indicatif` and `crossterm`.

use crossterm::style::Stylize;
use dialoguer::{Input, Password, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::error::{Result, UploadError};

/// Blocking user interaction. Every method either returns what the user
/// confirmed or `None` when the dialog was dismissed.
pub trait Prompter {
    /// Show a message the user has to notice (errors, mostly).
    fn message(&mut self, text: &str);

    /// Single-choice menu. Returns the index into `items`.
    fn select(&mut self, prompt: &str, items: &[String]) -> Result<Option<usize>>;

    /// Masked entry.
    fn password(&mut self, prompt: &str) -> Result<Option<String>>;

    /// Free text entry.
    fn input(&mut self, prompt: &str) -> Result<Option<String>>;

    /// Completion notice, e.g. the id of an uploaded document.
    fn notice(&mut self, text: &str);

    /// Spinner shown while a request is in flight. Callers finish it.
    fn spinner(&mut self, message: &str) -> ProgressBar;
}

/// Terminal prompts on stderr. The title is printed once before the first
/// dialog, like a dialog background title.
pub struct TerminalPrompter {
    title: String,
    title_shown: bool,
}

impl TerminalPrompter {
    pub fn new(title: &str) -> Self {
        TerminalPrompter {
            title: title.to_string(),
            title_shown: false,
        }
    }

    fn show_title(&mut self) {
        if !self.title_shown {
            eprintln!("{}", self.title.as_str().bold());
            self.title_shown = true;
        }
    }
}

impl Prompter for TerminalPrompter {
    fn message(&mut self, text: &str) {
        self.show_title();
        eprintln!("{}", text.red().bold());
    }

    fn select(&mut self, prompt: &str, items: &[String]) -> Result<Option<usize>> {
        self.show_title();
        // `interact_opt` returns None on Esc or `q`.
        Select::new()
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact_opt()
            .map_err(UploadError::Terminal)
    }

    fn password(&mut self, prompt: &str) -> Result<Option<String>> {
        self.show_title();
        let value = Password::new()
            .with_prompt(prompt)
            .interact()
            .map_err(UploadError::Terminal)?;
        Ok(Some(value).filter(|v| !v.is_empty()))
    }

    fn input(&mut self, prompt: &str) -> Result<Option<String>> {
        self.show_title();
        let value: String = Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(UploadError::Terminal)?;
        let value = value.trim().to_string();
        Ok(Some(value).filter(|v| !v.is_empty()))
    }

    fn notice(&mut self, text: &str) {
        self.show_title();
        println!("{}", text.green());
    }

    fn spinner(&mut self, message: &str) -> ProgressBar {
        self.show_title();
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }
}

/// Prompter that replays canned answers and records what it was asked.
/// Used by the unit and integration tests.
#[doc(hidden)]
pub mod testing {
    use super::*;
    use std::collections::VecDeque;

    #[derive(Default)]
    pub struct ScriptedPrompter {
        selects: VecDeque<Option<usize>>,
        inputs: VecDeque<Option<String>>,
        pub selects_shown: usize,
        pub passwords_asked: usize,
        pub last_prompt: String,
        pub last_choices: Vec<String>,
        pub messages: Vec<String>,
        pub notices: Vec<String>,
    }

    impl ScriptedPrompter {
        pub fn with_selects(mut self, answers: impl IntoIterator<Item = Option<usize>>) -> Self {
            self.selects.extend(answers);
            self
        }

        /// Answers for both `input` and `password`, in call order.
        pub fn with_inputs(mut self, answers: impl IntoIterator<Item = Option<String>>) -> Self {
            self.inputs.extend(answers);
            self
        }
    }

    impl Prompter for ScriptedPrompter {
        fn message(&mut self, text: &str) {
            self.messages.push(text.to_string());
        }

        fn select(&mut self, prompt: &str, items: &[String]) -> Result<Option<usize>> {
            self.selects_shown += 1;
            self.last_prompt = prompt.to_string();
            self.last_choices = items.to_vec();
            Ok(self.selects.pop_front().flatten())
        }

        fn password(&mut self, _prompt: &str) -> Result<Option<String>> {
            self.passwords_asked += 1;
            Ok(self.inputs.pop_front().flatten())
        }

        fn input(&mut self, _prompt: &str) -> Result<Option<String>> {
            Ok(self.inputs.pop_front().flatten())
        }

        fn notice(&mut self, text: &str) {
            self.notices.push(text.to_string());
        }

        fn spinner(&mut self, _message: &str) -> ProgressBar {
            ProgressBar::hidden()
        }
    }
}
