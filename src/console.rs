//! Line-based console capability.
//!
//! The learner and the renamer never touch stdin/stdout directly; they talk to
//! a [`Console`]. The binary uses [`TerminalConsole`], tests drive runs with a
//! [`ScriptedConsole`] that replays canned answers.

use crate::output::OutputFormatter;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Blocking line-oriented interaction with the user.
pub trait Console {
    /// Shows `prompt` without a line break and reads one line of input.
    ///
    /// Returns `None` on end of input or when reading fails.
    fn prompt_line(&mut self, prompt: &str) -> Option<String>;

    /// Emits an informational status line.
    fn status(&mut self, line: &str);

    /// Emits a warning line; the run continues.
    fn warn(&mut self, line: &str);

    /// Emits a line reporting a completed step.
    fn success(&mut self, line: &str) {
        self.status(line);
    }
}

/// Console backed by the process's stdin and stdout.
#[derive(Debug, Default)]
pub struct TerminalConsole;

impl TerminalConsole {
    pub fn new() -> Self {
        Self
    }
}

impl Console for TerminalConsole {
    fn prompt_line(&mut self, prompt: &str) -> Option<String> {
        OutputFormatter::prompt(prompt);
        if let Err(e) = io::stdout().flush() {
            OutputFormatter::warning(&format!("Could not flush prompt: {}", e));
        }

        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => {
                if line.ends_with('\n') {
                    line.pop();
                    if line.ends_with('\r') {
                        line.pop();
                    }
                }
                Some(line)
            }
        }
    }

    fn status(&mut self, line: &str) {
        OutputFormatter::info(line);
    }

    fn warn(&mut self, line: &str) {
        OutputFormatter::warning(line);
    }

    fn success(&mut self, line: &str) {
        OutputFormatter::success(line);
    }
}

/// Console that replays scripted answers and records everything shown.
///
/// Each answer is an `Option<String>`: `None` stands for end of input.
/// Prompting past the end of the script panics, so a test that would loop
/// forever fails instead. Meant for tests only.
#[doc(hidden)]
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    answers: VecDeque<Option<String>>,
    /// Every prompt shown, in order.
    pub prompts: Vec<String>,
    /// Every status, warning and success line emitted, in order.
    pub lines: Vec<String>,
}

impl ScriptedConsole {
    /// Creates a console answering each prompt with the next string.
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_answers(answers.into_iter().map(|a| Some(a.into())))
    }

    /// Creates a console from raw answers, where `None` means end of input.
    pub fn with_answers<I>(answers: I) -> Self
    where
        I: IntoIterator<Item = Option<String>>,
    {
        Self {
            answers: answers.into_iter().collect(),
            prompts: Vec::new(),
            lines: Vec::new(),
        }
    }

    /// Number of answers not consumed yet.
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    /// Returns true if some recorded line starts with `prefix`.
    pub fn has_line_starting_with(&self, prefix: &str) -> bool {
        self.lines.iter().any(|line| line.starts_with(prefix))
    }
}

impl Console for ScriptedConsole {
    fn prompt_line(&mut self, prompt: &str) -> Option<String> {
        self.prompts.push(prompt.to_string());
        match self.answers.pop_front() {
            Some(answer) => answer,
            None => panic!("scripted console ran out of answers at prompt {:?}", prompt),
        }
    }

    fn status(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }

    fn warn(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_console_replays_in_order() {
        let mut console = ScriptedConsole::with_answers(vec![Some("a".to_string()), None]);
        assert_eq!(console.prompt_line("first: "), Some("a".to_string()));
        assert_eq!(console.prompt_line("second: "), None);
        assert_eq!(console.prompts, vec!["first: ", "second: "]);
        assert_eq!(console.remaining(), 0);
    }

    #[test]
    fn test_scripted_console_records_lines() {
        let mut console = ScriptedConsole::new(Vec::<String>::new());
        console.status("scanning .");
        console.warn("not found x");
        console.success("rule table saved in x");
        assert!(console.has_line_starting_with("scanning"));
        assert!(console.has_line_starting_with("not found"));
        assert_eq!(console.lines.last().unwrap(), "rule table saved in x");
        assert!(!console.has_line_starting_with("rename"));
    }

    #[test]
    #[should_panic(expected = "ran out of answers")]
    fn test_scripted_console_panics_when_exhausted() {
        let mut console = ScriptedConsole::new(Vec::<String>::new());
        console.prompt_line("replace to: ");
    }
}
