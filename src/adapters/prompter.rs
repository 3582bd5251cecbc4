use std::collections::VecDeque;
use std::io::{self, BufRead, IsTerminal, Write};

use parking_lot::Mutex;

use crate::domain::{DomainError, ExecutionMode};
use crate::ports::Prompter;

/// Prompts on stderr and reads answers from stdin.
pub struct StdioPrompter {
    mode: ExecutionMode,
}

impl StdioPrompter {
    /// Detect the mode from whether stdin is attached to a terminal.
    pub fn detect() -> Self {
        let mode = if io::stdin().is_terminal() {
            ExecutionMode::Interactive
        } else {
            ExecutionMode::NonInteractive
        };
        Self { mode }
    }

    pub fn with_mode(mode: ExecutionMode) -> Self {
        Self { mode }
    }
}

impl Prompter for StdioPrompter {
    fn mode(&self) -> ExecutionMode {
        self.mode
    }

    fn read_line(&self, message: &str) -> Result<String, DomainError> {
        let mut stderr = io::stderr().lock();
        write!(stderr, "{}: ", message)?;
        stderr.flush()?;

        let mut line = String::new();
        let read = io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| DomainError::Prompt(format!("failed to read answer: {}", e)))?;

        if read == 0 {
            return Err(DomainError::Prompt("input closed before an answer was given".to_string()));
        }

        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Never asks anything; used for CI and scripted runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NonInteractivePrompter;

impl Prompter for NonInteractivePrompter {
    fn mode(&self) -> ExecutionMode {
        ExecutionMode::NonInteractive
    }

    fn read_line(&self, message: &str) -> Result<String, DomainError> {
        Err(DomainError::Prompt(format!(
            "cannot ask '{}' in non-interactive mode",
            message
        )))
    }
}

/// Answers prompts from a fixed queue and records what was asked.
pub struct ScriptedPrompter {
    mode: ExecutionMode,
    answers: Mutex<VecDeque<String>>,
    asked: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn interactive<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            mode: ExecutionMode::Interactive,
            answers: Mutex::new(answers.into_iter().map(Into::into).collect()),
            asked: Mutex::new(Vec::new()),
        }
    }

    pub fn non_interactive() -> Self {
        Self {
            mode: ExecutionMode::NonInteractive,
            answers: Mutex::new(VecDeque::new()),
            asked: Mutex::new(Vec::new()),
        }
    }

    /// Messages shown so far, in order.
    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().clone()
    }
}

impl Prompter for ScriptedPrompter {
    fn mode(&self) -> ExecutionMode {
        self.mode
    }

    fn read_line(&self, message: &str) -> Result<String, DomainError> {
        self.asked.lock().push(message.to_string());
        self.answers
            .lock()
            .pop_front()
            .ok_or_else(|| DomainError::Prompt(format!("no scripted answer for '{}'", message)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_interactive_prompter_refuses() {
        let prompter = NonInteractivePrompter;
        assert_eq!(prompter.mode(), ExecutionMode::NonInteractive);
        assert!(prompter.read_line("anything").is_err());
    }

    #[test]
    fn test_scripted_prompter_answers_in_order() {
        let prompter = ScriptedPrompter::interactive(["first", "second"]);
        assert!(prompter.mode().is_interactive());
        assert_eq!(prompter.read_line("q1").unwrap(), "first");
        assert_eq!(prompter.read_line("q2").unwrap(), "second");
        assert!(prompter.read_line("q3").is_err());
        assert_eq!(prompter.asked(), vec!["q1", "q2", "q3"]);
    }

    #[test]
    fn test_stdio_prompter_with_explicit_mode() {
        let prompter = StdioPrompter::with_mode(ExecutionMode::NonInteractive);
        assert_eq!(prompter.mode(), ExecutionMode::NonInteractive);
    }
}
