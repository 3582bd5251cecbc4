use serde::{Deserialize, Serialize};

/// Whether an operator is available to answer prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// A live operator session is attached to the input stream.
    Interactive,
    /// CI, scripts, piped input.
    NonInteractive,
}

impl ExecutionMode {
    pub fn is_interactive(&self) -> bool {
        matches!(self, ExecutionMode::Interactive)
    }
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionMode::Interactive => write!(f, "interactive"),
            ExecutionMode::NonInteractive => write!(f, "non-interactive"),
        }
    }
}
