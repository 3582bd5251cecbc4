use crate::domain::{DomainError, ExecutionMode};

/// Port for asking the operator questions.
///
/// Resolver and store code never probes the terminal itself; the execution
/// mode comes from whichever prompter is injected.
pub trait Prompter: Send + Sync {
    /// Whether an operator can answer.
    fn mode(&self) -> ExecutionMode;

    /// Show `message` and read one line of input, without its line terminator.
    fn read_line(&self, message: &str) -> Result<String, DomainError>;
}
