pub mod config_store;
pub mod prompter;

pub use config_store::EnvFileConfigStore;
pub use prompter::{NonInteractivePrompter, ScriptedPrompter, StdioPrompter};
