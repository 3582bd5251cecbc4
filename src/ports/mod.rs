pub mod config;
pub mod prompt;

pub use config::ConfigStore;
pub use prompt::Prompter;
