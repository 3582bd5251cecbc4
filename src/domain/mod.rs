pub mod config;
pub mod error;
pub mod execution;
pub mod idea;

pub use config::LoggingConfig;
pub use error::DomainError;
pub use execution::ExecutionMode;
pub use idea::{ContentType, IdeaInspiration};
