#![forbid(unsafe_code)]

pub mod adapters;
pub mod app;
pub mod commands;
pub mod domain;
pub mod infrastructure;
pub mod ports;

use anyhow::Context;
use clap::Parser;

use adapters::{NonInteractivePrompter, StdioPrompter};
use app::{AppController, DirectoryResolver};
use commands::{execute, Cli};
use domain::LoggingConfig;
use ports::Prompter;

pub use adapters::EnvFileConfigStore;
pub use app::setup_working_directory;
pub use domain::{ContentType, DomainError, ExecutionMode, IdeaInspiration};
pub use ports::ConfigStore;

/// Parse the command line and run the selected command.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let resolver = DirectoryResolver::from_env().context("failed to resolve directories")?;

    let prompter: Box<dyn Prompter> = if cli.non_interactive {
        Box::new(NonInteractivePrompter)
    } else {
        Box::new(StdioPrompter::detect())
    };

    let logging = LoggingConfig {
        level: cli.log_level.clone(),
        file_logging: cli.log_file,
        ..LoggingConfig::default()
    };

    let controller = AppController::new(resolver, prompter, &logging, cli.logs_dir.clone())
        .context("failed to initialize")?;

    execute(&controller, cli.dir.as_deref(), cli.command)?;
    Ok(())
}
