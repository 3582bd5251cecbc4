//! CLI argument definitions and command handlers.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use crate::app::AppController;
use crate::domain::config::DEFAULT_PACKAGE_NAME;
use crate::domain::{ContentType, DomainError, IdeaInspiration};
use crate::ports::ConfigStore;

/// PrismQ working-directory configuration and IdeaInspiration tooling.
#[derive(Parser, Debug)]
#[command(name = "prismq")]
#[command(author, version, about = "PrismQ working-directory configuration and idea model tooling", long_about = None)]
pub struct Cli {
    /// Operate on the .env file in <DIR> instead of resolving the config location
    #[arg(short = 'd', long = "dir", global = true)]
    pub dir: Option<PathBuf>,

    /// Never prompt; use defaults where a prompt would be shown
    #[arg(long, global = true)]
    pub non_interactive: bool,

    /// Log level: trace, debug, info, warn, error (RUST_LOG takes precedence)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Also write JSON logs to a daily rotating file
    #[arg(long, global = true)]
    pub log_file: bool,

    /// Directory for log files (default: <data dir>/PrismQ/logs)
    #[arg(long, global = true)]
    pub logs_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Configure the working directory and create the .env file
    Setup {
        /// Package name stored as APP_NAME when absent
        #[arg(long, default_value = DEFAULT_PACKAGE_NAME)]
        package: String,

        /// Suppress informational messages
        #[arg(short, long)]
        quiet: bool,
    },

    /// Print a configuration value
    Get {
        key: String,

        /// Printed when the key is not set
        #[arg(long)]
        default: Option<String>,
    },

    /// Store a configuration value
    Set { key: String, value: String },

    /// Print all entries as KEY=VALUE, sorted by key
    List,

    /// Print a value, asking for it first when it is missing
    Prompt {
        key: String,

        /// Question shown to the operator
        #[arg(short, long)]
        message: String,

        /// Used for blank answers and in non-interactive mode
        #[arg(long)]
        default: Option<String>,
    },

    /// Show the resolved directories and config file as JSON
    Paths,

    /// IdeaInspiration model commands
    Idea {
        #[command(subcommand)]
        command: IdeaCommands,
    },
}

/// Idea subcommands
#[derive(Subcommand, Debug)]
pub enum IdeaCommands {
    /// Build an idea and print it as JSON
    New {
        #[arg(long = "type", value_enum, default_value_t = SourceKind::Text)]
        source_type: SourceKind,

        #[arg(long)]
        title: String,

        #[arg(long, default_value = "")]
        description: String,

        /// Body text, subtitles or transcription
        #[arg(long, default_value = "")]
        content: String,

        /// Keyword (repeatable)
        #[arg(short, long = "keyword")]
        keywords: Vec<String>,

        #[arg(long)]
        source_id: Option<String>,

        #[arg(long)]
        source_url: Option<String>,

        #[arg(long)]
        score: Option<i64>,

        #[arg(long)]
        category: Option<String>,
    },

    /// Read idea JSON (file or stdin) and print it with every field present
    Normalize {
        /// Input file; stdin when omitted
        file: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Text,
    Video,
    Audio,
    Unknown,
}

impl From<SourceKind> for ContentType {
    fn from(kind: SourceKind) -> Self {
        match kind {
            SourceKind::Text => ContentType::Text,
            SourceKind::Video => ContentType::Video,
            SourceKind::Audio => ContentType::Audio,
            SourceKind::Unknown => ContentType::Unknown,
        }
    }
}

/// Resolved paths, as printed by `paths`.
#[derive(Debug, Serialize)]
pub struct AppPaths {
    pub cwd: String,
    pub marker_dir: Option<String>,
    pub working_dir: Option<String>,
    pub working_dir_source: Option<String>,
    pub config_path: String,
}

/// Dispatch a parsed command.
pub fn execute(
    controller: &AppController,
    dir: Option<&Path>,
    command: Commands,
) -> Result<(), DomainError> {
    match command {
        Commands::Setup { package, quiet } => {
            let store = match dir {
                Some(dir) => controller.setup_in(dir, &package)?,
                None => controller.setup(&package, quiet)?,
            };
            println!("{}", store.config_path().display());
            Ok(())
        }
        Commands::Get { key, default } => {
            let store = controller.open_store(dir)?;
            match store.get(&key).or(default) {
                Some(value) => {
                    println!("{}", value);
                    Ok(())
                }
                None => Err(DomainError::Config(format!(
                    "key '{}' is not set in {}",
                    key,
                    store.config_path().display()
                ))),
            }
        }
        Commands::Set { key, value } => {
            let store = controller.open_store(dir)?;
            store.set(&key, &value)
        }
        Commands::List => {
            let store = controller.open_store(dir)?;
            for (key, value) in store.entries() {
                println!("{}={}", key, value);
            }
            Ok(())
        }
        Commands::Prompt {
            key,
            message,
            default,
        } => {
            let store = controller.open_store(dir)?;
            let value =
                store.prompt_if_missing(&key, &message, default.as_deref(), controller.prompter())?;
            println!("{}", value);
            Ok(())
        }
        Commands::Paths => {
            let paths = app_paths(controller, dir);
            println!("{}", serde_json::to_string_pretty(&paths)?);
            Ok(())
        }
        Commands::Idea { command } => execute_idea(command),
    }
}

fn app_paths(controller: &AppController, dir: Option<&Path>) -> AppPaths {
    let working_dir = controller.working_dir();

    AppPaths {
        cwd: controller.resolver().cwd().to_string_lossy().to_string(),
        marker_dir: controller
            .marker_dir()
            .map(|p| p.to_string_lossy().to_string()),
        working_dir_source: working_dir.as_ref().map(|r| r.source.to_string()),
        working_dir: working_dir.map(|r| r.path.to_string_lossy().to_string()),
        config_path: controller.config_path(dir).to_string_lossy().to_string(),
    }
}

fn execute_idea(command: IdeaCommands) -> Result<(), DomainError> {
    let idea = match command {
        IdeaCommands::New {
            source_type,
            title,
            description,
            content,
            keywords,
            source_id,
            source_url,
            score,
            category,
        } => {
            let mut idea = match ContentType::from(source_type) {
                ContentType::Text => IdeaInspiration::from_text(title, description, content),
                ContentType::Video => IdeaInspiration::from_video(title, description, content),
                ContentType::Audio => IdeaInspiration::from_audio(title, description, content),
                ContentType::Unknown => IdeaInspiration {
                    description,
                    content,
                    ..IdeaInspiration::new(title)
                },
            }
            .with_keywords(keywords);

            idea.source_id = source_id;
            idea.source_url = source_url;
            idea.score = score;
            idea.category = category;
            idea
        }
        IdeaCommands::Normalize { file } => {
            let json = match file {
                Some(path) => fs::read_to_string(path)?,
                None => {
                    let mut buf = String::new();
                    io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            IdeaInspiration::from_json(&json)?
        }
    };

    println!("{}", idea.to_json()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["prismq", "get", "KEY", "--dir", "/tmp/x", "--non-interactive"]);
        assert!(cli.non_interactive);
        assert_eq!(cli.dir, Some(PathBuf::from("/tmp/x")));
        assert!(matches!(cli.command, Commands::Get { ref key, default: None } if key == "KEY"));
    }

    #[test]
    fn test_parse_idea_new() {
        let cli = Cli::parse_from([
            "prismq", "idea", "new", "--type", "audio", "--title", "Episode 1", "-k", "a", "-k", "b",
        ]);
        match cli.command {
            Commands::Idea {
                command: IdeaCommands::New {
                    source_type,
                    keywords,
                    ..
                },
            } => {
                assert_eq!(ContentType::from(source_type), ContentType::Audio);
                assert_eq!(keywords, vec!["a", "b"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
