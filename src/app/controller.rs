use std::path::{Path, PathBuf};

use tracing::debug;
use tracing_appender::non_blocking::WorkerGuard;

use crate::adapters::EnvFileConfigStore;
use crate::app::resolver::{DirectoryResolver, ResolvedDir};
use crate::app::setup::{apply_defaults, setup_working_directory};
use crate::domain::config::CONFIG_FILE_NAME;
use crate::domain::{DomainError, LoggingConfig};
use crate::infrastructure::{default_logs_dir, init_logging};
use crate::ports::{ConfigStore, Prompter};

/// Application controller that wires the resolver, the prompter and logging
/// together for the command handlers.
pub struct AppController {
    resolver: DirectoryResolver,
    prompter: Box<dyn Prompter>,
    _log_guard: Option<WorkerGuard>,
}

impl AppController {
    /// Initialize logging and build the controller.
    pub fn new(
        resolver: DirectoryResolver,
        prompter: Box<dyn Prompter>,
        logging: &LoggingConfig,
        logs_dir: Option<PathBuf>,
    ) -> Result<Self, DomainError> {
        let logs_dir = logs_dir
            .or_else(default_logs_dir)
            .unwrap_or_else(|| resolver.cwd().join("logs"));
        let log_guard = init_logging(logging, &logs_dir)?;

        debug!(
            cwd = ?resolver.cwd(),
            mode = %prompter.mode(),
            "AppController initialized"
        );

        Ok(Self {
            resolver,
            prompter,
            _log_guard: log_guard,
        })
    }

    pub fn resolver(&self) -> &DirectoryResolver {
        &self.resolver
    }

    pub fn prompter(&self) -> &dyn Prompter {
        self.prompter.as_ref()
    }

    /// Run first-time configuration for `package_name`.
    pub fn setup(&self, package_name: &str, quiet: bool) -> Result<EnvFileConfigStore, DomainError> {
        setup_working_directory(&self.resolver, package_name, self.prompter(), quiet)
    }

    /// Configure `dir` as both the working directory and the config location.
    pub fn setup_in(&self, dir: &Path, package_name: &str) -> Result<EnvFileConfigStore, DomainError> {
        let store = self.open_store(Some(dir))?;
        apply_defaults(&store, package_name, &store.base_dir())?;
        Ok(store)
    }

    /// Open the store in `dir`, or wherever the resolver places the config
    /// file when no directory is given.
    pub fn open_store(&self, dir: Option<&Path>) -> Result<EnvFileConfigStore, DomainError> {
        EnvFileConfigStore::open(self.config_dir(dir))
    }

    pub fn working_dir(&self) -> Option<ResolvedDir> {
        self.resolver.resolve_working_directory()
    }

    pub fn marker_dir(&self) -> Option<PathBuf> {
        self.resolver.find_marker_directory()
    }

    /// Path of the config file `open_store` would use.
    pub fn config_path(&self, dir: Option<&Path>) -> PathBuf {
        self.config_dir(dir).join(CONFIG_FILE_NAME)
    }

    fn config_dir(&self, dir: Option<&Path>) -> PathBuf {
        match dir {
            Some(dir) => self.resolver.absolutize(dir),
            None => {
                let working_dir = self
                    .working_dir()
                    .map(|resolved| self.resolver.absolutize(&resolved.path))
                    .unwrap_or_else(|| self.resolver.cwd().to_path_buf());
                self.resolver.config_location(&working_dir)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::NonInteractivePrompter;
    use std::fs;
    use tempfile::TempDir;

    fn controller(cwd: &Path) -> AppController {
        let resolver = DirectoryResolver::new(cwd).with_marker("no-such-marker-anywhere");
        AppController::new(
            resolver,
            Box::new(NonInteractivePrompter),
            &LoggingConfig::default(),
            Some(cwd.join("logs")),
        )
        .unwrap()
    }

    #[test]
    fn test_open_store_explicit_dir() {
        let dir = TempDir::new().unwrap();
        let cwd = fs::canonicalize(dir.path()).unwrap();
        let controller = controller(&cwd);

        let store = controller.open_store(Some(Path::new("sub"))).unwrap();
        assert_eq!(store.base_dir(), cwd.join("sub"));
        assert_eq!(controller.config_path(Some(Path::new("sub"))), cwd.join("sub").join(".env"));
    }

    #[test]
    fn test_open_store_follows_working_dir() {
        let dir = TempDir::new().unwrap();
        let cwd = fs::canonicalize(dir.path()).unwrap();
        let work = cwd.join("work");
        fs::write(cwd.join(".env"), format!("WORKING_DIR={}\n", work.display())).unwrap();

        let controller = controller(&cwd);
        assert_eq!(controller.config_path(None), work.join(".env"));
    }

    #[test]
    fn test_setup_in_explicit_dir() {
        let dir = TempDir::new().unwrap();
        let cwd = fs::canonicalize(dir.path()).unwrap();
        let controller = controller(&cwd);

        let store = controller.setup_in(Path::new("data"), "TestPackage").unwrap();
        assert_eq!(store.base_dir(), cwd.join("data"));
        assert_eq!(store.get("WORKING_DIR"), Some(cwd.join("data").to_string_lossy().to_string()));
    }

    #[test]
    fn test_setup_then_open_store_sees_same_file() {
        let dir = TempDir::new().unwrap();
        let cwd = fs::canonicalize(dir.path()).unwrap();
        let controller = controller(&cwd);

        let created = controller.setup("TestPackage", true).unwrap();
        let opened = controller.open_store(None).unwrap();
        assert_eq!(created.config_path(), opened.config_path());
        assert_eq!(opened.get("APP_NAME").as_deref(), Some("TestPackage"));
    }
}
