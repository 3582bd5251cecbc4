use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::adapters::EnvFileConfigStore;
use crate::app::resolver::DirectoryResolver;
use crate::domain::config::{APP_NAME_KEY, WORKING_DIR_KEY};
use crate::domain::DomainError;
use crate::ports::{ConfigStore, Prompter};

/// First-run configuration for `package_name`.
///
/// Resolves (or asks for) the working directory, opens the config file at
/// the location the resolver picks, makes sure it exists, then fills in
/// `APP_NAME` and `WORKING_DIR` when absent. Existing entries are kept.
pub fn setup_working_directory(
    resolver: &DirectoryResolver,
    package_name: &str,
    prompter: &dyn Prompter,
    quiet: bool,
) -> Result<EnvFileConfigStore, DomainError> {
    let working_dir = match resolver.resolve_working_directory() {
        Some(resolved) => {
            debug!(
                working_dir = ?resolved.path,
                source = %resolved.source,
                "Working directory resolved"
            );
            resolver.absolutize(&resolved.path)
        }
        None => choose_working_directory(resolver, prompter, quiet)?,
    };
    let working_dir = canonical_if_exists(&working_dir);

    let config_dir = resolver.config_location(&working_dir);
    let store = EnvFileConfigStore::open(&config_dir)?;
    apply_defaults(&store, package_name, &working_dir)?;

    if !quiet {
        info!(
            package = package_name,
            working_dir = ?working_dir,
            config_path = ?store.config_path(),
            "Working directory configured"
        );
    }

    Ok(store)
}

/// Create the config file if needed and fill in `APP_NAME` and
/// `WORKING_DIR` when they are absent.
pub fn apply_defaults(
    store: &dyn ConfigStore,
    package_name: &str,
    working_dir: &Path,
) -> Result<(), DomainError> {
    store.ensure_exists()?;

    if !store.has(APP_NAME_KEY) {
        store.set(APP_NAME_KEY, package_name)?;
    }

    if !store.has(WORKING_DIR_KEY) {
        store.set(WORKING_DIR_KEY, &working_dir.to_string_lossy())?;
    }

    Ok(())
}

/// Ask the operator, or fall back to the current directory when nobody can
/// answer.
fn choose_working_directory(
    resolver: &DirectoryResolver,
    prompter: &dyn Prompter,
    quiet: bool,
) -> Result<PathBuf, DomainError> {
    let cwd = resolver.cwd();

    if !prompter.mode().is_interactive() {
        if !quiet {
            info!(working_dir = ?cwd, "Using current directory as working directory");
        }
        return Ok(cwd.to_path_buf());
    }

    if !quiet {
        info!(current_dir = ?cwd, "Working directory not configured");
    }

    let use_current = prompter.read_line(&format!(
        "Use current directory '{}' as working directory? (Y/N)",
        cwd.display()
    ))?;
    if use_current.trim().eq_ignore_ascii_case("y") {
        return Ok(cwd.to_path_buf());
    }

    let entered = prompter.read_line("Enter the working directory path")?;
    let entered = entered.trim();
    if entered.is_empty() {
        Ok(cwd.to_path_buf())
    } else {
        Ok(resolver.absolutize(Path::new(entered)))
    }
}

fn canonical_if_exists(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ScriptedPrompter;
    use tempfile::{Builder, TempDir};

    fn canonical_tempdir(prefix: &str) -> (TempDir, PathBuf) {
        let dir = Builder::new().prefix(prefix).tempdir().unwrap();
        let path = fs::canonicalize(dir.path()).unwrap();
        (dir, path)
    }

    fn plain_resolver(cwd: &Path) -> DirectoryResolver {
        DirectoryResolver::new(cwd).with_marker("no-such-marker-anywhere")
    }

    #[test]
    fn test_creates_config_in_current_directory() {
        let (_dir, cwd) = canonical_tempdir("setup");
        let prompter = ScriptedPrompter::non_interactive();

        let store =
            setup_working_directory(&plain_resolver(&cwd), "TestPackage", &prompter, true).unwrap();

        assert_eq!(store.base_dir(), cwd);
        assert!(store.config_path().exists());
        assert_eq!(store.get("APP_NAME").as_deref(), Some("TestPackage"));
        assert_eq!(store.get("WORKING_DIR"), Some(cwd.to_string_lossy().to_string()));
        assert!(prompter.asked().is_empty());
    }

    #[test]
    fn test_uses_working_dir_override() {
        let (_cwd_dir, cwd) = canonical_tempdir("setup");
        let (_work_dir, work) = canonical_tempdir("work");

        let resolver = plain_resolver(&cwd).with_working_dir_override(Some(work.clone()));
        let store = setup_working_directory(
            &resolver,
            "TestPackage",
            &ScriptedPrompter::non_interactive(),
            true,
        )
        .unwrap();

        assert_eq!(store.base_dir(), work);
        assert!(work.join(".env").exists());
        assert!(!cwd.join(".env").exists());
    }

    #[test]
    fn test_preserves_existing_values() {
        let (_dir, work) = canonical_tempdir("work");
        let existing = EnvFileConfigStore::open(&work).unwrap();
        existing.set("APP_NAME", "ExistingApp").unwrap();
        existing.set("CUSTOM_KEY", "custom_value").unwrap();
        existing.set("WORKING_DIR", "/somewhere/else").unwrap();

        let resolver = plain_resolver(&work).with_working_dir_override(Some(work.clone()));
        let store = setup_working_directory(
            &resolver,
            "NewPackage",
            &ScriptedPrompter::non_interactive(),
            true,
        )
        .unwrap();

        assert_eq!(store.get("APP_NAME").as_deref(), Some("ExistingApp"));
        assert_eq!(store.get("CUSTOM_KEY").as_deref(), Some("custom_value"));
        assert_eq!(store.get("WORKING_DIR").as_deref(), Some("/somewhere/else"));
    }

    #[test]
    fn test_config_lives_in_marker_directory() {
        let (_dir, root) = canonical_tempdir("PrismQ.test");
        let cwd = root.join("module").join("src");
        fs::create_dir_all(&cwd).unwrap();

        let store = setup_working_directory(
            &DirectoryResolver::new(&cwd),
            "TestPackage",
            &ScriptedPrompter::non_interactive(),
            true,
        )
        .unwrap();

        assert_eq!(store.base_dir(), root);
        assert_eq!(store.get("WORKING_DIR"), Some(cwd.to_string_lossy().to_string()));
        assert!(!cwd.join(".env").exists());
    }

    #[test]
    fn test_config_dir_override_wins() {
        let (_dir, cwd) = canonical_tempdir("setup");
        let (_cfg_dir, cfg) = canonical_tempdir("config");

        let resolver = plain_resolver(&cwd).with_config_dir_override(Some(cfg.clone()));
        let store = setup_working_directory(
            &resolver,
            "TestPackage",
            &ScriptedPrompter::non_interactive(),
            true,
        )
        .unwrap();

        assert_eq!(store.base_dir(), cfg);
        assert_eq!(store.get("WORKING_DIR"), Some(cwd.to_string_lossy().to_string()));
    }

    #[test]
    fn test_interactive_accepts_current_directory() {
        let (_dir, cwd) = canonical_tempdir("setup");
        let prompter = ScriptedPrompter::interactive(["y"]);

        let store =
            setup_working_directory(&plain_resolver(&cwd), "TestPackage", &prompter, false).unwrap();

        assert_eq!(store.base_dir(), cwd);
        assert_eq!(prompter.asked().len(), 1);
    }

    #[test]
    fn test_interactive_entered_path() {
        let (_dir, cwd) = canonical_tempdir("setup");
        let target = cwd.join("chosen");
        let prompter = ScriptedPrompter::interactive(["n", "chosen"]);

        let store =
            setup_working_directory(&plain_resolver(&cwd), "TestPackage", &prompter, false).unwrap();

        assert_eq!(store.base_dir(), target);
        assert!(target.join(".env").exists());
        assert_eq!(store.get("WORKING_DIR"), Some(target.to_string_lossy().to_string()));
        assert_eq!(
            prompter.asked()[1],
            "Enter the working directory path".to_string()
        );
    }

    #[test]
    fn test_interactive_blank_path_uses_current() {
        let (_dir, cwd) = canonical_tempdir("setup");
        let prompter = ScriptedPrompter::interactive(["N", "   "]);

        let store =
            setup_working_directory(&plain_resolver(&cwd), "TestPackage", &prompter, false).unwrap();

        assert_eq!(store.base_dir(), cwd);
    }

    #[test]
    fn test_resolved_directory_skips_prompt() {
        let (_dir, cwd) = canonical_tempdir("setup");
        fs::write(
            cwd.join(".env"),
            format!("WORKING_DIR={}\n", cwd.to_string_lossy()),
        )
        .unwrap();
        let prompter = ScriptedPrompter::interactive(Vec::<String>::new());

        let store =
            setup_working_directory(&plain_resolver(&cwd), "TestPackage", &prompter, false).unwrap();

        assert!(prompter.asked().is_empty());
        assert_eq!(store.get("APP_NAME").as_deref(), Some("TestPackage"));
    }
}
