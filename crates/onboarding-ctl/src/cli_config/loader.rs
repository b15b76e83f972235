//! Profile file discovery and loading for `.onboarding-cli.toml`.
//!
//! An explicit `--config <path>` wins. Otherwise two locations are checked in
//! precedence order:
//! 1. `./.onboarding-cli.toml` (project-local)
//! 2. `~/.config/onboarding-cli.toml` (user-global)

use std::path::{Path, PathBuf};

use onboarding_client::{ClientResult, ProfileConfigFile};

pub const CONFIG_FILENAME: &str = ".onboarding-cli.toml";
const GLOBAL_CONFIG_DIR: &str = ".config";
const GLOBAL_CONFIG_FILENAME: &str = "onboarding-cli.toml";

/// Load the profile file to resolve against.
///
/// A file named with `--config` must load; a discovered one that fails to
/// parse is skipped with a warning.
pub fn load_profile_file(explicit: Option<&Path>) -> ClientResult<Option<ProfileConfigFile>> {
    if let Some(path) = explicit {
        return ProfileConfigFile::load(path).map(Some);
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let home = home_dir();
    Ok(find_config_file(&cwd, home.as_deref()).and_then(|path| load_discovered(&path)))
}

fn load_discovered(path: &Path) -> Option<ProfileConfigFile> {
    match ProfileConfigFile::load(path) {
        Ok(file) => Some(file),
        Err(e) => {
            tracing::warn!(?path, error = %e, "Failed to load profile file, using defaults");
            None
        }
    }
}

/// Search for a profile file in precedence order.
fn find_config_file(cwd: &Path, home: Option<&Path>) -> Option<PathBuf> {
    let local = cwd.join(CONFIG_FILENAME);
    if local.is_file() {
        return Some(local);
    }

    let global = home?.join(GLOBAL_CONFIG_DIR).join(GLOBAL_CONFIG_FILENAME);
    global.is_file().then_some(global)
}

fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_local_file_wins_over_global() {
        let cwd = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        fs::write(cwd.path().join(CONFIG_FILENAME), "").unwrap();
        fs::create_dir_all(home.path().join(".config")).unwrap();
        fs::write(home.path().join(".config/onboarding-cli.toml"), "").unwrap();

        let found = find_config_file(cwd.path(), Some(home.path())).unwrap();
        assert_eq!(found, cwd.path().join(CONFIG_FILENAME));
    }

    #[test]
    fn test_falls_back_to_global_file() {
        let cwd = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        fs::create_dir_all(home.path().join(".config")).unwrap();
        fs::write(home.path().join(".config/onboarding-cli.toml"), "").unwrap();

        let found = find_config_file(cwd.path(), Some(home.path())).unwrap();
        assert!(found.ends_with(".config/onboarding-cli.toml"));
    }

    #[test]
    fn test_no_file_found() {
        let cwd = tempfile::tempdir().unwrap();
        assert!(find_config_file(cwd.path(), None).is_none());
    }

    #[test]
    fn test_malformed_discovered_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "[profile.local\nbroken").unwrap();

        assert!(load_discovered(&path).is_none());
    }

    #[test]
    fn test_malformed_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "[profile.local\nbroken").unwrap();

        assert!(load_profile_file(Some(&path)).is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_profile_file(Some(&dir.path().join("absent.toml"))).is_err());
    }

    #[test]
    fn test_explicit_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(
            &path,
            r#"
[profile.local]
description = "Mocks on one port"

[profile.local.services]
broker_url = "http://localhost:9000"
"#,
        )
        .unwrap();

        let file = load_profile_file(Some(&path)).unwrap().unwrap();
        assert!(file.profile.contains_key("local"));
    }
}
