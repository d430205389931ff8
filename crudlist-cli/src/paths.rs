//! Platform-specific directory paths.
//!
//! Uses XDG on Linux, standard locations on macOS/Windows.

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use directories::ProjectDirs;

const QUALIFIER: &str = "dev";
const ORGANIZATION: &str = "crudlist";
const APPLICATION: &str = "crudlist";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Get the cache directory, where logs go.
///
/// - Linux: `$XDG_CACHE_HOME/crudlist` or `~/.cache/crudlist`
/// - macOS: `~/Library/Caches/dev.crudlist.crudlist`
/// - Windows: `C:\Users\<User>\AppData\Local\crudlist\crudlist\cache`
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Get the config directory, where list preferences go.
///
/// - Linux: `$XDG_CONFIG_HOME/crudlist` or `~/.config/crudlist`
/// - macOS: `~/Library/Application Support/dev.crudlist.crudlist`
/// - Windows: `C:\Users\<User>\AppData\Roaming\crudlist\crudlist\config`
pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the preferences file of a list.
pub fn prefs_file(key: &str) -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("lists").join(format!("{key}.json")))
}

/// Get the path to the latest log file.
pub fn log_file() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join("latest.log"))
}

/// Keeps the log of the previous run as `previous.log`.
///
/// Call this at startup before creating the new log file.
pub fn rotate_logs() {
    if let Some(cache) = cache_dir() {
        rotate_in(&cache);
    }
}

fn rotate_in(dir: &Path) {
    let latest = dir.join("latest.log");
    if latest.exists() {
        let _ = fs::rename(&latest, dir.join("previous.log"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate_keeps_one_previous_log() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("latest.log"), "first run").unwrap();
        rotate_in(dir.path());
        fs::write(dir.path().join("latest.log"), "second run").unwrap();
        rotate_in(dir.path());

        assert!(!dir.path().join("latest.log").exists());
        let previous = fs::read_to_string(dir.path().join("previous.log")).unwrap();
        assert_eq!(previous, "second run");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_prefs_file_name() {
        if let Some(path) = prefs_file("servers") {
            assert!(path.ends_with("lists/servers.json"));
        }
    }
}
