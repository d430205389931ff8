//! Saved list preferences

use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::Context;
use crudlist_lib::view::ListPrefs;

use crate::paths;

/// Loads the preferences of a collection, or defaults.
pub fn load(key: &str) -> ListPrefs {
    let Some(path) = paths::prefs_file(key) else {
        return ListPrefs::default();
    };
    match fs::read_to_string(&path) {
        Ok(json) => serde_json::from_str(&json).unwrap_or_else(|err| {
            log::warn!("ignoring unreadable preferences {}: {err}", path.display());
            ListPrefs::default()
        }),
        Err(err) if err.kind() == io::ErrorKind::NotFound => ListPrefs::default(),
        Err(err) => {
            log::warn!("failed to read {}: {err}", path.display());
            ListPrefs::default()
        }
    }
}

/// Saves the preferences of a collection. Returns where they went.
pub fn save(key: &str, prefs: &ListPrefs) -> anyhow::Result<PathBuf> {
    let path = paths::prefs_file(key).context("no config directory")?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    }
    fs::write(&path, serde_json::to_string_pretty(prefs)?)
        .with_context(|| format!("failed to write {}", path.display()))?;
    log::debug!("saved preferences of {key} to {}", path.display());
    Ok(path)
}

/// Forgets the preferences of a collection. Returns `false` if none were saved.
pub fn reset(key: &str) -> anyhow::Result<bool> {
    let Some(path) = paths::prefs_file(key) else {
        return Ok(false);
    };
    match fs::remove_file(&path) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err).with_context(|| format!("failed to remove {}", path.display())),
    }
}
