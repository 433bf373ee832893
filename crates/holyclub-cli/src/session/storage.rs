//! Session file location.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;

use holyclub_file::FileTokenStore;

/// `<data dir>/holyclub/session.json`.
pub fn default_session_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("", "", "holyclub").context("Could not determine data directory")?;

    let data_dir = dirs.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data directory")?;

    Ok(data_dir.join("session.json"))
}

/// Open the session file at `path`.
pub fn open_store(path: &Path) -> Result<FileTokenStore> {
    FileTokenStore::open(path)
        .with_context(|| format!("Failed to read session file {}", path.display()))
}
