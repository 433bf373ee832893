//! Session document on disk.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::Utc;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use holyclub_core::error::{Error, StorageError};
use holyclub_core::{Credential, Result, TokenStore};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

fn map_io(path: &Path) -> impl Fn(std::io::Error) -> Error + '_ {
    move |err| {
        Error::Storage(StorageError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        })
    }
}

fn corrupt(path: &Path, err: serde_json::Error) -> Error {
    Error::Storage(StorageError::Corrupt {
        path: path.display().to_string(),
        message: err.to_string(),
    })
}

/// What is persisted between runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SessionDocument {
    #[serde(default)]
    token: Option<String>,
    /// Backend cookies as `name=value` pairs.
    #[serde(default)]
    cookies: Vec<String>,
    #[serde(default)]
    updated_at: Option<String>,
}

/// A [`TokenStore`] persisted to a JSON file.
///
/// The document is read once on [`open`](Self::open) and cached; reads are
/// served from memory and every change rewrites the file. Writes go to a
/// temporary file that is renamed over the document while holding an
/// exclusive lock, so a reader never sees a half-written file.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    state: RwLock<SessionDocument>,
}

impl FileTokenStore {
    /// Open the store at `path`. A missing file is an empty session.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let state = if path.exists() {
            let content = fs::read_to_string(&path).map_err(map_io(&path))?;
            if content.trim().is_empty() {
                SessionDocument::default()
            } else {
                serde_json::from_str(&content).map_err(|e| corrupt(&path, e))?
            }
        } else {
            debug!("No session file yet");
            SessionDocument::default()
        };

        Ok(Self {
            path,
            state: RwLock::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Saved backend cookies as `name=value` pairs.
    pub fn cookies(&self) -> Vec<String> {
        self.read().cookies.clone()
    }

    /// Replace the saved cookies.
    pub fn save_cookies(&self, cookies: Vec<String>) -> Result<()> {
        self.update(|doc| doc.cookies = cookies)
    }

    /// When the document was last written, as RFC 3339.
    pub fn updated_at(&self) -> Option<String> {
        self.read().updated_at.clone()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, SessionDocument> {
        self.state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn update(&self, change: impl FnOnce(&mut SessionDocument)) -> Result<()> {
        let mut state = self
            .state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut next = state.clone();
        change(&mut next);
        next.updated_at = Some(Utc::now().to_rfc3339());

        self.write(&next)?;
        *state = next;
        Ok(())
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    fn write(&self, doc: &SessionDocument) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(map_io(parent))?;
        }

        let lock_path = self.lock_path();
        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(map_io(&lock_path))?;
        lock_file.lock_exclusive().map_err(map_io(&lock_path))?;

        let result = self.replace(doc);

        if let Err(e) = FileExt::unlock(&lock_file) {
            warn!(error = %e, "Failed to release session lock");
        }
        result
    }

    fn replace(&self, doc: &SessionDocument) -> Result<()> {
        let content = serde_json::to_string_pretty(doc).map_err(|e| corrupt(&self.path, e))?;

        let temp_path = self.path.with_extension("tmp");
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&temp_path)
            .map_err(map_io(&temp_path))?;

        #[cfg(unix)]
        file.set_permissions(fs::Permissions::from_mode(0o600))
            .map_err(map_io(&temp_path))?;

        file.write_all(content.as_bytes())
            .map_err(map_io(&temp_path))?;
        file.sync_data().map_err(map_io(&temp_path))?;
        drop(file);

        fs::rename(&temp_path, &self.path).map_err(map_io(&self.path))?;
        debug!(path = %self.path.display(), "Session file written");
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Option<Credential> {
        self.read().token.as_deref().and_then(Credential::parse)
    }

    fn set(&self, credential: Credential) -> Result<()> {
        self.update(|doc| doc.token = Some(credential.as_str().to_string()))
    }

    fn clear(&self) -> Result<()> {
        self.update(|doc| doc.token = None)
    }
}
