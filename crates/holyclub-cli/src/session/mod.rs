//! CLI session: the persisted token store wired into an API client.

pub mod storage;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use holyclub_core::error::AuthError;
use holyclub_core::{ApiUrl, Navigator, TokenStore};
use holyclub_file::FileTokenStore;
use holyclub_http::{ApiClient, AuthFetch, ClientConfig, HolyClub, SessionCookies};

use crate::output;

/// Where the session lives and which backend it talks to.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub api: ApiUrl,
    pub store_path: PathBuf,
}

impl SessionConfig {
    /// Validate the global flags.
    pub fn resolve(api: &str, store: Option<&Path>) -> Result<Self> {
        let api = ApiUrl::new(api).context("Invalid backend URL")?;
        let store_path = match store {
            Some(path) => path.to_path_buf(),
            None => storage::default_session_path()?,
        };
        Ok(Self { api, store_path })
    }
}

/// Tells the user the backend ended the session.
#[derive(Debug)]
struct ReloginNotice;

impl Navigator for ReloginNotice {
    fn logged_out(&self) {
        output::error("Your session has ended. Run 'holyclub auth login' to sign in again.");
    }
}

/// A backend client whose token and cookies persist between runs.
#[derive(Debug)]
pub struct CliSession {
    club: HolyClub,
    store: Arc<FileTokenStore>,
}

impl CliSession {
    /// Load the session file and restore its cookies into a new client.
    pub fn open(config: &SessionConfig) -> Result<Self> {
        debug!(path = %config.store_path.display(), api = %config.api, "Opening session");
        let store = Arc::new(storage::open_store(&config.store_path)?);

        let cookies = SessionCookies::new(&config.api);
        cookies.restore(store.cookies());

        let client = ApiClient::with_cookies(ClientConfig::new(config.api.clone()), cookies)
            .context("Failed to create HTTP client")?;
        let fetch = AuthFetch::new(client, store.clone()).with_navigator(Arc::new(ReloginNotice));

        Ok(Self {
            club: HolyClub::new(fetch),
            store,
        })
    }

    /// Open the session and require a stored token.
    pub fn open_logged_in(config: &SessionConfig) -> Result<Self> {
        let session = Self::open(config)?;
        if !session.store.is_logged_in() {
            return Err(AuthError::NotLoggedIn)
                .context("No active session. Run 'holyclub auth login' first.");
        }
        Ok(session)
    }

    pub fn club(&self) -> &HolyClub {
        &self.club
    }

    pub fn store(&self) -> &FileTokenStore {
        &self.store
    }

    pub fn cookies(&self) -> &SessionCookies {
        self.club.fetch().client().cookies()
    }

    /// Persist the cookies the backend set during this run.
    pub fn save(&self) -> Result<()> {
        self.store
            .save_cookies(self.cookies().snapshot())
            .context("Failed to save session cookies")
    }
}
