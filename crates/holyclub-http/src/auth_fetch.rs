//! Authenticated requests with one-shot token refresh.

use std::sync::Arc;

use reqwest::StatusCode;
use tracing::{debug, info, instrument, warn};

use holyclub_core::{Credential, Navigator, Result, StayPut, TokenStore};

use crate::client::ApiClient;
use crate::refresh::{RefreshOutcome, read_body};
use crate::request::ApiRequest;

/// Attempts per call: the original request plus one retry.
pub const MAX_ATTEMPTS: usize = 2;

/// Sends requests with the stored bearer token and recovers from expiry.
///
/// When a request made with a stored token comes back 401, the token is
/// refreshed through the session cookie and the request is replayed once with
/// the new token. Callers see either the replayed response or the original
/// 401; a 401 coming out of here is final.
///
/// Concurrent calls that both hit a 401 each refresh on their own; the last
/// token written wins.
#[derive(Clone)]
pub struct AuthFetch {
    client: ApiClient,
    store: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
}

impl AuthFetch {
    /// Wrap `client`, reading and writing tokens through `store`.
    pub fn new(client: ApiClient, store: Arc<dyn TokenStore>) -> Self {
        Self {
            client,
            store,
            navigator: Arc::new(StayPut),
        }
    }

    /// Use `navigator` to announce backend-initiated logouts.
    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    /// Send `request`, refreshing the token and retrying once on 401.
    ///
    /// # Errors
    ///
    /// Only transport failures of the original or the replayed request are
    /// errors. Refresh failures yield the original 401 response.
    #[instrument(skip(self, request), fields(method = %request.method(), url = %request.url()))]
    pub async fn fetch(&self, request: &ApiRequest) -> Result<reqwest::Response> {
        let Some(mut credential) = self.store.get() else {
            debug!("No stored token, sending unauthenticated");
            return self.client.send(request, None).await;
        };

        let mut attempts = 0;
        loop {
            attempts += 1;
            let response = self.client.send(request, Some(&credential)).await?;

            if response.status() != StatusCode::UNAUTHORIZED || attempts >= MAX_ATTEMPTS {
                return Ok(response);
            }

            info!("Token rejected, attempting refresh");
            match self.refresh().await.credential() {
                Some(renewed) => credential = renewed.clone(),
                None => return Ok(response),
            }
        }
    }

    /// Ask the backend for a new token and apply the result.
    ///
    /// A new token is persisted; a logout signal clears the stored token and
    /// notifies the navigator. Failures leave the stored token untouched.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> RefreshOutcome {
        let outcome = match self.client.post_refresh().await {
            Ok(response) => {
                let status = response.status();
                let body = read_body(response).await;
                RefreshOutcome::classify(status, body.as_deref(), || {
                    self.client.cookies().fallback_token()
                })
            }
            Err(e) => {
                warn!(error = %e, "Token refresh request failed");
                RefreshOutcome::Failed
            }
        };

        match &outcome {
            RefreshOutcome::Renewed(credential) | RefreshOutcome::SoftFail(Some(credential)) => {
                self.persist(credential.clone());
            }
            RefreshOutcome::ForceLogout => {
                info!("Backend ended the session");
                if let Err(e) = self.store.clear() {
                    warn!(error = %e, "Failed to clear stored token");
                }
                self.navigator.logged_out();
            }
            RefreshOutcome::SoftFail(None) => {
                debug!("Refresh soft-failed and no fallback token cookie is set");
            }
            RefreshOutcome::Failed => {
                debug!("Refresh failed");
            }
        }

        outcome
    }

    fn persist(&self, credential: Credential) {
        if let Err(e) = self.store.set(credential) {
            warn!(error = %e, "Failed to persist refreshed token");
        } else {
            debug!("Refreshed token stored");
        }
    }
}

impl std::fmt::Debug for AuthFetch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthFetch")
            .field("client", &self.client)
            .field("logged_in", &self.store.is_logged_in())
            .finish()
    }
}
