//! Classification of token refresh responses.

use futures_util::StreamExt;
use reqwest::StatusCode;
use serde::Deserialize;

use holyclub_core::Credential;

/// Status the refresh endpoint uses to say "try the cookie token instead".
pub const SOFT_FAIL_STATUS: StatusCode = StatusCode::UNPROCESSABLE_ENTITY;

/// What a refresh attempt produced.
///
/// Computed once from the raw response, then acted on in one place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The backend issued a new token in the response body.
    Renewed(Credential),
    /// The backend answered with the soft-fail status; carries the fallback
    /// token from the `token` cookie when one is set.
    SoftFail(Option<Credential>),
    /// The backend asked the client to drop its session.
    ForceLogout,
    /// Network failure, unreadable body, or any other status.
    Failed,
}

#[derive(Debug, Deserialize)]
struct RefreshErrorBody {
    #[serde(rename = "doLogout", default)]
    do_logout: bool,
}

impl RefreshOutcome {
    /// Classify a refresh response.
    ///
    /// `body` is `None` when the body stream could not be read. `fallback` is
    /// only consulted for the soft-fail status.
    pub fn classify(
        status: StatusCode,
        body: Option<&[u8]>,
        fallback: impl FnOnce() -> Option<Credential>,
    ) -> Self {
        let json = body
            .and_then(|body| serde_json::from_slice::<serde_json::Value>(body).ok())
            .filter(serde_json::Value::is_object);

        if let Some(ref value) = json
            && let Ok(error) = RefreshErrorBody::deserialize(value)
            && error.do_logout
        {
            return RefreshOutcome::ForceLogout;
        }

        if status == SOFT_FAIL_STATUS {
            return RefreshOutcome::SoftFail(fallback());
        }

        let Some(body) = body else {
            return RefreshOutcome::Failed;
        };
        if !status.is_success() || json.is_some() {
            return RefreshOutcome::Failed;
        }

        std::str::from_utf8(body)
            .ok()
            .and_then(Credential::parse)
            .map_or(RefreshOutcome::Failed, RefreshOutcome::Renewed)
    }

    /// The credential to retry with, if this outcome produced one.
    pub fn credential(&self) -> Option<&Credential> {
        match self {
            RefreshOutcome::Renewed(credential) => Some(credential),
            RefreshOutcome::SoftFail(credential) => credential.as_ref(),
            RefreshOutcome::ForceLogout | RefreshOutcome::Failed => None,
        }
    }
}

/// Read a response body chunk by chunk. `None` if the stream breaks.
pub(crate) async fn read_body(response: reqwest::Response) -> Option<Vec<u8>> {
    let mut stream = response.bytes_stream();
    let mut body = Vec::new();
    while let Some(chunk) = stream.next().await {
        match chunk {
            Ok(bytes) => body.extend_from_slice(&bytes),
            Err(e) => {
                tracing::debug!(error = %e, "Response body stream failed");
                return None;
            }
        }
    }
    Some(body)
}
