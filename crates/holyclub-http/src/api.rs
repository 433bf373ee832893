//! Typed access to the HolyClub backend.

use std::sync::Arc;

use reqwest::StatusCode;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use holyclub_core::error::{AuthError, InvalidInputError};
use holyclub_core::journal::{
    CommentDraft, CommentId, EntryDraft, EntryId, EntryQuery, Feed, ImagePart, Page, PoberDetail,
    PoberSummary, ProfileUpdate, UserProfile, WeeklyBibleStats, WeeklyPrayerStats, WeeklySummary,
};
use holyclub_core::{ApiUrl, Credential, Result, TokenStore};

use crate::auth_fetch::AuthFetch;
use crate::client::{ApiClient, expect_success, handle_response};
use crate::cookies::TOKEN_COOKIE;
use crate::endpoints::*;
use crate::refresh::read_body;
use crate::request::ApiRequest;

#[derive(Debug, Serialize)]
struct CommentEdit<'a> {
    content: &'a str,
}

/// The HolyClub backend: session flows, entries, comments, likes, profile,
/// and weekly statistics.
///
/// Every call goes through [`AuthFetch`], so an expired token is refreshed
/// transparently.
#[derive(Debug, Clone)]
pub struct HolyClub {
    fetch: AuthFetch,
}

impl HolyClub {
    pub fn new(fetch: AuthFetch) -> Self {
        Self { fetch }
    }

    /// Connect to `api` with default client settings.
    pub fn connect(api: ApiUrl, store: Arc<dyn TokenStore>) -> Result<Self> {
        let client = ApiClient::new(api)?;
        Ok(Self::new(AuthFetch::new(client, store)))
    }

    pub fn fetch(&self) -> &AuthFetch {
        &self.fetch
    }

    pub fn api(&self) -> &ApiUrl {
        self.fetch.client().api()
    }

    /// Download URL of an uploaded file such as an avatar.
    pub fn file_url(&self, name: &str) -> String {
        self.api().file_url(name)
    }

    fn url(&self, path: &str) -> String {
        self.api().endpoint(path)
    }

    // ========================================================================
    // Session
    // ========================================================================

    /// Exchange the session cookie from an external login for a bearer token.
    ///
    /// The token is streamed as raw text and persisted.
    #[instrument(skip(self))]
    pub async fn exchange_token(&self) -> Result<Credential> {
        info!("Exchanging session cookie for a token");

        let request = ApiRequest::get(&self.url(TOKEN))?;
        let response = self.fetch.client().send(&request, None).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::LoginFailed {
                status: status.as_u16(),
            }
            .into());
        }

        let credential = read_body(response)
            .await
            .and_then(|body| String::from_utf8(body).ok())
            .and_then(Credential::parse)
            .ok_or(AuthError::UnusableToken)?;

        self.fetch.store().set(credential.clone())?;
        debug!("Token stored");
        Ok(credential)
    }

    /// End the session: tell the backend, drop the token cookie, and clear
    /// the stored token.
    ///
    /// The backend call is best effort; local state is cleared regardless.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<()> {
        info!("Logging out");

        let request = ApiRequest::delete(&self.url(TOKEN))?;
        match self.fetch.client().send(&request, None).await {
            Ok(response) => debug!(status = %response.status(), "Backend logout answered"),
            Err(e) => warn!(error = %e, "Backend logout failed"),
        }

        self.fetch.client().cookies().expire(TOKEN_COOKIE);
        self.fetch.store().clear()
    }

    /// The signed-in user's profile.
    #[instrument(skip(self))]
    pub async fn me(&self) -> Result<UserProfile> {
        let request = ApiRequest::get(&self.url(USER_ME))?;
        handle_response(self.fetch.fetch(&request).await?).await
    }

    #[instrument(skip(self, update), fields(nickname = %update.nickname()))]
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<()> {
        let request = with_form(
            ApiRequest::patch(&self.url(USER_ME))?,
            update.form_fields(),
            update.file_part(),
        )?;
        expect_success(self.fetch.fetch(&request).await?).await?;
        Ok(())
    }

    // ========================================================================
    // Entries
    // ========================================================================

    /// One page of the entry feed.
    #[instrument(skip(self))]
    pub async fn list_entries(&self, query: &EntryQuery) -> Result<Page<PoberSummary>> {
        debug!("Listing entries");
        let request = ApiRequest::get(&self.url(POBER))?.query(query.query_pairs());
        handle_response(self.fetch.fetch(&request).await?).await
    }

    /// Load the feed's next page, if it may load one now.
    ///
    /// `query` supplies the filters; its page fields are overridden. Returns
    /// false when there was nothing to load.
    pub async fn load_next(&self, feed: &mut Feed<PoberSummary>, query: &EntryQuery) -> Result<bool> {
        let Some(page) = feed.next_page() else {
            return Ok(false);
        };
        if !feed.begin(page) {
            return Ok(false);
        }

        let query = query.clone().page(page, feed.page_size());
        match self.list_entries(&query).await {
            Ok(loaded) => {
                feed.apply(page, loaded);
                Ok(true)
            }
            Err(e) => {
                feed.fail();
                Err(e)
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn entry(&self, id: EntryId) -> Result<PoberDetail> {
        let request = ApiRequest::get(&self.url(&format!("{}/{}", POBER, id)))?;
        handle_response(self.fetch.fetch(&request).await?).await
    }

    #[instrument(skip(self, draft), fields(date = %draft.date))]
    pub async fn create_entry(&self, draft: &EntryDraft) -> Result<()> {
        let request = with_form(
            ApiRequest::post(&self.url(POBER))?,
            draft.form_fields(),
            draft.file_part(),
        )?;
        expect_success(self.fetch.fetch(&request).await?).await?;
        Ok(())
    }

    #[instrument(skip(self, draft), fields(date = %draft.date))]
    pub async fn update_entry(&self, id: EntryId, draft: &EntryDraft) -> Result<()> {
        let request = with_form(
            ApiRequest::patch(&self.url(&format!("{}/{}", POBER, id)))?,
            draft.form_fields(),
            draft.file_part(),
        )?;
        expect_success(self.fetch.fetch(&request).await?).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete_entry(&self, id: EntryId) -> Result<()> {
        let request = ApiRequest::delete(&self.url(&format!("{}/{}", POBER, id)))?;
        expect_success(self.fetch.fetch(&request).await?).await?;
        Ok(())
    }

    /// Like the entry, or take the like back.
    #[instrument(skip(self))]
    pub async fn toggle_like(&self, id: EntryId) -> Result<()> {
        let request = ApiRequest::post(&self.url(&format!("{}/{}", POBER_LIKE, id)))?;
        expect_success(self.fetch.fetch(&request).await?).await?;
        Ok(())
    }

    // ========================================================================
    // Comments
    // ========================================================================

    #[instrument(skip(self, draft), fields(entry = draft.entry(), parent = ?draft.parent()))]
    pub async fn add_comment(&self, draft: &CommentDraft) -> Result<()> {
        let request = ApiRequest::post(&self.url(POBER_COMMENT))?.json(draft)?;
        expect_success(self.fetch.fetch(&request).await?).await?;
        Ok(())
    }

    #[instrument(skip(self, content))]
    pub async fn update_comment(&self, id: CommentId, content: &str) -> Result<()> {
        if content.trim().is_empty() {
            return Err(InvalidInputError::Blank { field: "comment" }.into());
        }
        let request = ApiRequest::patch(&self.url(&format!("{}/{}", POBER_COMMENT, id)))?
            .json(&CommentEdit { content })?;
        expect_success(self.fetch.fetch(&request).await?).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete_comment(&self, id: CommentId) -> Result<()> {
        let request = ApiRequest::delete(&self.url(&format!("{}/{}", POBER_COMMENT, id)))?;
        let status = expect_success(self.fetch.fetch(&request).await?).await?;
        if status == StatusCode::NO_CONTENT {
            debug!("Comment deleted");
        }
        Ok(())
    }

    // ========================================================================
    // Statistics
    // ========================================================================

    #[instrument(skip(self))]
    pub async fn weekly_prayer(&self) -> Result<WeeklyPrayerStats> {
        let request = ApiRequest::get(&self.url(STAT_WEEK_PRAYER))?;
        handle_response(self.fetch.fetch(&request).await?).await
    }

    #[instrument(skip(self))]
    pub async fn weekly_bible(&self) -> Result<WeeklyBibleStats> {
        let request = ApiRequest::get(&self.url(STAT_WEEK_BIBLE))?;
        handle_response(self.fetch.fetch(&request).await?).await
    }

    /// This week's prayer and reading, combined per weekday.
    pub async fn weekly_summary(&self) -> Result<WeeklySummary> {
        let prayer = self.weekly_prayer().await?;
        let bible = self.weekly_bible().await?;
        Ok(WeeklySummary::from_stats(&prayer, &bible))
    }
}

/// Urlencoded without a file, multipart with one.
fn with_form(
    request: ApiRequest,
    fields: Vec<(String, String)>,
    file: Option<(&str, &ImagePart)>,
) -> Result<ApiRequest> {
    match file {
        Some(file) => {
            debug!(field = file.0, size = file.1.bytes().len(), "Uploading image");
            request.multipart(fields, [file])
        }
        None => Ok(request.form(fields)),
    }
}
