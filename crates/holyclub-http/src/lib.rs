//! holyclub-http - HTTP client for the HolyClub backend.
//!
//! Every request goes through [`AuthFetch`], which attaches the stored bearer
//! token and, when the backend answers 401, refreshes the token once and
//! replays the request.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use holyclub_core::{ApiUrl, MemoryTokenStore};
//! use holyclub_core::journal::EntryQuery;
//! use holyclub_http::HolyClub;
//!
//! # async fn example() -> Result<(), holyclub_core::Error> {
//! let api = ApiUrl::new("https://holy-club-back-production.up.railway.app")?;
//! let club = HolyClub::connect(api, Arc::new(MemoryTokenStore::new()))?;
//!
//! let page = club.list_entries(&EntryQuery::default().page(1, 5)).await?;
//! for entry in page.items {
//!     println!("{} {}", entry.date, entry.user.name);
//! }
//! # Ok(())
//! # }
//! ```

mod api;
mod auth_fetch;
mod client;
mod cookies;
pub mod endpoints;
mod refresh;
mod request;

pub use api::HolyClub;
pub use auth_fetch::{AuthFetch, MAX_ATTEMPTS};
pub use client::{ApiClient, ClientConfig};
pub use cookies::{SessionCookies, TOKEN_COOKIE};
pub use refresh::{RefreshOutcome, SOFT_FAIL_STATUS};
pub use request::ApiRequest;
