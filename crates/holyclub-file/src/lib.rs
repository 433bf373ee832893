//! holyclub-file - File-backed session storage.
//!
//! [`FileTokenStore`] keeps the bearer token and the backend's session
//! cookies in one JSON document so a session survives process restarts.

mod store;

pub use store::FileTokenStore;
