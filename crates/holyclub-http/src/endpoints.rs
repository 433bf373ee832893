//! Backend endpoint paths.

/// Token exchange after an external login (GET) and logout (DELETE).
pub const TOKEN: &str = "/token";

/// Bearer token refresh, authenticated by the session cookie.
pub const TOKEN_REFRESH: &str = "/token/refresh";

/// Entry feed and entry creation; `/pober/{id}` for a single entry.
pub const POBER: &str = "/pober";

/// Like toggle; `/pober/like/{id}`.
pub const POBER_LIKE: &str = "/pober/like";

/// Comment creation; `/pober-comment/{id}` for edits and deletes.
pub const POBER_COMMENT: &str = "/pober-comment";

/// The signed-in user's profile.
pub const USER_ME: &str = "/user/me";

/// Prayer minutes per weekday for the current week.
pub const STAT_WEEK_PRAYER: &str = "/pober/stat/week/prayer";

/// Passages read per weekday for the current week.
pub const STAT_WEEK_BIBLE: &str = "/pober/stat/week/bible";
