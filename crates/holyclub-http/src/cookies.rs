//! Session cookie jar shared by every request.

use std::sync::Arc;

use reqwest::cookie::{CookieStore, Jar};
use url::Url;

use holyclub_core::{ApiUrl, Credential};

/// Name of the cookie the backend uses as a fallback token channel.
pub const TOKEN_COOKIE: &str = "token";

/// Cookies for the backend origin.
///
/// Every request carries these, so the refresh and token-exchange calls can
/// identify the session independently of an expired bearer token. The
/// backend sets them through `Set-Cookie`; the client only reads them,
/// restores them from disk, and expires them on logout.
#[derive(Debug, Clone)]
pub struct SessionCookies {
    jar: Arc<Jar>,
    origin: Url,
}

impl SessionCookies {
    /// An empty jar for the backend at `api`.
    pub fn new(api: &ApiUrl) -> Self {
        Self {
            jar: Arc::new(Jar::default()),
            origin: api.as_url().clone(),
        }
    }

    /// The jar to install as the HTTP client's cookie provider.
    pub(crate) fn jar(&self) -> Arc<Jar> {
        Arc::clone(&self.jar)
    }

    /// Store a cookie as if the backend had sent it, e.g. `"SESSION=abc"`.
    pub fn add(&self, cookie: &str) {
        let cookie = if cookie.to_ascii_lowercase().contains("path=") {
            cookie.to_string()
        } else {
            format!("{}; Path=/", cookie)
        };
        self.jar.add_cookie_str(&cookie, &self.origin);
    }

    /// Store previously saved `name=value` pairs.
    pub fn restore<I, S>(&self, cookies: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for cookie in cookies {
            self.add(cookie.as_ref());
        }
    }

    /// The current cookies as `name=value` pairs, for persisting.
    pub fn snapshot(&self) -> Vec<String> {
        let Some(header) = self.jar.cookies(&self.origin) else {
            return Vec::new();
        };
        let Ok(header) = header.to_str() else {
            return Vec::new();
        };
        header
            .split(';')
            .map(str::trim)
            .filter(|pair| !pair.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// The value of cookie `name`, if set.
    pub fn get(&self, name: &str) -> Option<String> {
        self.snapshot().into_iter().find_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            (key == name).then(|| value.to_string())
        })
    }

    /// The fallback credential carried in the `token` cookie.
    pub fn fallback_token(&self) -> Option<Credential> {
        self.get(TOKEN_COOKIE).and_then(Credential::parse)
    }

    /// Drop cookie `name`.
    pub fn expire(&self, name: &str) {
        self.jar
            .add_cookie_str(&format!("{}=; Max-Age=0; Path=/", name), &self.origin);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cookies() -> SessionCookies {
        SessionCookies::new(&ApiUrl::new("https://api.example.org").unwrap())
    }

    #[test]
    fn reads_fallback_token() {
        let cookies = cookies();
        assert!(cookies.fallback_token().is_none());

        cookies.add("SESSION=s1");
        cookies.add("token=abc");
        assert_eq!(cookies.fallback_token().unwrap().as_str(), "abc");
        assert_eq!(cookies.get("SESSION").as_deref(), Some("s1"));
    }

    #[test]
    fn expire_removes_cookie() {
        let cookies = cookies();
        cookies.restore(["token=abc", "SESSION=s1"]);
        cookies.expire(TOKEN_COOKIE);

        assert!(cookies.get(TOKEN_COOKIE).is_none());
        assert_eq!(cookies.snapshot(), vec!["SESSION=s1".to_string()]);
    }

    #[test]
    fn empty_token_cookie_is_no_fallback() {
        let cookies = cookies();
        cookies.add("token=");
        assert!(cookies.fallback_token().is_none());
    }
}
