//! Bearer credential type.

use std::fmt;

/// The opaque bearer token sent as `Authorization: Bearer <value>`.
///
/// The client never interprets the value. Construction only checks that it
/// can travel in an HTTP header.
///
/// # Security
///
/// - Never logged or displayed in Debug output
/// - Treat as opaque; do not parse or inspect
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Create a credential from a raw token value.
    ///
    /// Surrounding whitespace is trimmed. Returns `None` when nothing is left
    /// or the value contains characters that cannot appear in a header.
    pub fn parse(raw: impl AsRef<str>) -> Option<Self> {
        let value = raw.as_ref().trim();
        if value.is_empty() || !value.bytes().all(|b| (0x21..=0x7e).contains(&b)) {
            return None;
        }
        Some(Self(value.to_string()))
    }

    /// Returns the token value.
    ///
    /// # Security
    ///
    /// Use only when constructing authorization headers or persisting.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the `Authorization` header value for this credential.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

// Hide token value in Debug output
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential").field(&"[REDACTED]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_hides_value_in_debug() {
        let token = Credential::parse("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9").unwrap();
        let debug = format!("{:?}", token);
        assert!(!debug.contains("eyJ"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn trims_streamed_whitespace() {
        let token = Credential::parse("newtoken123\n").unwrap();
        assert_eq!(token.as_str(), "newtoken123");
        assert_eq!(token.bearer(), "Bearer newtoken123");
    }

    #[test]
    fn rejects_empty_and_unsendable_values() {
        assert!(Credential::parse("").is_none());
        assert!(Credential::parse("   ").is_none());
        assert!(Credential::parse("two words").is_none());
        assert!(Credential::parse("tok\u{e9}n").is_none());
    }
}
