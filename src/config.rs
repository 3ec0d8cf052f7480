//! Service settings threaded into every component that talks to the network.
//!
//! Settings are an explicit immutable value passed as a parameter, never
//! process-wide mutable state. The binary builds one from CLI flags; library
//! callers construct it directly or start from [`Settings::default`].

/// Placeholder endpoint used when no API URL is configured.
pub const DEFAULT_API_URL: &str = "http://localhost/layout-parsing";

/// Connection parameters for the remote document-understanding service.
///
/// # Example
/// ```rust
/// use doclens::Settings;
///
/// let settings = Settings {
///     api_url: "http://localhost:8080/layout-parsing".into(),
///     api_key: "secret-key".into(),
///     ..Settings::default()
/// };
/// assert_eq!(settings.bearer_token(), Some("secret-key"));
/// ```
#[derive(Debug, Clone)]
pub struct Settings {
    /// Endpoint URL of the recognition service.
    pub api_url: String,

    /// API key; when non-empty every request carries
    /// `Authorization: Bearer <key>`.
    pub api_key: String,

    /// Log outbound payloads and inbound responses (base64 redacted) at
    /// DEBUG level. Never alters returned values.
    pub debug: bool,

    /// Timeout for fetching a remote input URL, in seconds.
    pub download_timeout_secs: u64,

    /// Timeout for the recognition call itself, in seconds.
    pub api_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: String::new(),
            debug: false,
            download_timeout_secs: 60,
            api_timeout_secs: 120,
        }
    }
}

impl Settings {
    /// The bearer token to attach, if an API key is configured.
    pub fn bearer_token(&self) -> Option<&str> {
        if self.api_key.is_empty() {
            None
        } else {
            Some(&self.api_key)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let settings = Settings::default();
        assert_eq!(settings.api_url, "http://localhost/layout-parsing");
        assert_eq!(settings.api_key, "");
        assert!(!settings.debug);
        assert_eq!(settings.download_timeout_secs, 60);
        assert_eq!(settings.api_timeout_secs, 120);
    }

    #[test]
    fn custom_values() {
        let settings = Settings {
            api_url: "http://localhost:8080/predict".into(),
            api_key: "test-key-123".into(),
            debug: true,
            ..Settings::default()
        };
        assert_eq!(settings.api_url, "http://localhost:8080/predict");
        assert_eq!(settings.api_key, "test-key-123");
        assert!(settings.debug);
    }

    #[test]
    fn bearer_token_empty_key() {
        assert_eq!(Settings::default().bearer_token(), None);
    }

    #[test]
    fn bearer_token_with_key() {
        let settings = Settings {
            api_key: "my-secret-key".into(),
            ..Settings::default()
        };
        assert_eq!(settings.bearer_token(), Some("my-secret-key"));
    }
}
