//! Connection settings for the deployments HTTP API.

use std::time::Duration;
use thiserror::Error;

/// Default API root of the hosted platform.
pub const DEFAULT_API_BASE_URL: &str = "https://api.cloudflare.com/client/v4";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors raised while assembling client settings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientConfigError {
    /// The API base URL is empty.
    #[error("API base URL must not be empty")]
    EmptyBaseUrl,

    /// The API base URL does not use HTTP(S).
    #[error("API base URL '{0}' must start with 'http://' or 'https://'")]
    InvalidBaseUrl(String),

    /// No account identifier was supplied.
    #[error("account ID must not be empty")]
    EmptyAccountId,

    /// No API token was supplied.
    #[error("API token must not be empty")]
    EmptyApiToken,

    /// The timeout is zero.
    #[error("request timeout must be at least one second")]
    ZeroTimeout,
}

/// Validated settings for [`super::HttpDeploymentsClient`].
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    account_id: String,
    api_token: String,
    timeout: Duration,
}

impl ClientConfig {
    /// Creates settings with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ClientConfigError`] when any value is blank or the base URL
    /// is not an HTTP(S) URL.
    pub fn new(
        base_url: impl Into<String>,
        account_id: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Result<Self, ClientConfigError> {
        let raw_url = base_url.into();
        let trimmed_url = raw_url.trim().trim_end_matches('/');
        if trimmed_url.is_empty() {
            return Err(ClientConfigError::EmptyBaseUrl);
        }
        if !(trimmed_url.starts_with("http://") || trimmed_url.starts_with("https://")) {
            return Err(ClientConfigError::InvalidBaseUrl(raw_url));
        }

        let account = account_id.into().trim().to_owned();
        if account.is_empty() {
            return Err(ClientConfigError::EmptyAccountId);
        }
        let token = api_token.into().trim().to_owned();
        if token.is_empty() {
            return Err(ClientConfigError::EmptyApiToken);
        }

        Ok(Self {
            base_url: trimmed_url.to_owned(),
            account_id: account,
            api_token: token,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Overrides the per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ClientConfigError::ZeroTimeout`] when `seconds` is zero.
    pub fn with_timeout_secs(mut self, seconds: u64) -> Result<Self, ClientConfigError> {
        if seconds == 0 {
            return Err(ClientConfigError::ZeroTimeout);
        }
        self.timeout = Duration::from_secs(seconds);
        Ok(self)
    }

    /// Returns the API root without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the account identifier.
    #[must_use]
    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// Returns the bearer token.
    #[must_use]
    pub fn api_token(&self) -> &str {
        &self.api_token
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("account_id", &self.account_id)
            .field("api_token", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}
