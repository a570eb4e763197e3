//! Embed token configuration.
//!
//! Read once at startup and moved into the [`EmbedTokenAuthority`]; never
//! refreshed while the process runs. Rotating the secret requires a restart
//! and invalidates every outstanding token.
//!
//! [`EmbedTokenAuthority`]: crate::auth::EmbedTokenAuthority

use url::Url;

/// TTL used when no explicit value is configured.
pub const DEFAULT_TTL_MINUTES: u32 = 60;

/// Shortest accepted signing secret, in bytes.
pub const MIN_SECRET_LEN: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Embed signing secret is not set")]
    MissingSecret,

    #[error("Embed signing secret must be at least {MIN_SECRET_LEN} bytes (got {0})")]
    SecretTooShort(usize),

    #[error("Embed token TTL must be at least one minute")]
    InvalidTtl,

    #[error("Invalid dashboard base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Validated, immutable embed configuration.
#[derive(Clone)]
pub struct EmbedConfig {
    secret: Vec<u8>,
    ttl_minutes: u32,
    base_url: String,
}

impl EmbedConfig {
    /// Validate and build the configuration.
    ///
    /// The base URL must be an absolute `http`/`https` URL. A trailing `/` is
    /// dropped so route slugs can be appended directly.
    pub fn new(
        secret: impl Into<Vec<u8>>,
        ttl_minutes: u32,
        base_url: &str,
    ) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(ConfigError::MissingSecret);
        }
        if secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::SecretTooShort(secret.len()));
        }
        if ttl_minutes == 0 {
            return Err(ConfigError::InvalidTtl);
        }

        let parsed =
            Url::parse(base_url).map_err(|e| ConfigError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl(format!(
                "{base_url}: scheme must be http or https"
            )));
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(ConfigError::InvalidBaseUrl(format!(
                "{base_url}: must not carry a query or fragment"
            )));
        }

        Ok(Self {
            secret,
            ttl_minutes,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub(crate) fn secret(&self) -> &[u8] {
        &self.secret
    }

    pub const fn ttl_minutes(&self) -> u32 {
        self.ttl_minutes
    }

    pub fn ttl_secs(&self) -> i64 {
        i64::from(self.ttl_minutes) * 60
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

// The secret never appears in logs.
impl std::fmt::Debug for EmbedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbedConfig")
            .field("secret", &"<redacted>")
            .field("ttl_minutes", &self.ttl_minutes)
            .field("base_url", &self.base_url)
            .finish()
    }
}
