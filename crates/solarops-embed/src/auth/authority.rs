//! Embed token issuance and validation.

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

use super::claims::EmbedClaims;
use crate::clock::now_secs;
use crate::config::EmbedConfig;
use crate::error::{EmbedError, Result, TokenRejection};
use crate::panel::PanelType;

/// Creates and authenticates embed tokens.
///
/// Tokens are compact HS256 JWS strings (`header.payload.signature`, each
/// segment base64url without padding). All state is fixed at construction,
/// so a single instance can be shared across tasks without locking.
#[derive(Clone)]
pub struct EmbedTokenAuthority {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
    base_url: String,
}

impl EmbedTokenAuthority {
    /// Create an authority from validated configuration.
    pub fn new(config: &EmbedConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expired means `exp < now`, with no grace period.
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(config.secret()),
            decoding_key: DecodingKey::from_secret(config.secret()),
            validation,
            ttl_secs: config.ttl_secs(),
            base_url: config.base_url().to_string(),
        }
    }

    /// Issue a token for one panel of one job, expiring `ttl` from now.
    pub fn generate_token(&self, job_id: &str, panel_type: PanelType) -> Result<String> {
        self.issue_token(job_id, panel_type).map(|(token, _)| token)
    }

    /// Like [`generate_token`](Self::generate_token), also returning the
    /// instant named by the token's `exp` claim.
    pub fn issue_token(
        &self,
        job_id: &str,
        panel_type: PanelType,
    ) -> Result<(String, DateTime<Utc>)> {
        if job_id.is_empty() {
            return Err(EmbedError::EmptyJobId);
        }

        let exp = now_secs() + self.ttl_secs;
        let expires_at = expiry_datetime(exp)?;
        let claims = EmbedClaims {
            job_id: job_id.to_string(),
            panel_type,
            exp,
        };
        let token = self.sign(&claims)?;
        Ok((token, expires_at))
    }

    /// Check signature and expiry, returning the claims exactly as issued.
    pub fn verify_token(&self, token: &str) -> Result<EmbedClaims> {
        let data = jsonwebtoken::decode::<EmbedClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                let reason = rejection_for(e.kind());
                debug!(%reason, error = %e, "Embed token rejected");
                EmbedError::InvalidToken(reason)
            })?;
        Ok(data.claims)
    }

    /// Dashboard base URL that panel routes hang off.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub const fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    pub(crate) fn sign(&self, claims: &EmbedClaims) -> Result<String> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| EmbedError::Signing(e.to_string()))
    }
}

fn expiry_datetime(exp: i64) -> Result<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(exp, 0).ok_or(EmbedError::ExpiryOutOfRange(exp))
}

const fn rejection_for(kind: &ErrorKind) -> TokenRejection {
    match kind {
        ErrorKind::InvalidSignature => TokenRejection::BadSignature,
        ErrorKind::ExpiredSignature => TokenRejection::Expired,
        _ => TokenRejection::Malformed,
    }
}
