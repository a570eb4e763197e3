//! Embed links and session resolution.
//!
//! Wraps an [`EmbedTokenAuthority`] with the job-existence checks that guard
//! link issuance and session resolution.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::auth::{EmbedClaims, EmbedTokenAuthority};
use crate::error::{EmbedError, Result};
use crate::panel::PanelType;
use crate::store::JobStore;

/// A shareable link that opens one panel of one job in an iframe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedLink {
    pub url: String,
    pub panel_type: PanelType,
    pub job_id: String,
    pub expires_at: DateTime<Utc>,
}

/// An authorized, ephemeral view of a verified token whose job exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedSession {
    pub job_id: String,
    pub panel_type: PanelType,
    pub exp: i64,
}

impl From<EmbedClaims> for EmbedSession {
    fn from(claims: EmbedClaims) -> Self {
        Self {
            job_id: claims.job_id,
            panel_type: claims.panel_type,
            exp: claims.exp,
        }
    }
}

#[derive(Clone)]
pub struct EmbedService<S> {
    authority: Arc<EmbedTokenAuthority>,
    store: S,
}

impl<S: JobStore> EmbedService<S> {
    pub const fn new(authority: Arc<EmbedTokenAuthority>, store: S) -> Self {
        Self { authority, store }
    }

    pub fn authority(&self) -> &EmbedTokenAuthority {
        &self.authority
    }

    /// Issue a link for an existing job.
    ///
    /// The token is percent-encoded into the `token` query parameter so that
    /// decoding the query yields the token byte for byte.
    #[instrument(skip(self, panel_type), fields(panel_type = %panel_type))]
    pub async fn generate_embed_link(
        &self,
        job_id: &str,
        panel_type: PanelType,
    ) -> Result<EmbedLink> {
        if job_id.is_empty() {
            return Err(EmbedError::EmptyJobId);
        }
        self.require_job(job_id).await?;

        let (token, expires_at) = self.authority.issue_token(job_id, panel_type)?;

        let url = format!(
            "{}{}?token={}",
            self.authority.base_url(),
            panel_type.route_slug(),
            urlencoding::encode(&token)
        );

        info!(job_id, exp = expires_at.timestamp(), "Embed link issued");

        Ok(EmbedLink {
            url,
            panel_type,
            job_id: job_id.to_string(),
            expires_at,
        })
    }

    /// Verify a token and confirm its job still exists.
    #[instrument(skip_all)]
    pub async fn resolve_embed_session(&self, token: &str) -> Result<EmbedSession> {
        let claims = self.authority.verify_token(token).inspect_err(|e| {
            if let Some(reason) = e.rejection() {
                warn!(%reason, "Embed session refused");
            }
        })?;

        self.require_job(&claims.job_id).await?;

        info!(job_id = %claims.job_id, panel_type = %claims.panel_type, "Embed session resolved");
        Ok(claims.into())
    }

    async fn require_job(&self, job_id: &str) -> Result<()> {
        match self.store.find_job_by_id(job_id).await {
            Ok(Some(_)) => Ok(()),
            Ok(None) => {
                warn!(job_id, "Embed request for missing job");
                Err(EmbedError::JobNotFound(job_id.to_string()))
            }
            Err(e) => Err(EmbedError::Store(e)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::EmbedConfig;
    use crate::store::JobDatabase;

    const BASE_URL: &str = "https://dash.example.com";

    fn authority(secret: &str) -> Arc<EmbedTokenAuthority> {
        let config = EmbedConfig::new(secret, 30, BASE_URL).unwrap();
        Arc::new(EmbedTokenAuthority::new(&config))
    }

    async fn test_service() -> EmbedService<JobDatabase> {
        let db = JobDatabase::open_in_memory().await.unwrap();
        db.create_job("job-1", "Smith residence").await.unwrap();
        EmbedService::new(authority("test-secret-key-for-testing"), db)
    }

    fn token_from_url(url: &str) -> String {
        let (_, encoded) = url.split_once("?token=").unwrap();
        urlencoding::decode(encoded).unwrap().into_owned()
    }

    #[tokio::test]
    async fn qc_link_points_at_qc_route() {
        let service = test_service().await;
        let link = service
            .generate_embed_link("job-1", PanelType::QcPanel)
            .await
            .unwrap();

        assert!(link.url.starts_with("https://dash.example.com/embed/qc?"));
        assert!(link.url.contains("token="));
        assert_eq!(link.job_id, "job-1");
        assert_eq!(link.panel_type, PanelType::QcPanel);

        let token = token_from_url(&link.url);
        let claims = service.authority().verify_token(&token).unwrap();
        assert_eq!(claims.job_id, "job-1");
        assert_eq!(claims.panel_type, PanelType::QcPanel);
        assert_eq!(link.expires_at.timestamp(), claims.exp);
    }

    #[tokio::test]
    async fn each_panel_maps_to_its_route() {
        let service = test_service().await;
        for panel in PanelType::ALL {
            let link = service.generate_embed_link("job-1", panel).await.unwrap();
            let expected = format!("{BASE_URL}{}?token=", panel.route_slug());
            assert!(link.url.starts_with(&expected), "{}", link.url);
        }
    }

    #[tokio::test]
    async fn link_token_survives_url_decoding() {
        let service = test_service().await;
        let link = service
            .generate_embed_link("job-1", PanelType::CustomerPortalView)
            .await
            .unwrap();

        let (_, encoded) = link.url.split_once("?token=").unwrap();
        assert!(!encoded.contains(' '));
        assert!(!encoded.contains('+'));

        let token = token_from_url(&link.url);
        assert!(!token.contains(' '));
        assert!(!token.contains('+'));
        assert!(service.authority().verify_token(&token).is_ok());
    }

    #[tokio::test]
    async fn expires_at_serializes_as_iso_8601() {
        let service = test_service().await;
        let link = service
            .generate_embed_link("job-1", PanelType::RiskView)
            .await
            .unwrap();

        let json = serde_json::to_value(&link).unwrap();
        let expires_at = json["expiresAt"].as_str().unwrap();
        let parsed = DateTime::parse_from_rfc3339(expires_at).unwrap();
        assert_eq!(parsed.timestamp(), link.expires_at.timestamp());
        assert_eq!(json["panelType"], "RISK_VIEW");
        assert_eq!(json["jobId"], "job-1");
    }

    #[tokio::test]
    async fn link_for_missing_job_fails() {
        let service = test_service().await;
        let err = service
            .generate_embed_link("job-404", PanelType::QcPanel)
            .await
            .unwrap_err();

        assert!(matches!(err, EmbedError::JobNotFound(ref id) if id == "job-404"));
        assert!(err.to_string().contains("job-404"));
    }

    #[tokio::test]
    async fn link_for_empty_job_id_fails() {
        let service = test_service().await;
        let err = service
            .generate_embed_link("", PanelType::QcPanel)
            .await
            .unwrap_err();
        assert!(matches!(err, EmbedError::EmptyJobId));
    }

    #[tokio::test]
    async fn resolve_session_for_valid_token() {
        let service = test_service().await;
        let token = service
            .authority()
            .generate_token("job-1", PanelType::RiskView)
            .unwrap();

        let session = service.resolve_embed_session(&token).await.unwrap();
        let claims = service.authority().verify_token(&token).unwrap();
        assert_eq!(session, EmbedSession::from(claims));
        assert_eq!(session.job_id, "job-1");
        assert_eq!(session.panel_type, PanelType::RiskView);
    }

    #[tokio::test]
    async fn resolve_session_for_deleted_job_fails() {
        let db = JobDatabase::open_in_memory().await.unwrap();
        db.create_job("job-9", "Soon gone").await.unwrap();
        let service = EmbedService::new(authority("test-secret-key-for-testing"), db.clone());

        let token = service
            .authority()
            .generate_token("job-9", PanelType::QcPanel)
            .unwrap();
        db.delete_job("job-9").await.unwrap();

        let err = service.resolve_embed_session(&token).await.unwrap_err();
        assert!(matches!(err, EmbedError::JobNotFound(_)));
        assert_eq!(err.to_string(), "Job not found: job-9");
    }

    #[tokio::test]
    async fn resolve_session_propagates_invalid_token() {
        let service = test_service().await;
        let err = service
            .resolve_embed_session("invalid.token.here")
            .await
            .unwrap_err();
        assert!(matches!(err, EmbedError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn resolve_session_rejects_foreign_secret() {
        let service = test_service().await;
        let foreign = authority("some-other-deployment-secret");
        let token = foreign.generate_token("job-1", PanelType::QcPanel).unwrap();

        let err = service.resolve_embed_session(&token).await.unwrap_err();
        assert!(matches!(err, EmbedError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn concurrent_resolutions_agree() {
        let service = Arc::new(test_service().await);
        let token = service
            .authority()
            .generate_token("job-1", PanelType::QcPanel)
            .unwrap();

        let (a, b) = tokio::join!(
            service.resolve_embed_session(&token),
            service.resolve_embed_session(&token)
        );
        assert_eq!(a.unwrap(), b.unwrap());
    }

    struct FailingStore;

    impl JobStore for FailingStore {
        async fn find_job_by_id(
            &self,
            _id: &str,
        ) -> std::result::Result<Option<crate::store::Job>, crate::store::StoreError> {
            Err("connection reset".into())
        }
    }

    #[tokio::test]
    async fn store_failures_propagate() {
        let service = EmbedService::new(authority("test-secret-key-for-testing"), FailingStore);
        let err = service
            .generate_embed_link("job-1", PanelType::QcPanel)
            .await
            .unwrap_err();
        assert!(matches!(err, EmbedError::Store(_)));
    }
}
