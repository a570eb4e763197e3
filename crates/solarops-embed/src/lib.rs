//! `SolarOps` Embed Library
//!
//! Signed, short-lived capability tokens that let a third-party CRM iframe
//! view one panel of one job without a user login:
//! - Token issuance and verification (`auth`)
//! - Embed link construction and session resolution (`service`)
//! - Job lookup capability with a `SQLite` implementation (`store`)
//! - Thin axum surface for link and session endpoints (`http`)
//!
//! Tokens cannot be revoked before they expire; keep the TTL short.

pub mod auth;
pub mod clock;
pub mod config;
pub mod error;
pub mod http;
pub mod panel;
pub mod service;
pub mod store;

pub use auth::{EmbedClaims, EmbedTokenAuthority};
pub use config::EmbedConfig;
pub use error::{EmbedError, TokenRejection};
pub use panel::PanelType;
pub use service::{EmbedLink, EmbedService, EmbedSession};
pub use store::{Job, JobDatabase, JobStore};
