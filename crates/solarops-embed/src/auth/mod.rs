//! Embed capability tokens.
//!
//! Issues and validates the signed, short-lived tokens that let a CRM iframe
//! view one panel of one job.

pub mod authority;
pub mod claims;

pub use authority::EmbedTokenAuthority;
pub use claims::EmbedClaims;
