//! Claims carried inside an embed token.

use serde::{Deserialize, Serialize};

use crate::panel::PanelType;

/// Payload of an embed token.
///
/// The payload is signed but not encrypted: anyone holding the token can
/// read it, so nothing secret belongs here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedClaims {
    /// Job the token grants access to.
    pub job_id: String,
    /// Panel the token grants access to.
    pub panel_type: PanelType,
    /// Expiration (unix timestamp, seconds).
    pub exp: i64,
}
