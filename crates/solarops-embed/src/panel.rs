//! Embeddable panel types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The embedded view a token authorizes.
///
/// Serialized with its wire name (`QC_PANEL`, `RISK_VIEW`,
/// `CUSTOMER_PORTAL_VIEW`) in token claims and HTTP bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PanelType {
    QcPanel,
    RiskView,
    CustomerPortalView,
}

impl PanelType {
    pub const ALL: [Self; 3] = [Self::QcPanel, Self::RiskView, Self::CustomerPortalView];

    /// Wire name of the panel type.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::QcPanel => "QC_PANEL",
            Self::RiskView => "RISK_VIEW",
            Self::CustomerPortalView => "CUSTOMER_PORTAL_VIEW",
        }
    }

    /// Dashboard route serving this panel, relative to the dashboard base URL.
    pub const fn route_slug(self) -> &'static str {
        match self {
            Self::QcPanel => "/embed/qc",
            Self::RiskView => "/embed/risk",
            Self::CustomerPortalView => "/embed/portal",
        }
    }
}

impl fmt::Display for PanelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the known panel types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown panel type: {0}")]
pub struct UnknownPanelType(pub String);

impl FromStr for PanelType {
    type Err = UnknownPanelType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownPanelType(s.to_string()))
    }
}
