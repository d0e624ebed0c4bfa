//! HTTP DTOs for klippekort endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::klippekort::{
    ConsumeKlippekortResult, KlippekortPackageOffer, KlippekortWithDetails,
    PurchaseKlippekortResult,
};
use crate::domain::foundation::KlippekortPackageId;
use crate::domain::klippekort::{KlippekortPackage, UserKlippekort};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to buy a card from a package.
#[derive(Debug, Clone, Deserialize)]
pub struct PurchaseKlippekortRequest {
    pub package_id: KlippekortPackageId,
}

/// Request to spend sessions. `count` defaults to a single session.
#[derive(Debug, Clone, Deserialize)]
pub struct ConsumeKlippekortRequest {
    #[serde(default = "one")]
    pub count: u32,
}

fn one() -> u32 {
    1
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct KlippekortListResponse {
    pub klippekort: Vec<KlippekortWithDetails>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PurchaseKlippekortResponse {
    pub klippekort: UserKlippekort,
    pub package: KlippekortPackage,
}

impl From<PurchaseKlippekortResult> for PurchaseKlippekortResponse {
    fn from(result: PurchaseKlippekortResult) -> Self {
        Self {
            klippekort: result.klippekort,
            package: result.package,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConsumeKlippekortResponse {
    pub klippekort: UserKlippekort,
    pub remaining: u32,
}

impl From<ConsumeKlippekortResult> for ConsumeKlippekortResponse {
    fn from(result: ConsumeKlippekortResult) -> Self {
        Self {
            klippekort: result.klippekort,
            remaining: result.remaining,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PackageListResponse {
    pub packages: Vec<KlippekortPackageOffer>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consume_count_defaults_to_one() {
        let request: ConsumeKlippekortRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.count, 1);

        let request: ConsumeKlippekortRequest = serde_json::from_str(r#"{"count":3}"#).unwrap();
        assert_eq!(request.count, 3);
    }

    #[test]
    fn negative_count_is_rejected() {
        let result: Result<ConsumeKlippekortRequest, _> = serde_json::from_str(r#"{"count":-1}"#);
        assert!(result.is_err());
    }
}
