//! Klippekort package catalog entity.

use crate::domain::foundation::{KlippekortPackageId, Timestamp, ValidationError};
use serde::{Deserialize, Serialize};

/// A purchasable bundle of class sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KlippekortPackage {
    pub id: KlippekortPackageId,
    pub name: String,
    pub category: String,
    /// Number of sessions granted on purchase.
    pub klipp_count: u32,
    /// Price in øre.
    pub price: i64,
    /// Days from purchase until the card expires.
    pub validity_days: u32,
    pub active: bool,
    pub popular: bool,
    pub created_at: Timestamp,
}

/// Input for creating a package.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewKlippekortPackage {
    pub name: String,
    #[serde(default)]
    pub category: String,
    pub klipp_count: u32,
    pub price: i64,
    pub validity_days: u32,
    #[serde(default)]
    pub popular: bool,
}

impl KlippekortPackage {
    pub fn create(input: NewKlippekortPackage, created_at: Timestamp) -> Result<Self, ValidationError> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        if input.klipp_count == 0 {
            return Err(ValidationError::out_of_range(
                "klipp_count",
                1,
                i64::from(u32::MAX),
                0,
            ));
        }
        if input.price < 0 {
            return Err(ValidationError::out_of_range("price", 0, i64::MAX, input.price));
        }
        if input.validity_days == 0 {
            return Err(ValidationError::out_of_range(
                "validity_days",
                1,
                i64::from(u32::MAX),
                0,
            ));
        }

        Ok(Self {
            id: KlippekortPackageId::new(),
            name,
            category: input.category.trim().to_string(),
            klipp_count: input.klipp_count,
            price: input.price,
            validity_days: input.validity_days,
            active: true,
            popular: input.popular,
            created_at,
        })
    }

    pub fn price_per_session(&self) -> i64 {
        price_per_session(self.price, self.klipp_count)
    }
}

/// `price / klipp_count` with floor division; 0 for an empty package.
pub fn price_per_session(price: i64, klipp_count: u32) -> i64 {
    if klipp_count == 0 {
        return 0;
    }
    price.div_euclid(i64::from(klipp_count))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> NewKlippekortPackage {
        NewKlippekortPackage {
            name: "10-klipp".to_string(),
            category: "yoga".to_string(),
            klipp_count: 10,
            price: 89900,
            validity_days: 180,
            popular: true,
        }
    }

    #[test]
    fn price_per_session_floors() {
        assert_eq!(price_per_session(89900, 10), 8990);
        assert_eq!(price_per_session(1000, 3), 333);
    }

    #[test]
    fn price_per_session_of_empty_package_is_zero() {
        assert_eq!(price_per_session(89900, 0), 0);
    }

    #[test]
    fn create_starts_active() {
        let package = KlippekortPackage::create(input(), Timestamp::now()).unwrap();
        assert!(package.active);
        assert!(package.popular);
        assert_eq!(package.price_per_session(), 8990);
    }

    #[test]
    fn create_rejects_zero_sessions() {
        let result = KlippekortPackage::create(
            NewKlippekortPackage {
                klipp_count: 0,
                ..input()
            },
            Timestamp::now(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn create_rejects_zero_validity() {
        let result = KlippekortPackage::create(
            NewKlippekortPackage {
                validity_days: 0,
                ..input()
            },
            Timestamp::now(),
        );
        assert!(result.is_err());
    }
}
