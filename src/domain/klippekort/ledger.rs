//! UserKlippekort ledger entity.
//!
//! One purchased punch card. The balance only moves down through
//! consumption; staff may correct it within `0..=total_klipp`.

use crate::domain::foundation::{
    KlippekortPackageId, LocalTime, OwnedByUser, Percentage, Timestamp, UserId, UserKlippekortId,
};
use serde::{Deserialize, Serialize};

use super::{KlippekortError, KlippekortPackage};

/// A user's punch card.
///
/// # Invariants
///
/// - `remaining_klipp <= total_klipp`
/// - `expiry_date = purchase_date + package.validity_days`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserKlippekort {
    pub id: UserKlippekortId,
    pub user_id: UserId,
    pub package_id: KlippekortPackageId,
    pub total_klipp: u32,
    pub remaining_klipp: u32,
    pub purchase_date: Timestamp,
    pub expiry_date: Timestamp,
    pub active: bool,
    pub version: i32,
    pub updated_at: Timestamp,
}

impl UserKlippekort {
    /// Issues a fresh card for `package`.
    pub fn purchase(
        user_id: UserId,
        package: &KlippekortPackage,
        now: &LocalTime,
    ) -> Result<Self, KlippekortError> {
        if !package.active {
            return Err(KlippekortError::PackageUnavailable(package.id));
        }

        let purchased = Timestamp::from_datetime(now.clone());
        Ok(Self {
            id: UserKlippekortId::new(),
            user_id,
            package_id: package.id,
            total_klipp: package.klipp_count,
            remaining_klipp: package.klipp_count,
            purchase_date: purchased,
            expiry_date: purchased.add_days(i64::from(package.validity_days)),
            active: true,
            version: 0,
            updated_at: purchased,
        })
    }

    /// Punches `count` sessions and returns the new balance.
    pub fn consume(&mut self, count: u32, now: &LocalTime) -> Result<u32, KlippekortError> {
        if count == 0 {
            return Err(KlippekortError::validation("count", "must be at least 1"));
        }
        if !self.active {
            return Err(KlippekortError::Inactive(self.id));
        }
        if self.is_expired(now) {
            return Err(KlippekortError::expired(self.expiry_date));
        }
        if self.remaining_klipp < count {
            return Err(KlippekortError::insufficient_balance(
                self.remaining_klipp,
                count,
            ));
        }

        self.remaining_klipp -= count;
        self.updated_at = Timestamp::from_datetime(now.clone());
        Ok(self.remaining_klipp)
    }

    /// Staff correction of the balance.
    pub fn adjust(&mut self, remaining: u32, now: &LocalTime) -> Result<(), KlippekortError> {
        if remaining > self.total_klipp {
            return Err(KlippekortError::validation(
                "remaining_klipp",
                format!("must be between 0 and {}", self.total_klipp),
            ));
        }
        self.remaining_klipp = remaining;
        self.updated_at = Timestamp::from_datetime(now.clone());
        Ok(())
    }

    pub fn used_klipp(&self) -> u32 {
        self.total_klipp - self.remaining_klipp
    }

    /// Expired strictly after the expiry instant.
    pub fn is_expired(&self, now: &LocalTime) -> bool {
        Timestamp::from_datetime(now.clone()).is_after(&self.expiry_date)
    }

    pub fn progress(&self) -> Percentage {
        progress_percentage(self.total_klipp, self.remaining_klipp)
    }
}

impl OwnedByUser for UserKlippekort {
    fn owner_id(&self) -> &UserId {
        &self.user_id
    }
}

/// Share of the card still unused, `remaining * 100 / total`.
///
/// Reports percent remaining, not percent used. Zero for an empty card.
pub fn progress_percentage(total: u32, remaining: u32) -> Percentage {
    Percentage::of(remaining, total)
}
