//! Compare-and-swap loop for punch-card balance changes.

use std::sync::Arc;

use crate::application::StoragePolicy;
use crate::domain::foundation::{ErrorCode, LocalTime, UserId, UserKlippekortId};
use crate::domain::klippekort::{KlippekortError, UserKlippekort};
use crate::ports::UserKlippekortRepository;

#[derive(Clone)]
pub(crate) struct KlippekortUpdater {
    repository: Arc<dyn UserKlippekortRepository>,
    storage: StoragePolicy,
}

impl KlippekortUpdater {
    pub(crate) fn new(repository: Arc<dyn UserKlippekortRepository>, storage: StoragePolicy) -> Self {
        Self {
            repository,
            storage,
        }
    }

    /// Loads a card. With `owner` set, another user's card reads as missing.
    pub(crate) async fn load(
        &self,
        id: &UserKlippekortId,
        owner: Option<&UserId>,
    ) -> Result<UserKlippekort, KlippekortError> {
        let repository = &self.repository;
        let card = self
            .storage
            .call("load_klippekort", || repository.load(id))
            .await?
            .ok_or(KlippekortError::not_found(*id))?;

        match owner {
            Some(owner) if &card.user_id != owner => Err(KlippekortError::not_found(*id)),
            _ => Ok(card),
        }
    }

    /// Applies `apply` to a fresh copy and saves it, reloading on a lost race.
    pub(crate) async fn update<T, F>(
        &self,
        id: &UserKlippekortId,
        owner: Option<&UserId>,
        now: &LocalTime,
        apply: F,
    ) -> Result<(UserKlippekort, T), KlippekortError>
    where
        F: Fn(&mut UserKlippekort, &LocalTime) -> Result<T, KlippekortError>,
    {
        let repository = &self.repository;

        for attempt in 1..=self.storage.max_change_attempts {
            let mut card = self.load(id, owner).await?;
            let expected = card.version;

            let value = apply(&mut card, now)?;
            card.version = expected + 1;

            match self
                .storage
                .write("save_klippekort", || repository.save(&card, expected))
                .await
            {
                Ok(()) => return Ok((card, value)),
                Err(e) if e.code == ErrorCode::ConcurrentModification => {
                    tracing::debug!(klippekort_id = %id, attempt, "klippekort changed concurrently, reloading");
                }
                Err(e) => return Err(e.into()),
            }
        }

        tracing::warn!(
            klippekort_id = %id,
            attempts = self.storage.max_change_attempts,
            "giving up on contended klippekort update"
        );
        Err(KlippekortError::Conflict(format!(
            "gave up after {} attempts",
            self.storage.max_change_attempts
        )))
    }
}
