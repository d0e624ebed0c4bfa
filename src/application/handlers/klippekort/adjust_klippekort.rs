//! AdjustKlippekortHandler - Staff correction of a card balance.

use std::sync::Arc;

use crate::application::authorization::require_admin;
use crate::application::StoragePolicy;
use crate::domain::foundation::{UserId, UserKlippekortId};
use crate::domain::klippekort::{KlippekortError, UserKlippekort};
use crate::ports::{AdminAuthorizer, Clock, UserKlippekortRepository};

use super::updater::KlippekortUpdater;

/// Sets the remaining balance to `remaining_klipp`, within `0..=total_klipp`.
#[derive(Debug, Clone)]
pub struct AdjustKlippekortCommand {
    pub actor: UserId,
    pub klippekort_id: UserKlippekortId,
    pub remaining_klipp: u32,
}

pub struct AdjustKlippekortHandler {
    updater: KlippekortUpdater,
    authorizer: Arc<dyn AdminAuthorizer>,
    clock: Arc<dyn Clock>,
    storage: StoragePolicy,
}

impl AdjustKlippekortHandler {
    pub fn new(
        klippekort: Arc<dyn UserKlippekortRepository>,
        authorizer: Arc<dyn AdminAuthorizer>,
        clock: Arc<dyn Clock>,
        storage: StoragePolicy,
    ) -> Self {
        Self {
            updater: KlippekortUpdater::new(klippekort, storage),
            authorizer,
            clock,
            storage,
        }
    }

    pub async fn handle(
        &self,
        cmd: AdjustKlippekortCommand,
    ) -> Result<UserKlippekort, KlippekortError> {
        require_admin(self.authorizer.as_ref(), &self.storage, &cmd.actor).await?;

        let remaining = cmd.remaining_klipp;
        let (card, previous) = self
            .updater
            .update(&cmd.klippekort_id, None, &self.clock.now(), |card, now| {
                let previous = card.remaining_klipp;
                card.adjust(remaining, now)?;
                Ok(previous)
            })
            .await?;

        tracing::info!(
            klippekort_id = %card.id,
            user_id = %card.user_id,
            actor = %cmd.actor,
            from = previous,
            to = remaining,
            "klippekort balance adjusted"
        );
        Ok(card)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{user, Fixture, ADMIN};
    use crate::ports::UserKlippekortRepository as _;

    fn handler(f: &Fixture) -> AdjustKlippekortHandler {
        AdjustKlippekortHandler::new(f.klippekort.clone(), f.auth.clone(), f.clock.clone(), f.storage)
    }

    async fn card(f: &Fixture) -> UserKlippekort {
        let package = f.package(10, 89900, 90).await;
        let card = UserKlippekort::purchase(user("m1"), &package, &f.clock.now()).unwrap();
        f.klippekort.insert(&card).await.unwrap();
        card
    }

    fn cmd(actor: &str, card: &UserKlippekort, remaining_klipp: u32) -> AdjustKlippekortCommand {
        AdjustKlippekortCommand {
            actor: user(actor),
            klippekort_id: card.id,
            remaining_klipp,
        }
    }

    #[tokio::test]
    async fn staff_sets_balance() {
        let f = Fixture::new();
        let card = card(&f).await;

        let adjusted = handler(&f).handle(cmd(ADMIN, &card, 4)).await.unwrap();

        assert_eq!(adjusted.remaining_klipp, 4);
        assert_eq!(adjusted.version, 1);
        assert_eq!(f.klippekort.load(&card.id).await.unwrap(), Some(adjusted));
    }

    #[tokio::test]
    async fn balance_above_total_is_rejected() {
        let f = Fixture::new();
        let card = card(&f).await;

        let err = handler(&f).handle(cmd(ADMIN, &card, 11)).await.unwrap_err();

        assert!(matches!(err, KlippekortError::ValidationFailed { .. }));
        assert_eq!(
            f.klippekort.load(&card.id).await.unwrap().unwrap().remaining_klipp,
            10
        );
    }

    #[tokio::test]
    async fn member_cannot_adjust() {
        let f = Fixture::new();
        let card = card(&f).await;

        let err = handler(&f).handle(cmd("m1", &card, 10)).await.unwrap_err();
        assert_eq!(err, KlippekortError::Forbidden);
    }

    #[tokio::test]
    async fn unknown_card_is_not_found() {
        let f = Fixture::new();
        let missing = UserKlippekortId::new();

        let err = handler(&f)
            .handle(AdjustKlippekortCommand {
                actor: user(ADMIN),
                klippekort_id: missing,
                remaining_klipp: 1,
            })
            .await
            .unwrap_err();
        assert_eq!(err, KlippekortError::not_found(missing));
    }
}
