//! ConsumeKlippekortHandler - Command handler for punching a card.

use std::sync::Arc;

use crate::application::StoragePolicy;
use crate::domain::foundation::{UserId, UserKlippekortId};
use crate::domain::klippekort::{KlippekortError, UserKlippekort};
use crate::ports::{Clock, UserKlippekortRepository};

use super::updater::KlippekortUpdater;

/// Command to punch `count` sessions from the caller's card.
#[derive(Debug, Clone)]
pub struct ConsumeKlippekortCommand {
    pub user_id: UserId,
    pub klippekort_id: UserKlippekortId,
    pub count: u32,
}

#[derive(Debug, Clone)]
pub struct ConsumeKlippekortResult {
    pub klippekort: UserKlippekort,
    pub remaining: u32,
}

/// Handler for klippekort consumption.
///
/// Members can only punch their own cards; anyone else's card is reported
/// as not found.
pub struct ConsumeKlippekortHandler {
    updater: KlippekortUpdater,
    clock: Arc<dyn Clock>,
}

impl ConsumeKlippekortHandler {
    pub fn new(
        klippekort: Arc<dyn UserKlippekortRepository>,
        clock: Arc<dyn Clock>,
        storage: StoragePolicy,
    ) -> Self {
        Self {
            updater: KlippekortUpdater::new(klippekort, storage),
            clock,
        }
    }

    pub async fn handle(
        &self,
        cmd: ConsumeKlippekortCommand,
    ) -> Result<ConsumeKlippekortResult, KlippekortError> {
        let count = cmd.count;
        let (klippekort, remaining) = self
            .updater
            .update(&cmd.klippekort_id, Some(&cmd.user_id), &self.clock.now(), |card, now| {
                card.consume(count, now)
            })
            .await
            .map_err(|e| {
                tracing::debug!(
                    user_id = %cmd.user_id,
                    klippekort_id = %cmd.klippekort_id,
                    count,
                    error = %e,
                    "klippekort consumption rejected"
                );
                e
            })?;

        tracing::info!(
            user_id = %cmd.user_id,
            klippekort_id = %cmd.klippekort_id,
            count,
            remaining,
            "klippekort consumed"
        );

        Ok(ConsumeKlippekortResult {
            klippekort,
            remaining,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{user, Fixture};
    use crate::domain::foundation::{DomainError, Timestamp};
    use crate::ports::UserKlippekortRepository as _;
    use async_trait::async_trait;
    use chrono::Duration;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn handler(f: &Fixture) -> ConsumeKlippekortHandler {
        ConsumeKlippekortHandler::new(f.klippekort.clone(), f.clock.clone(), f.storage)
    }

    async fn card(f: &Fixture, owner: &str, klipp: u32) -> UserKlippekort {
        let package = f.package(klipp, 89900, 180).await;
        let card = UserKlippekort::purchase(user(owner), &package, &f.clock.now()).unwrap();
        f.klippekort.insert(&card).await.unwrap();
        card
    }

    fn punch(owner: &str, card: &UserKlippekort, count: u32) -> ConsumeKlippekortCommand {
        ConsumeKlippekortCommand {
            user_id: user(owner),
            klippekort_id: card.id,
            count,
        }
    }

    #[tokio::test]
    async fn consume_until_empty_then_insufficient() {
        let f = Fixture::new();
        let card = card(&f, "m1", 3).await;
        let h = handler(&f);

        for expected in [2, 1, 0] {
            let result = h.handle(punch("m1", &card, 1)).await.unwrap();
            assert_eq!(result.remaining, expected);
        }

        let err = h.handle(punch("m1", &card, 1)).await.unwrap_err();
        assert_eq!(err, KlippekortError::insufficient_balance(0, 1));

        let stored = f.klippekort.load(&card.id).await.unwrap().unwrap();
        assert_eq!(stored.remaining_klipp, 0);
        assert_eq!(stored.version, 3);
    }

    #[tokio::test]
    async fn multi_session_punch() {
        let f = Fixture::new();
        let card = card(&f, "m1", 10).await;

        let result = handler(&f).handle(punch("m1", &card, 4)).await.unwrap();
        assert_eq!(result.remaining, 6);
        assert_eq!(result.klippekort.used_klipp(), 4);
    }

    #[tokio::test]
    async fn expired_card_is_rejected() {
        let f = Fixture::new();
        let card = card(&f, "m1", 10).await;

        f.clock.advance(Duration::days(181));
        let err = handler(&f).handle(punch("m1", &card, 1)).await.unwrap_err();

        assert_eq!(err, KlippekortError::expired(card.expiry_date));
    }

    #[tokio::test]
    async fn card_still_valid_on_expiry_instant() {
        let f = Fixture::new();
        let card = card(&f, "m1", 10).await;

        f.clock.advance(Duration::days(180));
        assert_eq!(Timestamp::from_datetime(f.clock.now()), card.expiry_date);
        assert!(handler(&f).handle(punch("m1", &card, 1)).await.is_ok());
    }

    #[tokio::test]
    async fn someone_elses_card_is_not_found() {
        let f = Fixture::new();
        let card = card(&f, "m1", 10).await;

        let err = handler(&f).handle(punch("m2", &card, 1)).await.unwrap_err();
        assert_eq!(err, KlippekortError::not_found(card.id));
    }

    #[tokio::test]
    async fn zero_count_is_invalid() {
        let f = Fixture::new();
        let card = card(&f, "m1", 10).await;

        let err = handler(&f).handle(punch("m1", &card, 0)).await.unwrap_err();
        assert!(matches!(err, KlippekortError::ValidationFailed { .. }));
    }

    /// Loses every compare-and-swap.
    struct AlwaysStale(UserKlippekort, AtomicU32);

    #[async_trait]
    impl UserKlippekortRepository for AlwaysStale {
        async fn load(&self, _: &UserKlippekortId) -> Result<Option<UserKlippekort>, DomainError> {
            Ok(Some(self.0.clone()))
        }

        async fn list_for_user(&self, _: &UserId) -> Result<Vec<UserKlippekort>, DomainError> {
            Ok(vec![self.0.clone()])
        }

        async fn insert(&self, _: &UserKlippekort) -> Result<(), DomainError> {
            Ok(())
        }

        async fn save(&self, _: &UserKlippekort, _: i32) -> Result<(), DomainError> {
            self.1.fetch_add(1, Ordering::SeqCst);
            Err(DomainError::concurrent_modification("UserKlippekort"))
        }
    }

    #[tokio::test]
    async fn gives_up_after_bounded_attempts() {
        let f = Fixture::new();
        let package = f.package(10, 89900, 180).await;
        let card = UserKlippekort::purchase(user("m1"), &package, &f.clock.now()).unwrap();
        let repo = Arc::new(AlwaysStale(card.clone(), AtomicU32::new(0)));

        let err = ConsumeKlippekortHandler::new(repo.clone(), f.clock.clone(), f.storage)
            .handle(punch("m1", &card, 1))
            .await
            .unwrap_err();

        assert!(matches!(err, KlippekortError::Conflict(_)));
        assert_eq!(repo.1.load(Ordering::SeqCst), f.storage.max_change_attempts);
    }

    /// Commits the first save, then reports the connection as lost.
    struct DropsReplyAfterCommit {
        inner: Arc<crate::adapters::storage::InMemoryUserKlippekortRepository>,
        saves: AtomicU32,
    }

    #[async_trait]
    impl UserKlippekortRepository for DropsReplyAfterCommit {
        async fn load(&self, id: &UserKlippekortId) -> Result<Option<UserKlippekort>, DomainError> {
            self.inner.load(id).await
        }

        async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<UserKlippekort>, DomainError> {
            self.inner.list_for_user(user_id).await
        }

        async fn insert(&self, card: &UserKlippekort) -> Result<(), DomainError> {
            self.inner.insert(card).await
        }

        async fn save(&self, card: &UserKlippekort, expected: i32) -> Result<(), DomainError> {
            self.inner.save(card, expected).await?;
            if self.saves.fetch_add(1, Ordering::SeqCst) == 0 {
                return Err(DomainError::database("connection reset after commit"));
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn lost_reply_after_commit_does_not_punch_twice() {
        let f = Fixture::new();
        let card = card(&f, "m1", 10).await;
        let repo = Arc::new(DropsReplyAfterCommit {
            inner: f.klippekort.clone(),
            saves: AtomicU32::new(0),
        });

        let err = ConsumeKlippekortHandler::new(repo.clone(), f.clock.clone(), f.storage)
            .handle(punch("m1", &card, 1))
            .await
            .unwrap_err();

        assert!(matches!(err, KlippekortError::StorageUnavailable(_)));
        assert_eq!(repo.saves.load(Ordering::SeqCst), 1);
        let stored = f.klippekort.load(&card.id).await.unwrap().unwrap();
        assert_eq!(stored.remaining_klipp, 9);
        assert_eq!(stored.version, card.version + 1);
    }
}
