//! Storage boundary policy.
//!
//! Every port call made by a handler goes through [`StoragePolicy::call`] or
//! [`StoragePolicy::write`]. Both bound the call by a deadline. Reads and
//! idempotent overwrites are retried once on an I/O-class failure. Inserts and
//! version-checked saves are never replayed: a failure reported after the
//! write committed would otherwise surface as a lost compare-and-swap and the
//! mutation would be applied twice. Business outcomes reported by storage
//! (duplicate subscription, lost compare-and-swap) pass through untouched.

use std::future::Future;
use std::time::Duration;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Default deadline for a single storage call.
pub const DEFAULT_STORAGE_TIMEOUT: Duration = Duration::from_millis(5000);

/// Default number of load-validate-save attempts before giving up.
pub const DEFAULT_MAX_CHANGE_ATTEMPTS: u32 = 3;

/// Deadline and retry settings shared by all handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoragePolicy {
    pub timeout: Duration,
    /// Upper bound on compare-and-swap attempts for one mutation.
    pub max_change_attempts: u32,
}

impl Default for StoragePolicy {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_STORAGE_TIMEOUT,
            max_change_attempts: DEFAULT_MAX_CHANGE_ATTEMPTS,
        }
    }
}

impl StoragePolicy {
    pub fn new(timeout: Duration, max_change_attempts: u32) -> Self {
        Self {
            timeout,
            max_change_attempts: max_change_attempts.max(1),
        }
    }

    /// Runs a storage operation under the deadline, retrying once on a
    /// transient failure.
    ///
    /// # Errors
    ///
    /// - `Timeout` when an attempt exceeds the deadline
    /// - `StorageUnavailable` when both attempts fail with `DatabaseError`
    /// - any other error from the operation, unchanged
    pub async fn call<T, F, Fut>(&self, operation: &'static str, f: F) -> Result<T, DomainError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, DomainError>>,
    {
        match self.attempt(operation, &f).await {
            Err(first) if first.is_transient() => {
                tracing::warn!(operation, error = %first, "storage call failed, retrying once");
                self.attempt(operation, &f)
                    .await
                    .map_err(|second| unavailable(operation, second))
            }
            other => other,
        }
    }

    /// Runs a non-idempotent write (insert or compare-and-swap save) under the
    /// deadline, without retrying.
    ///
    /// A transient failure leaves the outcome unknown and is reported as
    /// `StorageUnavailable`. Callers must not treat it as a lost race.
    pub async fn write<T, F, Fut>(&self, operation: &'static str, f: F) -> Result<T, DomainError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, DomainError>>,
    {
        self.attempt(operation, &f)
            .await
            .map_err(|e| unavailable(operation, e))
    }

    async fn attempt<T, F, Fut>(&self, operation: &'static str, f: &F) -> Result<T, DomainError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, DomainError>>,
    {
        match tokio::time::timeout(self.timeout, f()).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(operation, timeout_ms = self.timeout.as_millis() as u64, "storage call timed out");
                Err(DomainError::new(
                    ErrorCode::Timeout,
                    format!("{} exceeded {}ms", operation, self.timeout.as_millis()),
                ))
            }
        }
    }
}

fn unavailable(operation: &'static str, error: DomainError) -> DomainError {
    if !error.is_transient() {
        return error;
    }
    tracing::error!(operation, error = %error, "storage unavailable");
    DomainError::new(
        ErrorCode::StorageUnavailable,
        format!("{} failed: {}", operation, error.message),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn policy() -> StoragePolicy {
        StoragePolicy::new(Duration::from_millis(50), 3)
    }

    #[tokio::test]
    async fn passes_through_success() {
        let result = policy().call("load", || async { Ok::<_, DomainError>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn retries_transient_failure_once() {
        let calls = AtomicU32::new(0);
        let result = policy()
            .call("load", || async {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(DomainError::database("connection reset"))
                } else {
                    Ok(1)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn second_transient_failure_is_storage_unavailable() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = policy()
            .call("save", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(DomainError::database("connection refused"))
            })
            .await;

        assert_eq!(result.unwrap_err().code, ErrorCode::StorageUnavailable);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn business_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = policy()
            .call("save", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(DomainError::concurrent_modification("UserMembership"))
            })
            .await;

        assert_eq!(result.unwrap_err().code, ErrorCode::ConcurrentModification);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn writes_are_attempted_once() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = policy()
            .write("save", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(DomainError::database("connection reset after commit"))
            })
            .await;

        assert_eq!(result.unwrap_err().code, ErrorCode::StorageUnavailable);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn write_passes_business_errors_through() {
        let result: Result<(), _> = policy()
            .write("save", || async {
                Err(DomainError::concurrent_modification("UserKlippekort"))
            })
            .await;

        assert_eq!(result.unwrap_err().code, ErrorCode::ConcurrentModification);
    }

    #[tokio::test]
    async fn slow_call_times_out() {
        let result: Result<(), _> = policy()
            .call("load", || async {
                tokio::time::sleep(Duration::from_millis(500)).await;
                Ok(())
            })
            .await;

        assert_eq!(result.unwrap_err().code, ErrorCode::Timeout);
    }

    #[test]
    fn at_least_one_attempt() {
        assert_eq!(StoragePolicy::new(Duration::from_secs(1), 0).max_change_attempts, 1);
    }
}
