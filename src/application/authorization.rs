//! Administrator checks shared by staff handlers.

use crate::application::StoragePolicy;
use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::ports::AdminAuthorizer;

/// Fails with `Forbidden` unless `actor` is an administrator.
pub async fn require_admin(
    authorizer: &dyn AdminAuthorizer,
    storage: &StoragePolicy,
    actor: &UserId,
) -> Result<(), DomainError> {
    let is_admin = storage
        .call("is_admin", || authorizer.is_admin(actor))
        .await?;
    if !is_admin {
        tracing::debug!(user_id = %actor, "administrator check denied");
        return Err(DomainError::new(
            ErrorCode::Forbidden,
            "Administrator access required",
        ));
    }
    Ok(())
}

/// Members may act on their own records; anyone else must be an administrator.
pub async fn require_self_or_admin(
    authorizer: &dyn AdminAuthorizer,
    storage: &StoragePolicy,
    actor: &UserId,
    subject: &UserId,
) -> Result<(), DomainError> {
    if actor == subject {
        return Ok(());
    }
    require_admin(authorizer, storage, actor).await
}
