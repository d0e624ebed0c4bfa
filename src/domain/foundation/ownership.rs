//! Ownership trait for user-owned records.
//!
//! Subscriptions and klippekort belong to exactly one user. Handlers use
//! [`OwnedByUser::is_owner`] before letting a member act on a record looked up
//! by its own identifier.

use super::UserId;

/// Trait for records that have a single owner.
pub trait OwnedByUser {
    /// Returns the ID of the user who owns this record.
    fn owner_id(&self) -> &UserId;

    /// Checks if the given user is the owner.
    fn is_owner(&self, user_id: &UserId) -> bool {
        self.owner_id() == user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Locker {
        owner: UserId,
    }

    impl OwnedByUser for Locker {
        fn owner_id(&self) -> &UserId {
            &self.owner
        }
    }

    #[test]
    fn is_owner_compares_user_ids() {
        let owner = UserId::new("kari").unwrap();
        let locker = Locker { owner: owner.clone() };

        assert!(locker.is_owner(&owner));
        assert!(!locker.is_owner(&UserId::new("ola").unwrap()));
    }
}
