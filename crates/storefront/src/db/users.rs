//! User repository over the `users` collection.

use corner_shop_core::{Email, UserId, UserRecord};

use super::{FindQuery, Record, RecordStore, RepositoryError, find_documents, insert_document};

/// Repository for shop accounts.
pub struct UserRepository<'a> {
    store: &'a dyn RecordStore,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(store: &'a dyn RecordStore) -> Self {
        Self { store }
    }

    /// Get a user by their (normalized) email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored document is invalid.
    pub async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<Record<UserRecord>>, RepositoryError> {
        let query = FindQuery::all().eq("email", email.as_str());
        let users = find_documents::<UserRecord>(self.store, &query).await?;
        Ok(users.into_iter().next())
    }

    /// Store a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the store enforces unique
    /// emails and this one is taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn insert(&self, user: &UserRecord) -> Result<UserId, RepositoryError> {
        let id = insert_document(self.store, user).await?;
        Ok(UserId::from(id))
    }
}
