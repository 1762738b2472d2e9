//! Repository trait definitions.

use async_trait::async_trait;
use rolodex_core::{
    Contact, ContactData, ContactFilter, ContactId, Email, NewUser, PageRequest, RolodexResult,
    User, UserId,
};

/// Source of truth for user accounts.
///
/// Callers check username and email uniqueness before [`create`]; the
/// storage layer still rejects duplicates with a `Conflict`.
///
/// [`create`]: UserDirectory::create
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Finds a user by ID.
    async fn find_by_id(&self, id: UserId) -> RolodexResult<Option<User>>;

    /// Finds a user by username (case-sensitive).
    async fn find_by_username(&self, username: &str) -> RolodexResult<Option<User>>;

    /// Finds a user by email.
    async fn find_by_email(&self, email: &Email) -> RolodexResult<Option<User>>;

    /// Inserts a new, unconfirmed user.
    async fn create(&self, candidate: NewUser, avatar: Option<String>) -> RolodexResult<User>;

    /// Marks the user with `email` as confirmed.
    ///
    /// No-op if the user is already confirmed or does not exist.
    async fn confirm_email(&self, email: &Email) -> RolodexResult<()>;

    /// Persists every mutable field of `user`.
    ///
    /// The confirmed flag is never cleared and the password hash is left
    /// untouched, so a user read back from the cache can be updated safely.
    async fn update(&self, user: &User) -> RolodexResult<()>;
}

/// Storage for contacts. Every operation is scoped to one owner.
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Lists an owner's contacts matching `filter`, ordered by name.
    async fn search(
        &self,
        owner: UserId,
        filter: &ContactFilter,
        page: PageRequest,
    ) -> RolodexResult<Vec<Contact>>;

    /// Lists all of an owner's contacts.
    async fn find_all_by_owner(&self, owner: UserId) -> RolodexResult<Vec<Contact>>;

    /// Finds one of an owner's contacts.
    async fn find_by_id(&self, owner: UserId, id: ContactId) -> RolodexResult<Option<Contact>>;

    /// Creates a contact.
    async fn create(&self, owner: UserId, data: ContactData) -> RolodexResult<Contact>;

    /// Replaces a contact's fields; `None` if the owner has no such contact.
    async fn update(
        &self,
        owner: UserId,
        id: ContactId,
        data: ContactData,
    ) -> RolodexResult<Option<Contact>>;

    /// Deletes a contact and returns it; `None` if the owner has no such contact.
    async fn delete(&self, owner: UserId, id: ContactId) -> RolodexResult<Option<Contact>>;
}
