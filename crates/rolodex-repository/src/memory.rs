//! In-memory repositories.
//!
//! Behave like the MySQL implementations, including unique username and
//! email constraints, without a database.

use crate::traits::{ContactRepository, UserDirectory};
use async_trait::async_trait;
use chrono::Utc;
use rolodex_core::{
    Contact, ContactData, ContactFilter, ContactId, Email, NewUser, PageRequest, RolodexError,
    RolodexResult, User, UserId,
};
use std::collections::BTreeMap;
use std::sync::Mutex;

fn lock_poisoned<T>(_: T) -> RolodexError {
    RolodexError::internal("in-memory store lock poisoned")
}

/// In-memory [`UserDirectory`].
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    users: Mutex<BTreeMap<UserId, User>>,
}

impl InMemoryUserDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a directory holding `users`.
    #[must_use]
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let map = users.into_iter().map(|u| (u.id, u)).collect();
        Self {
            users: Mutex::new(map),
        }
    }

    /// Returns the number of stored users.
    pub fn len(&self) -> usize {
        self.users.lock().map(|u| u.len()).unwrap_or(0)
    }

    /// Returns true if no users are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_id(&self, id: UserId) -> RolodexResult<Option<User>> {
        let users = self.users.lock().map_err(lock_poisoned)?;
        Ok(users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> RolodexResult<Option<User>> {
        let users = self.users.lock().map_err(lock_poisoned)?;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> RolodexResult<Option<User>> {
        let users = self.users.lock().map_err(lock_poisoned)?;
        Ok(users.values().find(|u| &u.email == email).cloned())
    }

    async fn create(&self, candidate: NewUser, avatar: Option<String>) -> RolodexResult<User> {
        let mut users = self.users.lock().map_err(lock_poisoned)?;

        if users
            .values()
            .any(|u| u.username == candidate.username || u.email == candidate.email)
        {
            return Err(RolodexError::duplicate_entry("username or email already stored"));
        }

        let next_id = users.keys().next_back().map_or(1, |id| id.into_inner() + 1);
        let user = User {
            id: UserId::new(next_id),
            username: candidate.username,
            email: candidate.email,
            password_hash: candidate.password_hash,
            confirmed: false,
            avatar,
            created_at: Utc::now(),
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn confirm_email(&self, email: &Email) -> RolodexResult<()> {
        let mut users = self.users.lock().map_err(lock_poisoned)?;
        if let Some(user) = users.values_mut().find(|u| &u.email == email) {
            user.confirm();
        }
        Ok(())
    }

    async fn update(&self, user: &User) -> RolodexResult<()> {
        let mut users = self.users.lock().map_err(lock_poisoned)?;
        if let Some(stored) = users.get_mut(&user.id) {
            stored.username.clone_from(&user.username);
            stored.email = user.email.clone();
            stored.confirmed |= user.confirmed;
            stored.avatar.clone_from(&user.avatar);
        }
        Ok(())
    }
}

/// In-memory [`ContactRepository`].
#[derive(Debug, Default)]
pub struct InMemoryContactRepository {
    contacts: Mutex<BTreeMap<ContactId, Contact>>,
}

impl InMemoryContactRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn sort_by_name(contacts: &mut [Contact]) {
    contacts.sort_by(|a, b| {
        (&a.last_name, &a.first_name, a.id).cmp(&(&b.last_name, &b.first_name, b.id))
    });
}

#[async_trait]
impl ContactRepository for InMemoryContactRepository {
    async fn search(
        &self,
        owner: UserId,
        filter: &ContactFilter,
        page: PageRequest,
    ) -> RolodexResult<Vec<Contact>> {
        let mut matching: Vec<Contact> = self
            .contacts
            .lock()
            .map_err(lock_poisoned)?
            .values()
            .filter(|c| c.owner_id == owner && filter.matches(c))
            .cloned()
            .collect();
        sort_by_name(&mut matching);

        Ok(matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect())
    }

    async fn find_all_by_owner(&self, owner: UserId) -> RolodexResult<Vec<Contact>> {
        let mut owned: Vec<Contact> = self
            .contacts
            .lock()
            .map_err(lock_poisoned)?
            .values()
            .filter(|c| c.owner_id == owner)
            .cloned()
            .collect();
        sort_by_name(&mut owned);
        Ok(owned)
    }

    async fn find_by_id(&self, owner: UserId, id: ContactId) -> RolodexResult<Option<Contact>> {
        let contacts = self.contacts.lock().map_err(lock_poisoned)?;
        Ok(contacts.get(&id).filter(|c| c.owner_id == owner).cloned())
    }

    async fn create(&self, owner: UserId, data: ContactData) -> RolodexResult<Contact> {
        let mut contacts = self.contacts.lock().map_err(lock_poisoned)?;
        let next_id = contacts.keys().next_back().map_or(1, |id| id.into_inner() + 1);
        let now = Utc::now();
        let contact = Contact {
            id: ContactId::new(next_id),
            owner_id: owner,
            first_name: data.first_name,
            last_name: data.last_name,
            email: data.email,
            phone_number: data.phone_number,
            birthday: data.birthday,
            additional_info: data.additional_info,
            created_at: now,
            updated_at: now,
        };
        contacts.insert(contact.id, contact.clone());
        Ok(contact)
    }

    async fn update(
        &self,
        owner: UserId,
        id: ContactId,
        data: ContactData,
    ) -> RolodexResult<Option<Contact>> {
        let mut contacts = self.contacts.lock().map_err(lock_poisoned)?;
        match contacts.get_mut(&id).filter(|c| c.owner_id == owner) {
            Some(contact) => {
                contact.apply(data);
                Ok(Some(contact.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, owner: UserId, id: ContactId) -> RolodexResult<Option<Contact>> {
        let mut contacts = self.contacts.lock().map_err(lock_poisoned)?;
        if contacts.get(&id).is_some_and(|c| c.owner_id == owner) {
            Ok(contacts.remove(&id))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: Email::new(email).unwrap(),
            password_hash: "hash".to_string(),
        }
    }

    fn contact_data(first: &str, last: &str) -> ContactData {
        ContactData {
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: format!("{}@example.com", first.to_lowercase()),
            phone_number: "555-0100".to_string(),
            birthday: NaiveDate::from_ymd_opt(1990, 5, 17).unwrap(),
            additional_info: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_find_user() {
        let directory = InMemoryUserDirectory::new();
        let created = directory.create(new_user("alice", "alice@x.com"), None).await.unwrap();

        assert_eq!(created.id, UserId::new(1));
        assert!(!created.confirmed);

        let by_name = directory.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(by_name.id, created.id);

        let by_email = directory
            .find_by_email(&Email::new("ALICE@x.com").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, created.id);
        assert!(directory.find_by_id(UserId::new(99)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_username_lookup_is_case_sensitive() {
        let directory = InMemoryUserDirectory::new();
        directory.create(new_user("alice", "alice@x.com"), None).await.unwrap();
        assert!(directory.find_by_username("Alice").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_user_is_conflict() {
        let directory = InMemoryUserDirectory::new();
        directory.create(new_user("alice", "alice@x.com"), None).await.unwrap();

        let result = directory.create(new_user("alice2", "alice@x.com"), None).await;
        assert!(matches!(result, Err(RolodexError::Conflict(_))));
        assert_eq!(directory.len(), 1);
    }

    #[tokio::test]
    async fn test_confirm_email_is_idempotent() {
        let directory = InMemoryUserDirectory::new();
        let email = Email::new("alice@x.com").unwrap();
        directory.create(new_user("alice", "alice@x.com"), None).await.unwrap();

        directory.confirm_email(&email).await.unwrap();
        directory.confirm_email(&email).await.unwrap();
        directory
            .confirm_email(&Email::new("nobody@x.com").unwrap())
            .await
            .unwrap();

        let user = directory.find_by_email(&email).await.unwrap().unwrap();
        assert!(user.confirmed);
    }

    #[tokio::test]
    async fn test_update_keeps_password_and_confirmation() {
        let directory = InMemoryUserDirectory::new();
        let mut user = directory.create(new_user("alice", "alice@x.com"), None).await.unwrap();
        directory.confirm_email(&user.email).await.unwrap();

        user.password_hash = String::new();
        user.confirmed = false;
        user.set_avatar("https://img.example.com/alice.png");
        directory.update(&user).await.unwrap();

        let stored = directory.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(stored.password_hash, "hash");
        assert!(stored.confirmed);
        assert_eq!(stored.avatar.as_deref(), Some("https://img.example.com/alice.png"));
    }

    #[tokio::test]
    async fn test_contacts_are_scoped_to_owner() {
        let repo = InMemoryContactRepository::new();
        let alice = UserId::new(1);
        let bob = UserId::new(2);

        let contact = repo.create(alice, contact_data("Ivan", "Franko")).await.unwrap();

        assert!(repo.find_by_id(bob, contact.id).await.unwrap().is_none());
        assert!(repo
            .update(bob, contact.id, contact_data("X", "Y"))
            .await
            .unwrap()
            .is_none());
        assert!(repo.delete(bob, contact.id).await.unwrap().is_none());
        assert!(repo.find_by_id(alice, contact.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_search_filters_and_pages() {
        let repo = InMemoryContactRepository::new();
        let owner = UserId::new(1);
        repo.create(owner, contact_data("Ivan", "Franko")).await.unwrap();
        repo.create(owner, contact_data("Lesya", "Ukrainka")).await.unwrap();
        repo.create(owner, contact_data("Ivanna", "Bilyk")).await.unwrap();

        let filter = ContactFilter {
            first_name: Some("ivan".to_string()),
            ..ContactFilter::default()
        };
        let found = repo.search(owner, &filter, PageRequest::default()).await.unwrap();
        let names: Vec<_> = found.iter().map(|c| c.last_name.as_str()).collect();
        assert_eq!(names, vec!["Bilyk", "Franko"]);

        let page = repo
            .search(owner, &ContactFilter::default(), PageRequest::new(1, 1))
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].last_name, "Franko");
    }

    #[tokio::test]
    async fn test_delete_returns_removed_contact() {
        let repo = InMemoryContactRepository::new();
        let owner = UserId::new(1);
        let contact = repo.create(owner, contact_data("Ivan", "Franko")).await.unwrap();

        let removed = repo.delete(owner, contact.id).await.unwrap().unwrap();
        assert_eq!(removed.id, contact.id);
        assert!(repo.find_all_by_owner(owner).await.unwrap().is_empty());
    }
}
