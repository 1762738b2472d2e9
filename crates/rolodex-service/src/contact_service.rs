//! Contacts owned by the authenticated user.

use crate::dto::{BirthdayParams, ContactRequest, ContactResponse, ContactSearchParams};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rolodex_core::{ContactId, RolodexError, RolodexResult, UserId, ValidateExt};
use rolodex_repository::ContactRepository;
use std::sync::Arc;
use tracing::{debug, info};

/// Contact service trait. Every operation is scoped to `owner`.
#[async_trait]
pub trait ContactService: Send + Sync {
    /// Lists contacts matching the search parameters.
    async fn search(
        &self,
        owner: UserId,
        params: ContactSearchParams,
    ) -> RolodexResult<Vec<ContactResponse>>;

    /// Lists contacts whose next birthday is within the requested window.
    async fn upcoming_birthdays(
        &self,
        owner: UserId,
        params: BirthdayParams,
    ) -> RolodexResult<Vec<ContactResponse>>;

    /// Returns one contact.
    async fn get(&self, owner: UserId, id: ContactId) -> RolodexResult<ContactResponse>;

    /// Creates a contact.
    async fn create(&self, owner: UserId, request: ContactRequest) -> RolodexResult<ContactResponse>;

    /// Replaces every field of a contact.
    async fn update(
        &self,
        owner: UserId,
        id: ContactId,
        request: ContactRequest,
    ) -> RolodexResult<ContactResponse>;

    /// Deletes a contact and returns it.
    async fn delete(&self, owner: UserId, id: ContactId) -> RolodexResult<ContactResponse>;
}

/// Contact service implementation.
pub struct ContactServiceImpl {
    repository: Arc<dyn ContactRepository>,
}

impl ContactServiceImpl {
    pub fn new(repository: Arc<dyn ContactRepository>) -> Self {
        Self { repository }
    }

    /// Upcoming birthdays relative to `today`.
    pub async fn birthdays_on(
        &self,
        owner: UserId,
        days: u32,
        today: NaiveDate,
    ) -> RolodexResult<Vec<ContactResponse>> {
        let mut upcoming: Vec<_> = self
            .repository
            .find_all_by_owner(owner)
            .await?
            .into_iter()
            .filter(|c| c.has_birthday_within(today, days))
            .collect();
        upcoming.sort_by_key(|c| (c.next_birthday(today), c.id));

        debug!("{} birthdays within {} days for {}", upcoming.len(), days, owner);
        Ok(upcoming.into_iter().map(ContactResponse::from).collect())
    }
}

fn contact_not_found(id: ContactId) -> RolodexError {
    RolodexError::not_found("Contact", id)
}

#[async_trait]
impl ContactService for ContactServiceImpl {
    async fn search(
        &self,
        owner: UserId,
        params: ContactSearchParams,
    ) -> RolodexResult<Vec<ContactResponse>> {
        params.validate_request()?;
        let contacts = self
            .repository
            .search(owner, &params.filter(), params.page())
            .await?;
        Ok(contacts.into_iter().map(ContactResponse::from).collect())
    }

    async fn upcoming_birthdays(
        &self,
        owner: UserId,
        params: BirthdayParams,
    ) -> RolodexResult<Vec<ContactResponse>> {
        params.validate_request()?;
        self.birthdays_on(owner, params.days(), Utc::now().date_naive())
            .await
    }

    async fn get(&self, owner: UserId, id: ContactId) -> RolodexResult<ContactResponse> {
        self.repository
            .find_by_id(owner, id)
            .await?
            .map(ContactResponse::from)
            .ok_or_else(|| contact_not_found(id))
    }

    async fn create(&self, owner: UserId, request: ContactRequest) -> RolodexResult<ContactResponse> {
        request.validate_request()?;
        let contact = self.repository.create(owner, request.into()).await?;
        info!("Contact {} created for {}", contact.id, owner);
        Ok(contact.into())
    }

    async fn update(
        &self,
        owner: UserId,
        id: ContactId,
        request: ContactRequest,
    ) -> RolodexResult<ContactResponse> {
        request.validate_request()?;
        let contact = self
            .repository
            .update(owner, id, request.into())
            .await?
            .ok_or_else(|| contact_not_found(id))?;
        info!("Contact {} updated", contact.id);
        Ok(contact.into())
    }

    async fn delete(&self, owner: UserId, id: ContactId) -> RolodexResult<ContactResponse> {
        let contact = self
            .repository
            .delete(owner, id)
            .await?
            .ok_or_else(|| contact_not_found(id))?;
        info!("Contact {} deleted", contact.id);
        Ok(contact.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rolodex_repository::InMemoryContactRepository;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request(first: &str, last: &str, birthday: NaiveDate) -> ContactRequest {
        ContactRequest {
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: format!("{}@example.com", first.to_lowercase()),
            phone_number: "+380501234567".to_string(),
            birthday,
            additional_info: None,
        }
    }

    fn service() -> ContactServiceImpl {
        ContactServiceImpl::new(Arc::new(InMemoryContactRepository::new()))
    }

    const OWNER: UserId = UserId::new(1);
    const STRANGER: UserId = UserId::new(2);

    #[tokio::test]
    async fn test_create_get_update_delete() {
        let service = service();
        let created = service
            .create(OWNER, request("Ivan", "Franko", date(1856, 8, 27)))
            .await
            .unwrap();
        let id = ContactId::new(created.id);

        assert_eq!(service.get(OWNER, id).await.unwrap().last_name, "Franko");

        let updated = service
            .update(OWNER, id, request("Ivan", "Franko-Updated", date(1856, 8, 27)))
            .await
            .unwrap();
        assert_eq!(updated.last_name, "Franko-Updated");

        service.delete(OWNER, id).await.unwrap();
        assert!(matches!(
            service.get(OWNER, id).await,
            Err(RolodexError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_foreign_contact_is_not_found() {
        let service = service();
        let created = service
            .create(OWNER, request("Ivan", "Franko", date(1856, 8, 27)))
            .await
            .unwrap();
        let id = ContactId::new(created.id);

        assert!(matches!(service.get(STRANGER, id).await, Err(RolodexError::NotFound { .. })));
        assert!(matches!(
            service
                .update(STRANGER, id, request("X", "Y", date(2000, 1, 1)))
                .await,
            Err(RolodexError::NotFound { .. })
        ));
        assert!(matches!(service.delete(STRANGER, id).await, Err(RolodexError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_request() {
        let service = service();
        let mut bad = request("Ivan", "Franko", date(1856, 8, 27));
        bad.email = "not-an-email".to_string();
        assert!(matches!(
            service.create(OWNER, bad).await,
            Err(RolodexError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_search_empty_is_empty_list() {
        let service = service();
        let params = ContactSearchParams {
            last_name: Some("nobody".to_string()),
            ..Default::default()
        };
        assert!(service.search(OWNER, params).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_filters_case_insensitively() {
        let service = service();
        service.create(OWNER, request("Ivan", "Franko", date(1856, 8, 27))).await.unwrap();
        service.create(OWNER, request("Lesya", "Ukrainka", date(1871, 2, 25))).await.unwrap();
        service.create(STRANGER, request("Ivan", "Other", date(1900, 1, 1))).await.unwrap();

        let params = ContactSearchParams {
            first_name: Some("IVA".to_string()),
            ..Default::default()
        };
        let found = service.search(OWNER, params).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].last_name, "Franko");
    }

    #[tokio::test]
    async fn test_birthdays_within_window() {
        let service = service();
        let today = date(2025, 12, 28);
        service.create(OWNER, request("Soon", "A", date(1990, 12, 30))).await.unwrap();
        service.create(OWNER, request("NewYear", "B", date(1985, 1, 2))).await.unwrap();
        service.create(OWNER, request("Later", "C", date(1990, 1, 10))).await.unwrap();
        service.create(OWNER, request("Today", "D", date(2000, 12, 28))).await.unwrap();

        let found = service.birthdays_on(OWNER, 7, today).await.unwrap();
        let names: Vec<_> = found.iter().map(|c| c.first_name.as_str()).collect();
        assert_eq!(names, vec!["Today", "Soon", "NewYear"]);
    }

    #[tokio::test]
    async fn test_birthday_window_out_of_range() {
        let service = service();
        let result = service
            .upcoming_birthdays(OWNER, BirthdayParams { days: Some(400) })
            .await;
        assert!(matches!(result, Err(RolodexError::Validation(_))));
    }
}
