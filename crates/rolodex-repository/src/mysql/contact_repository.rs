//! MySQL contact repository.

use crate::{traits::ContactRepository, DatabasePool};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rolodex_core::{
    Contact, ContactData, ContactFilter, ContactId, PageRequest, RolodexError, RolodexResult,
    UserId,
};
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

/// MySQL-backed [`ContactRepository`].
#[derive(Clone, Debug)]
pub struct MySqlContactRepository {
    pool: Arc<DatabasePool>,
}

impl MySqlContactRepository {
    /// Creates a new MySQL contact repository.
    #[must_use]
    pub fn new(pool: Arc<DatabasePool>) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ContactRow {
    id: i64,
    user_id: i64,
    first_name: String,
    last_name: String,
    email: String,
    phone_number: String,
    birthday: NaiveDate,
    additional_info: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ContactRow> for Contact {
    fn from(row: ContactRow) -> Self {
        Contact {
            id: ContactId::new(row.id),
            owner_id: UserId::new(row.user_id),
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone_number: row.phone_number,
            birthday: row.birthday,
            additional_info: row.additional_info,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Builds a `LIKE` pattern matching `term` anywhere, with wildcards in
/// `term` taken literally.
fn contains_pattern(term: Option<&String>) -> Option<String> {
    term.map(|t| {
        let escaped = t
            .to_lowercase()
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        format!("%{escaped}%")
    })
}

#[async_trait]
impl ContactRepository for MySqlContactRepository {
    async fn search(
        &self,
        owner: UserId,
        filter: &ContactFilter,
        page: PageRequest,
    ) -> RolodexResult<Vec<Contact>> {
        debug!(
            "Searching contacts for user {} (skip {}, limit {})",
            owner,
            page.offset(),
            page.limit()
        );

        let first_name = contains_pattern(filter.first_name.as_ref());
        let last_name = contains_pattern(filter.last_name.as_ref());
        let email = contains_pattern(filter.email.as_ref());

        let rows = sqlx::query_as::<_, ContactRow>(
            r#"
            SELECT id, user_id, first_name, last_name, email, phone_number,
                   birthday, additional_info, created_at, updated_at
            FROM contacts
            WHERE user_id = ?
              AND (? IS NULL OR LOWER(first_name) LIKE ?)
              AND (? IS NULL OR LOWER(last_name) LIKE ?)
              AND (? IS NULL OR LOWER(email) LIKE ?)
            ORDER BY last_name, first_name, id
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(owner.into_inner())
        .bind(&first_name)
        .bind(&first_name)
        .bind(&last_name)
        .bind(&last_name)
        .bind(&email)
        .bind(&email)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows.into_iter().map(Contact::from).collect())
    }

    async fn find_all_by_owner(&self, owner: UserId) -> RolodexResult<Vec<Contact>> {
        let rows = sqlx::query_as::<_, ContactRow>(
            r#"
            SELECT id, user_id, first_name, last_name, email, phone_number,
                   birthday, additional_info, created_at, updated_at
            FROM contacts
            WHERE user_id = ?
            ORDER BY last_name, first_name, id
            "#,
        )
        .bind(owner.into_inner())
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows.into_iter().map(Contact::from).collect())
    }

    async fn find_by_id(&self, owner: UserId, id: ContactId) -> RolodexResult<Option<Contact>> {
        debug!("Finding contact {} for user {}", id, owner);

        let row = sqlx::query_as::<_, ContactRow>(
            r#"
            SELECT id, user_id, first_name, last_name, email, phone_number,
                   birthday, additional_info, created_at, updated_at
            FROM contacts
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(id.into_inner())
        .bind(owner.into_inner())
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(Contact::from))
    }

    async fn create(&self, owner: UserId, data: ContactData) -> RolodexResult<Contact> {
        let result = sqlx::query(
            r#"
            INSERT INTO contacts
                (user_id, first_name, last_name, email, phone_number, birthday, additional_info)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(owner.into_inner())
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.email)
        .bind(&data.phone_number)
        .bind(data.birthday)
        .bind(&data.additional_info)
        .execute(self.pool.inner())
        .await?;

        let id = i64::try_from(result.last_insert_id())
            .map_err(|_| RolodexError::internal("Inserted contact id out of range"))?;
        debug!("Contact {} created for user {}", id, owner);

        self.find_by_id(owner, ContactId::new(id))
            .await?
            .ok_or_else(|| RolodexError::internal("Inserted contact could not be read back"))
    }

    async fn update(
        &self,
        owner: UserId,
        id: ContactId,
        data: ContactData,
    ) -> RolodexResult<Option<Contact>> {
        if self.find_by_id(owner, id).await?.is_none() {
            return Ok(None);
        }

        sqlx::query(
            r#"
            UPDATE contacts
            SET first_name = ?, last_name = ?, email = ?, phone_number = ?,
                birthday = ?, additional_info = ?
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.email)
        .bind(&data.phone_number)
        .bind(data.birthday)
        .bind(&data.additional_info)
        .bind(id.into_inner())
        .bind(owner.into_inner())
        .execute(self.pool.inner())
        .await?;

        self.find_by_id(owner, id).await
    }

    async fn delete(&self, owner: UserId, id: ContactId) -> RolodexResult<Option<Contact>> {
        let Some(contact) = self.find_by_id(owner, id).await? else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM contacts WHERE id = ? AND user_id = ?")
            .bind(id.into_inner())
            .bind(owner.into_inner())
            .execute(self.pool.inner())
            .await?;

        debug!("Contact {} deleted for user {}", id, owner);
        Ok(Some(contact))
    }
}
