//! Contact DTOs and query parameters.

use chrono::{DateTime, NaiveDate, Utc};
use rolodex_core::rules::{not_blank, valid_phone};
use rolodex_core::{Contact, ContactData, ContactFilter, PageRequest};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Default look-ahead for upcoming birthdays, in days.
pub const DEFAULT_BIRTHDAY_WINDOW_DAYS: u32 = 7;

/// Body of contact create and replace requests.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ContactRequest {
    #[validate(length(max = 50), custom(function = "not_blank"))]
    pub first_name: String,

    #[validate(length(max = 50), custom(function = "not_blank"))]
    pub last_name: String,

    #[validate(email(message = "Invalid email address"), length(max = 100))]
    pub email: String,

    #[validate(length(max = 20), custom(function = "valid_phone"))]
    pub phone_number: String,

    pub birthday: NaiveDate,

    #[validate(length(max = 50))]
    pub additional_info: Option<String>,
}

impl From<ContactRequest> for ContactData {
    fn from(request: ContactRequest) -> Self {
        Self {
            first_name: request.first_name.trim().to_string(),
            last_name: request.last_name.trim().to_string(),
            email: request.email.trim().to_string(),
            phone_number: request.phone_number.trim().to_string(),
            birthday: request.birthday,
            additional_info: request.additional_info,
        }
    }
}

/// A contact as returned to its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ContactResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub birthday: NaiveDate,
    pub additional_info: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Contact> for ContactResponse {
    fn from(contact: Contact) -> Self {
        Self {
            id: contact.id.into_inner(),
            first_name: contact.first_name,
            last_name: contact.last_name,
            email: contact.email,
            phone_number: contact.phone_number,
            birthday: contact.birthday,
            additional_info: contact.additional_info,
            created_at: contact.created_at,
            updated_at: contact.updated_at,
        }
    }
}

/// Query parameters of the contact listing.
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ContactSearchParams {
    /// Rows to skip.
    pub skip: Option<u32>,
    /// Page size, at most 100.
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u32>,
    /// Case-insensitive part of the first name.
    pub first_name: Option<String>,
    /// Case-insensitive part of the last name.
    pub last_name: Option<String>,
    /// Case-insensitive part of the email.
    pub email: Option<String>,
}

impl ContactSearchParams {
    #[must_use]
    pub fn page(&self) -> PageRequest {
        PageRequest::new(
            self.skip.unwrap_or(0),
            self.limit.unwrap_or(PageRequest::DEFAULT_LIMIT),
        )
    }

    #[must_use]
    pub fn filter(&self) -> ContactFilter {
        ContactFilter {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
        }
        .normalized()
    }
}

/// Query parameters of the upcoming-birthdays listing.
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BirthdayParams {
    /// Look-ahead window in days, 0 to 366.
    #[validate(range(max = 366))]
    pub days: Option<u32>,
}

impl BirthdayParams {
    #[must_use]
    pub fn days(&self) -> u32 {
        self.days.unwrap_or(DEFAULT_BIRTHDAY_WINDOW_DAYS)
    }
}
