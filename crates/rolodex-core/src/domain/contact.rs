//! Contact entity.

use crate::{ContactId, UserId};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// An address-book entry owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub owner_id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub birthday: NaiveDate,
    pub additional_info: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contact {
    /// Returns the first birthday anniversary on or after `today`.
    ///
    /// A Feb 29 birthday is celebrated on Feb 28 in non-leap years.
    #[must_use]
    pub fn next_birthday(&self, today: NaiveDate) -> NaiveDate {
        let this_year = anniversary_in(self.birthday, today.year());
        if this_year >= today {
            this_year
        } else {
            anniversary_in(self.birthday, today.year() + 1)
        }
    }

    /// Returns true if the next birthday falls within `days` days of `today`,
    /// both ends inclusive.
    #[must_use]
    pub fn has_birthday_within(&self, today: NaiveDate, days: u32) -> bool {
        (self.next_birthday(today) - today).num_days() <= i64::from(days)
    }

    /// Overwrites every editable field.
    pub fn apply(&mut self, data: ContactData) {
        self.first_name = data.first_name;
        self.last_name = data.last_name;
        self.email = data.email;
        self.phone_number = data.phone_number;
        self.birthday = data.birthday;
        self.additional_info = data.additional_info;
        self.updated_at = Utc::now();
    }
}

fn anniversary_in(birthday: NaiveDate, year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, birthday.month(), birthday.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, 2, 28))
        .unwrap_or(birthday)
}

/// The editable fields of a contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactData {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub birthday: NaiveDate,
    pub additional_info: Option<String>,
}

/// Optional search terms for listing contacts.
///
/// Each present term is a case-insensitive substring match; terms are
/// combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFilter {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl ContactFilter {
    /// Returns true if `contact` satisfies every present term.
    #[must_use]
    pub fn matches(&self, contact: &Contact) -> bool {
        fn term_matches(term: Option<&String>, value: &str) -> bool {
            term.map_or(true, |t| value.to_lowercase().contains(&t.to_lowercase()))
        }

        term_matches(self.first_name.as_ref(), &contact.first_name)
            && term_matches(self.last_name.as_ref(), &contact.last_name)
            && term_matches(self.email.as_ref(), &contact.email)
    }

    /// Drops blank terms so that `?first_name=` means "no filter".
    #[must_use]
    pub fn normalized(self) -> Self {
        fn keep(term: Option<String>) -> Option<String> {
            term.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
        }

        Self {
            first_name: keep(self.first_name),
            last_name: keep(self.last_name),
            email: keep(self.email),
        }
    }
}
