//! Outbound mail.
//!
//! Workflows never talk to a transport directly: they enqueue into the
//! [`MailOutbox`], whose worker hands each message to a [`MailDispatcher`].

mod logging;
mod outbox;
mod smtp;

pub use logging::LoggingMailDispatcher;
pub use outbox::{MailOutbox, MailWorker};
pub use smtp::SmtpMailDispatcher;

use async_trait::async_trait;
use rolodex_config::MailConfig;
use rolodex_core::RolodexResult;
use std::sync::Arc;

/// Subject line of confirmation messages.
pub const CONFIRMATION_SUBJECT: &str = "Confirm your email";

/// A request to confirm an email address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationEmail {
    /// Recipient address.
    pub to: String,
    /// Recipient username, used in the greeting.
    pub username: String,
    /// Absolute confirmation link.
    pub link: String,
}

impl ConfirmationEmail {
    /// Builds a message whose link points at the confirmation endpoint
    /// under `public_url`.
    pub fn new(to: impl Into<String>, username: impl Into<String>, public_url: &str, token: &str) -> Self {
        Self {
            to: to.into(),
            username: username.into(),
            link: format!(
                "{}/api/auth/confirmed_email/{}",
                public_url.trim_end_matches('/'),
                token
            ),
        }
    }

    /// Plain-text body.
    #[must_use]
    pub fn text_body(&self) -> String {
        format!(
            "Hello {},\n\nPlease confirm your email address by opening the link below:\n\n{}\n\nThe link is valid for 7 days.\n",
            self.username, self.link
        )
    }

    /// HTML body.
    #[must_use]
    pub fn html_body(&self) -> String {
        format!(
            "<p>Hello {},</p><p>Please confirm your email address by opening the link below:</p>\
             <p><a href=\"{link}\">{link}</a></p><p>The link is valid for 7 days.</p>",
            self.username,
            link = self.link
        )
    }
}

/// Delivers mail.
#[async_trait]
pub trait MailDispatcher: Send + Sync {
    /// Sends an email confirmation message.
    async fn send_confirmation(&self, email: &ConfirmationEmail) -> RolodexResult<()>;
}

/// Builds the dispatcher selected by `config.enabled`.
pub fn create_dispatcher(config: &MailConfig) -> RolodexResult<Arc<dyn MailDispatcher>> {
    if config.enabled {
        Ok(Arc::new(SmtpMailDispatcher::new(config)?))
    } else {
        Ok(Arc::new(LoggingMailDispatcher))
    }
}
