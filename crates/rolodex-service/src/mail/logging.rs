use super::{ConfirmationEmail, MailDispatcher};
use async_trait::async_trait;
use rolodex_core::RolodexResult;
use tracing::info;

/// Dispatcher that only logs messages. Used when SMTP is disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingMailDispatcher;

#[async_trait]
impl MailDispatcher for LoggingMailDispatcher {
    async fn send_confirmation(&self, email: &ConfirmationEmail) -> RolodexResult<()> {
        info!(to = %email.to, link = %email.link, "Mail disabled; confirmation email not sent");
        Ok(())
    }
}
