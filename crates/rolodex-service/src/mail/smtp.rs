//! SMTP mail dispatcher.

use super::{ConfirmationEmail, MailDispatcher, CONFIRMATION_SUBJECT};
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart, SinglePart},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use rolodex_config::MailConfig;
use rolodex_core::{RolodexError, RolodexResult};

/// Sends mail through an SMTP relay.
pub struct SmtpMailDispatcher {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

fn mail_error(message: impl Into<String>) -> RolodexError {
    RolodexError::ExternalService {
        service: "smtp".to_string(),
        message: message.into(),
    }
}

impl SmtpMailDispatcher {
    /// Creates a dispatcher for the configured relay.
    ///
    /// Port 465 uses implicit TLS; other ports use STARTTLS when
    /// `starttls` is set and plain SMTP otherwise.
    pub fn new(config: &MailConfig) -> RolodexResult<Self> {
        let host = config.smtp_host.as_str();
        let mut builder = if config.smtp_port == 465 || config.starttls {
            let tls = TlsParameters::new(host.to_string()).map_err(|e| {
                RolodexError::Configuration(format!("SMTP TLS configuration error: {}", e))
            })?;
            if config.smtp_port == 465 {
                AsyncSmtpTransport::<Tokio1Executor>::relay(host)
                    .map_err(|e| RolodexError::Configuration(format!("SMTP relay error: {}", e)))?
                    .port(config.smtp_port)
                    .tls(Tls::Wrapper(tls))
            } else {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                    .map_err(|e| RolodexError::Configuration(format!("SMTP relay error: {}", e)))?
                    .port(config.smtp_port)
                    .tls(Tls::Required(tls))
            }
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host).port(config.smtp_port)
        };

        if let (Some(user), Some(pass)) = (&config.smtp_username, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let from = format!("{} <{}>", config.from_name, config.from_address)
            .parse::<Mailbox>()
            .map_err(|e| RolodexError::Configuration(format!("Invalid from address: {}", e)))?;

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl MailDispatcher for SmtpMailDispatcher {
    async fn send_confirmation(&self, email: &ConfirmationEmail) -> RolodexResult<()> {
        let to = email
            .to
            .parse::<Mailbox>()
            .map_err(|e| mail_error(format!("Invalid recipient address: {}", e)))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(CONFIRMATION_SUBJECT)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(email.text_body()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(email.html_body()),
                    ),
            )
            .map_err(|e| mail_error(format!("Failed to build email: {}", e)))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| mail_error(e.to_string()))?;

        Ok(())
    }
}
