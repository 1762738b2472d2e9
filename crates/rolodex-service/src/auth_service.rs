//! Registration, email confirmation and login.

use crate::cache::UserCache;
use crate::dto::{LoginRequest, MessageResponse, RegisterRequest, RequestEmail, TokenResponse};
use crate::mail::{ConfirmationEmail, MailOutbox};
use async_trait::async_trait;
use rolodex_core::{Email, NewUser, RolodexError, RolodexResult, User, ValidateExt};
use rolodex_repository::UserDirectory;
use rolodex_security::{CredentialHasher, TokenCodec};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

/// Message returned for every failed login.
pub const LOGIN_ERROR: &str = "Incorrect username or password";

const ALREADY_CONFIRMED: &str = "Your email is already confirmed";
const CONFIRMED: &str = "Email confirmed";
const CHECK_EMAIL: &str = "Check your email for confirmation";
const VERIFICATION_FAILED: &str = "Verification error";
const DECOY_PASSWORD: &str = "rolodex-login-decoy";

/// Authentication service trait.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Registers an unconfirmed user and queues the confirmation email.
    async fn register(&self, request: RegisterRequest) -> RolodexResult<User>;

    /// Confirms the email address a confirmation token was issued for.
    async fn confirm_email(&self, token: &str) -> RolodexResult<MessageResponse>;

    /// Queues a fresh confirmation email for an unconfirmed address.
    async fn request_email(&self, request: RequestEmail) -> RolodexResult<MessageResponse>;

    /// Checks credentials and issues an access token.
    async fn login(&self, request: LoginRequest) -> RolodexResult<TokenResponse>;
}

/// Authentication service implementation.
pub struct AuthServiceImpl {
    directory: Arc<dyn UserDirectory>,
    hasher: Arc<dyn CredentialHasher>,
    tokens: Arc<TokenCodec>,
    cache: Arc<dyn UserCache>,
    outbox: MailOutbox,
    public_url: String,
    decoy_hash: OnceCell<String>,
}

impl AuthServiceImpl {
    /// Creates a new authentication service.
    ///
    /// `public_url` is the externally visible base URL used in
    /// confirmation links.
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        hasher: Arc<dyn CredentialHasher>,
        tokens: Arc<TokenCodec>,
        cache: Arc<dyn UserCache>,
        outbox: MailOutbox,
        public_url: impl Into<String>,
    ) -> Self {
        Self {
            directory,
            hasher,
            tokens,
            cache,
            outbox,
            public_url: public_url.into(),
            decoy_hash: OnceCell::new(),
        }
    }

    /// Hash of a fixed password, made once with the configured cost.
    async fn decoy_hash(&self) -> RolodexResult<String> {
        self.decoy_hash
            .get_or_try_init(|| self.hash_password(DECOY_PASSWORD.to_string()))
            .await
            .cloned()
    }

    async fn hash_password(&self, password: String) -> RolodexResult<String> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| RolodexError::internal(format!("Password hashing task failed: {}", e)))?
    }

    async fn verify_password(&self, password: String, hash: String) -> RolodexResult<bool> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| RolodexError::internal(format!("Password verification task failed: {}", e)))
    }

    fn queue_confirmation(&self, user: &User) -> RolodexResult<()> {
        let token = self.tokens.issue_confirmation(user.email.as_str())?;
        self.outbox.enqueue(ConfirmationEmail::new(
            user.email.as_str(),
            &user.username,
            &self.public_url,
            &token,
        ))
    }
}

#[async_trait]
impl AuthService for AuthServiceImpl {
    async fn register(&self, request: RegisterRequest) -> RolodexResult<User> {
        debug!("Registering user: {}", request.username);

        request.validate_request()?;
        let email = Email::new(&request.email)?;

        if self.directory.find_by_email(&email).await?.is_some() {
            return Err(RolodexError::conflict("Account with this email already exists"));
        }

        if self
            .directory
            .find_by_username(&request.username)
            .await?
            .is_some()
        {
            return Err(RolodexError::conflict("Account with this username already exists"));
        }

        let password_hash = self.hash_password(request.password).await?;

        let user = self
            .directory
            .create(
                NewUser {
                    username: request.username,
                    email,
                    password_hash,
                },
                None,
            )
            .await?;

        info!("User registered: {}", user.id);

        self.queue_confirmation(&user)?;
        Ok(user)
    }

    async fn confirm_email(&self, token: &str) -> RolodexResult<MessageResponse> {
        let email = self
            .tokens
            .decode(token)
            .ok()
            .and_then(|subject| Email::new(subject).ok())
            .ok_or_else(|| {
                debug!("Rejected confirmation token");
                RolodexError::verification("Invalid token for email verification")
            })?;

        let user = self
            .directory
            .find_by_email(&email)
            .await?
            .ok_or_else(|| RolodexError::verification(VERIFICATION_FAILED))?;

        if user.confirmed {
            return Ok(MessageResponse::new(ALREADY_CONFIRMED));
        }

        self.directory.confirm_email(&email).await?;
        self.cache.invalidate(&user.username).await;

        info!("Email confirmed for user: {}", user.id);
        Ok(MessageResponse::new(CONFIRMED))
    }

    async fn request_email(&self, request: RequestEmail) -> RolodexResult<MessageResponse> {
        request.validate_request()?;
        let email = Email::new(&request.email)?;

        match self.directory.find_by_email(&email).await? {
            Some(user) if user.confirmed => Ok(MessageResponse::new(ALREADY_CONFIRMED)),
            Some(user) => {
                self.queue_confirmation(&user)?;
                info!("Confirmation email re-queued for user: {}", user.id);
                Ok(MessageResponse::new(CHECK_EMAIL))
            }
            None => {
                debug!("Confirmation requested for unknown address");
                Ok(MessageResponse::new(CHECK_EMAIL))
            }
        }
    }

    async fn login(&self, request: LoginRequest) -> RolodexResult<TokenResponse> {
        debug!("Login attempt for: {}", request.username);

        let user = self.directory.find_by_username(&request.username).await?;

        // Unknown and unconfirmed accounts verify against the decoy hash so
        // every rejection costs one Argon2 verification.
        let hash = match &user {
            Some(user) if user.confirmed => user.password_hash.clone(),
            _ => self.decoy_hash().await?,
        };
        let password_ok = self.verify_password(request.password, hash).await?;

        let user = match user {
            None => {
                warn!("Login failed: user not found - {}", request.username);
                return Err(RolodexError::unauthenticated(LOGIN_ERROR));
            }
            Some(user) if !user.confirmed => {
                warn!("Login failed: email not confirmed - {}", user.id);
                return Err(RolodexError::unauthenticated(LOGIN_ERROR));
            }
            Some(user) if !password_ok => {
                warn!("Login failed: invalid password - {}", user.id);
                return Err(RolodexError::unauthenticated(LOGIN_ERROR));
            }
            Some(user) => user,
        };

        let access_token = self.tokens.issue_access(&user.username)?;
        info!("User logged in: {}", user.id);
        Ok(TokenResponse::bearer(access_token))
    }
}

impl std::fmt::Debug for AuthServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthServiceImpl")
            .field("public_url", &self.public_url)
            .finish_non_exhaustive()
    }
}
