//! Main authentication service implementation

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::entities::client::AuthorizationClient;
use crate::domain::entities::token::{Claims, TokenKind, TokenPair};
use crate::domain::entities::user::User;
use crate::errors::{AuthError, DomainError, DomainResult, TokenError, ValidationError};
use crate::repositories::{ClientRepository, TokenRepository, UserRepository};
use crate::services::email::EmailService;
use crate::services::token::{hash_token, KeyCategory, RotationEngine, TokenService};

use super::config::AuthServiceConfig;
use super::{otp, password};

/// Authentication service orchestrating the login/exchange protocol.
///
/// Stateless between requests: all protocol state lives in the repositories.
/// Every operation receives its principal explicitly; nothing is attached to
/// a shared request object.
pub struct AuthService<U, C, R, E>
where
    U: UserRepository,
    C: ClientRepository,
    R: TokenRepository,
    E: EmailService + 'static,
{
    /// User repository for principal lookup
    user_repository: Arc<U>,
    /// Authorization client repository
    client_repository: Arc<C>,
    /// Token service owning families and issuance
    token_service: Arc<TokenService<R>>,
    /// Rotation engine for refresh tokens
    rotation_engine: Arc<RotationEngine<R, U>>,
    /// Email delivery for password-reset passcodes
    email_service: Arc<E>,
    /// Service configuration
    config: AuthServiceConfig,
}

impl<U, C, R, E> AuthService<U, C, R, E>
where
    U: UserRepository,
    C: ClientRepository,
    R: TokenRepository,
    E: EmailService + 'static,
{
    /// Create a new authentication service
    pub fn new(
        user_repository: Arc<U>,
        client_repository: Arc<C>,
        token_service: Arc<TokenService<R>>,
        rotation_engine: Arc<RotationEngine<R, U>>,
        email_service: Arc<E>,
        config: AuthServiceConfig,
    ) -> Self {
        Self {
            user_repository,
            client_repository,
            token_service,
            rotation_engine,
            email_service,
            config,
        }
    }

    /// Provision authorization clients from the configured allow-list.
    ///
    /// Idempotent: names that already exist are skipped. Returns only the
    /// newly created clients (the single moment their secrets are visible).
    pub async fn provision_clients(&self) -> DomainResult<Vec<AuthorizationClient>> {
        let mut created = Vec::new();
        for name in &self.config.clients {
            if self.client_repository.find_by_name(name).await?.is_some() {
                continue;
            }
            let client = AuthorizationClient::provision(name);
            created.push(self.client_repository.create(client).await?);
        }
        if !created.is_empty() {
            info!(count = created.len(), "authorization clients provisioned");
        }
        Ok(created)
    }

    /// First step of login: verify credentials and hand out an exchange code.
    ///
    /// Never issues access/refresh tokens directly. Every failure cause -
    /// unknown client, unknown email, wrong password, login forbidden -
    /// collapses into `InvalidCredentials` so callers cannot probe for
    /// accounts.
    pub async fn login(
        &self,
        client_id: &str,
        email: &str,
        plain_password: &str,
    ) -> DomainResult<String> {
        // Step 1: the caller must be a registered client
        let client = match self.client_repository.find_by_client_id(client_id).await? {
            Some(client) => client,
            None => return Err(AuthError::InvalidCredentials.into()),
        };

        // Step 2: resolve and check the user
        let user = match self.user_repository.find_by_email(email).await? {
            Some(user) => user,
            None => return Err(AuthError::InvalidCredentials.into()),
        };
        if !password::verify_password(plain_password, &user.password_hash) || !user.can_login() {
            return Err(AuthError::InvalidCredentials.into());
        }

        // Step 3: open a new session lineage and bind a code to it
        let family = self.token_service.create_family(user.id).await?;
        let code = self
            .token_service
            .issue_exchange_code(&user, family.id, &client.client_id)
            .await?;

        info!(user_id = %user.id, family_id = %family.id, "login succeeded, exchange code issued");
        Ok(code)
    }

    /// Second step of login: redeem an exchange code for the initial
    /// access/refresh pair.
    ///
    /// The code is single-use: the conditional consume is the serialization
    /// point, so of two concurrent redemptions exactly one wins. A client
    /// secret mismatch does not consume the code; retrying with the correct
    /// secret before expiry still succeeds.
    pub async fn exchange_code(
        &self,
        code: &str,
        client_secret: &str,
    ) -> DomainResult<TokenPair> {
        let repository = &self.token_service.repository;
        let code_hash = hash_token(code);

        // Step 1: signature and expiry; an unverifiable code is deleted
        let claims = match self
            .token_service
            .codec()
            .verify(code, KeyCategory::ExchangeCode)
        {
            Ok(claims) => claims,
            Err(_) => {
                if let Err(e) = repository.delete_token(&code_hash).await {
                    warn!(error = %e, "failed to delete unverifiable exchange code");
                }
                return Err(TokenError::InvalidOrExpiredCode.into());
            }
        };

        // Step 2: the persisted record must still exist (not yet redeemed)
        let record = match repository
            .find_token(TokenKind::ExchangeCode, &code_hash)
            .await?
        {
            Some(record) => record,
            None => return Err(TokenError::InvalidOrExpiredCode.into()),
        };

        // Step 3: the supplied secret must belong to the client named in the
        // code. Mismatch leaves the code in place.
        let client_id = claims
            .cid
            .as_deref()
            .ok_or(TokenError::InvalidOrExpiredCode)?;
        let client = self
            .client_repository
            .find_by_client_id(client_id)
            .await?
            .ok_or(TokenError::InvalidOrExpiredCode)?;
        if !client.secret_matches(client_secret) {
            return Err(AuthError::InvalidClientSecret.into());
        }

        // Step 4: resolve the user before spending the code
        let user_id = claims
            .user_id()
            .map_err(|_| TokenError::InvalidOrExpiredCode)?;
        let user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(TokenError::InvalidOrExpiredCode)?;

        // Step 5: spend the code. A lost race fails before any token exists.
        if !repository.consume_exchange_code(&code_hash).await? {
            return Err(TokenError::InvalidOrExpiredCode.into());
        }

        // Step 6: the one initial pair for this family. Losing the family
        // to a concurrent logout between consume and issuance fails closed.
        match self.token_service.issue_pair(&user, record.family_id).await {
            Err(DomainError::NotFound { .. }) => Err(TokenError::InvalidOrExpiredCode.into()),
            other => other,
        }
    }

    /// Rotate a refresh token into a new pair (or detect reuse)
    pub async fn refresh(&self, refresh_token: &str) -> DomainResult<TokenPair> {
        self.rotation_engine.rotate(refresh_token).await
    }

    /// End a session: delete the family behind a currently valid refresh
    /// token.
    ///
    /// A missing, malformed, or already-invalidated token yields
    /// `InvalidTokens`, so the second logout with the same token fails.
    pub async fn logout(&self, refresh_token: &str) -> DomainResult<()> {
        let repository = &self.token_service.repository;
        let token_hash = hash_token(refresh_token);

        match repository.find_token(TokenKind::Refresh, &token_hash).await? {
            Some(record) if record.is_valid => {
                self.token_service.revoke_family(record.family_id).await?;
                Ok(())
            }
            _ => Err(AuthError::InvalidTokens.into()),
        }
    }

    /// Verify an access token and return its claims.
    ///
    /// Pure codec check, no storage lookup: an issued access token is
    /// trusted for its full (short) lifetime.
    pub fn verify_access_token(&self, access_token: &str) -> DomainResult<Claims> {
        self.token_service.verify_access_token(access_token)
    }

    /// Register a new user
    pub async fn register(&self, email: &str, plain_password: &str) -> DomainResult<User> {
        if !quill_shared::utils::validation::is_valid_email(email) {
            return Err(ValidationError::InvalidFormat {
                field: "email".to_string(),
            }
            .into());
        }
        if self.user_repository.exists_by_email(email).await? {
            return Err(AuthError::UserAlreadyExists.into());
        }

        let password_hash = password::hash_password(plain_password)?;
        let user = User::new(email, password_hash);

        // A concurrent registration can still hit the uniqueness constraint
        match self.user_repository.create(user).await {
            Ok(user) => {
                info!(user_id = %user.id, "user registered");
                Ok(user)
            }
            Err(DomainError::Validation { .. }) => Err(AuthError::UserAlreadyExists.into()),
            Err(e) => Err(e),
        }
    }

    /// Change a user's password and revoke every session.
    ///
    /// The password is the root trust anchor: all token families die with
    /// the old one.
    pub async fn change_password(
        &self,
        user_id: Uuid,
        new_password: &str,
    ) -> DomainResult<()> {
        let password_hash = password::hash_password(new_password)?;
        if !self
            .user_repository
            .update_password(user_id, &password_hash)
            .await?
        {
            return Err(AuthError::UserNotFound.into());
        }

        let revoked = self.token_service.revoke_user_families(user_id).await?;
        info!(user_id = %user_id, families_revoked = revoked, "password changed");
        Ok(())
    }

    /// Start the forgot-password flow: email the user their current
    /// passcode.
    ///
    /// Delivery is fire-and-forget; a failed send is logged, never
    /// surfaced. Unknown emails succeed silently so the endpoint cannot be
    /// used to probe for accounts.
    pub async fn forgot_password(&self, email: &str) -> DomainResult<()> {
        let user = match self.user_repository.find_by_email(email).await? {
            Some(user) => user,
            None => return Ok(()),
        };

        let passcode = otp::generate_otp(&user.otp_secret, self.config.otp_step)?;
        let email_service = Arc::clone(&self.email_service);
        let recipient = user.email.clone();
        tokio::spawn(async move {
            if let Err(e) = email_service
                .send_password_reset_email(&recipient, &passcode)
                .await
            {
                warn!(error = %e, "password reset email delivery failed");
            }
        });

        Ok(())
    }

    /// Verify a passcode from the forgot-password email and issue a
    /// password-reset token
    pub async fn verify_otp(&self, email: &str, candidate: &str) -> DomainResult<String> {
        let user = self
            .user_repository
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidVerificationCode)?;

        if !otp::verify_otp(&user.otp_secret, self.config.otp_step, candidate) {
            return Err(AuthError::InvalidVerificationCode.into());
        }

        self.token_service.issue_password_reset_token(&user)
    }

    /// Complete the forgot-password flow: verify the reset token and run
    /// the password-change cascade
    pub async fn reset_password(
        &self,
        reset_token: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        let claims = self.token_service.verify_password_reset_token(reset_token)?;
        let user_id = claims
            .user_id()
            .map_err(|_| TokenError::InvalidOrExpiredToken)?;

        self.change_password(user_id, new_password).await
    }
}
