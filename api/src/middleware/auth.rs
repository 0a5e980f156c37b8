//! JWT authentication middleware for protecting API endpoints.
//!
//! Extracts the bearer access token from the Authorization header, verifies
//! it through the token codec (pure signature/expiry check, no storage
//! lookup), and injects an `AuthContext` into request extensions. Handlers
//! receive the principal explicitly through the `AuthContext` extractor
//! instead of reading a mutated request object.

use actix_web::{
    dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorUnauthorized,
    http::header::AUTHORIZATION,
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};
use uuid::Uuid;

use quill_core::domain::entities::role::{Role, RoleSet};
use quill_core::domain::entities::token::Claims;
use quill_core::errors::{AuthError, DomainError, TokenError};
use quill_core::services::token::{KeyCategory, TokenCodec};

/// Authenticated principal injected into requests
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// User ID extracted from the access token
    pub user_id: Uuid,
    /// Token family the access token descends from
    pub family_id: Option<Uuid>,
    /// Capability roles carried by the token
    pub roles: RoleSet,
}

impl AuthContext {
    /// Creates an authentication context from verified access-token claims
    pub fn from_claims(claims: Claims) -> Result<Self, DomainError> {
        let user_id = claims
            .user_id()
            .map_err(|_| DomainError::Token(TokenError::InvalidTokenFormat))?;
        Ok(Self {
            user_id,
            family_id: claims.family_id(),
            roles: claims.roles.into_iter().collect(),
        })
    }

    /// Require every listed role; decided once, here
    pub fn require_all(&self, required: &[Role]) -> Result<(), DomainError> {
        if self.roles.contains_all(required) {
            Ok(())
        } else {
            Err(AuthError::InsufficientPermissions.into())
        }
    }

    /// Require at least one of the listed roles
    pub fn require_any(&self, required: &[Role]) -> Result<(), DomainError> {
        if self.roles.contains_any(required) {
            Ok(())
        } else {
            Err(AuthError::InsufficientPermissions.into())
        }
    }
}

impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthContext>()
                .cloned()
                .ok_or_else(|| ErrorUnauthorized("Missing authentication context")),
        )
    }
}

/// JWT authentication middleware factory
#[derive(Clone)]
pub struct JwtAuth {
    codec: Arc<TokenCodec>,
}

impl JwtAuth {
    /// Creates a new JWT authentication middleware around a token codec
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self { codec }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
            codec: Arc::clone(&self.codec),
        }))
    }
}

/// JWT authentication middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
    codec: Arc<TokenCodec>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let codec = Arc::clone(&self.codec);

        Box::pin(async move {
            let token = match extract_bearer_token(&req) {
                Some(token) => token,
                None => {
                    return Err(ErrorUnauthorized("Missing or invalid Authorization header"));
                }
            };

            // Fixed message on every failure path: expired, tampered, and
            // wrong-category tokens are indistinguishable to the caller
            let context = codec
                .verify(&token, KeyCategory::Access)
                .map_err(|_| ErrorUnauthorized("Invalid or expired token"))
                .and_then(|claims| {
                    AuthContext::from_claims(claims)
                        .map_err(|_| ErrorUnauthorized("Invalid or expired token"))
                })?;

            req.extensions_mut().insert(context);
            service.call(req).await
        })
    }
}

/// Extracts the bearer token from the Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::services::token::TokenServiceConfig;

    fn context_with_roles(roles: &[Role]) -> AuthContext {
        AuthContext {
            user_id: Uuid::new_v4(),
            family_id: Some(Uuid::new_v4()),
            roles: RoleSet::from_roles(roles),
        }
    }

    #[test]
    fn test_require_all() {
        let ctx = context_with_roles(&[Role::Reader, Role::Editor]);
        assert!(ctx.require_all(&[Role::Reader]).is_ok());
        assert!(ctx.require_all(&[Role::Admin]).is_err());
    }

    #[test]
    fn test_require_any() {
        let ctx = context_with_roles(&[Role::Reader]);
        assert!(ctx.require_any(&[Role::Admin, Role::Reader]).is_ok());
        assert!(ctx.require_any(&[Role::Admin, Role::Editor]).is_err());
    }

    #[test]
    fn test_context_from_access_claims() {
        let user_id = Uuid::new_v4();
        let family_id = Uuid::new_v4();
        let config = TokenServiceConfig::default();
        let claims = Claims::new_access_token(
            user_id,
            family_id,
            vec![Role::Editor],
            180,
            &config.issuer,
            &config.audience,
        );

        let ctx = AuthContext::from_claims(claims).unwrap();
        assert_eq!(ctx.user_id, user_id);
        assert_eq!(ctx.family_id, Some(family_id));
        assert!(ctx.roles.contains(Role::Editor));
    }
}
