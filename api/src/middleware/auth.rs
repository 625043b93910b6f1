//! Bearer authentication middleware for protected endpoints.
//!
//! The middleware reads the access value from the `Authorization` header,
//! resolves it through a [`SessionAuthenticator`] and injects an
//! [`AuthContext`] into the request extensions for handlers to extract.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    Error, FromRequest, HttpMessage, HttpRequest, ResponseError,
};
use async_trait::async_trait;
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};
use uuid::Uuid;

use orchid_core::{AccountRepository, DomainResult, Token, TokenRepository, TokenService};

use crate::handlers::error::ApiError;

/// Authenticated caller injected into requests
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Owner of the presented token
    pub account_id: Uuid,
    /// Stored token the access value belongs to
    pub token_id: Uuid,
    /// The access value exactly as presented
    pub access_token: String,
}

impl AuthContext {
    fn from_token(token: &Token, access_token: String) -> Self {
        Self {
            account_id: token.account_id,
            token_id: token.id,
            access_token,
        }
    }
}

/// Resolves presented access values to stored tokens.
///
/// Lets the middleware stay independent of the repository types behind the
/// token service.
#[async_trait]
pub trait SessionAuthenticator: Send + Sync {
    /// Active, unexpired token for `access_token`
    async fn authenticate(&self, access_token: &str) -> DomainResult<Token>;

    /// Unrevoked token for `access_token`, even past its access expiry
    async fn identify(&self, access_token: &str) -> DomainResult<Token>;
}

#[async_trait]
impl<T, A> SessionAuthenticator for TokenService<T, A>
where
    T: TokenRepository,
    A: AccountRepository,
{
    async fn authenticate(&self, access_token: &str) -> DomainResult<Token> {
        TokenService::authenticate(self, access_token).await
    }

    async fn identify(&self, access_token: &str) -> DomainResult<Token> {
        TokenService::identify(self, access_token).await
    }
}

/// How strictly the presented access value is checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthMode {
    Active,
    AllowExpired,
}

/// Bearer authentication middleware factory
#[derive(Clone)]
pub struct JwtAuth {
    authenticator: Arc<dyn SessionAuthenticator>,
    mode: AuthMode,
}

impl JwtAuth {
    /// Requires an active access value
    pub fn new(authenticator: Arc<dyn SessionAuthenticator>) -> Self {
        Self {
            authenticator,
            mode: AuthMode::Active,
        }
    }

    /// Also accepts an access value past its expiry, for the refresh exchange
    pub fn allow_expired(authenticator: Arc<dyn SessionAuthenticator>) -> Self {
        Self {
            authenticator,
            mode: AuthMode::AllowExpired,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
            authenticator: Arc::clone(&self.authenticator),
            mode: self.mode,
        }))
    }
}

/// Bearer authentication middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
    authenticator: Arc<dyn SessionAuthenticator>,
    mode: AuthMode,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let authenticator = Arc::clone(&self.authenticator);
        let mode = self.mode;

        Box::pin(async move {
            let access_token = match extract_bearer_token(&req) {
                Some(token) => token,
                None => {
                    return Ok(reject(
                        req,
                        ApiError::Unauthorized("Missing or invalid Authorization header"),
                    ))
                }
            };

            let resolved = match mode {
                AuthMode::Active => authenticator.authenticate(&access_token).await,
                AuthMode::AllowExpired => authenticator.identify(&access_token).await,
            };

            let token = match resolved {
                Ok(token) => token,
                Err(error) => {
                    tracing::debug!(error = %error, path = req.path(), "Bearer authentication failed");
                    return Ok(reject(req, ApiError::Rejected(error)));
                }
            };

            req.extensions_mut()
                .insert(AuthContext::from_token(&token, access_token));

            service
                .call(req)
                .await
                .map(ServiceResponse::map_into_left_body)
        })
    }
}

/// Short-circuits the request with the error's JSON response
fn reject<B>(req: ServiceRequest, error: ApiError) -> ServiceResponse<EitherBody<B>> {
    req.into_response(error.error_response())
        .map_into_right_body()
}

/// Extracts Bearer token from Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("Authentication required").into());

        ready(result)
    }
}
