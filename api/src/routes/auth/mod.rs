//! Authentication route handlers
//!
//! Login is public; refresh, logout and the session lookup require a bearer
//! access value.

pub mod login;
pub mod logout;
pub mod me;
pub mod refresh;

use std::sync::Arc;

use orchid_core::{AccountRepository, AuthService, TokenRepository};

/// Shared state handed to every auth handler
pub struct AppState<T, A>
where
    T: TokenRepository,
    A: AccountRepository,
{
    pub auth_service: Arc<AuthService<T, A>>,
}

impl<T, A> AppState<T, A>
where
    T: TokenRepository,
    A: AccountRepository,
{
    pub fn new(auth_service: Arc<AuthService<T, A>>) -> Self {
        Self { auth_service }
    }
}
