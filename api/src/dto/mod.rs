pub mod auth;

pub use auth::{AccountDto, LoginData, LoginRequest, RefreshTokenRequest, TokenDto};
