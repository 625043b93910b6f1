//! Shared fixtures for token service tests

use std::sync::Arc;

use crate::domain::entities::{Account, RoleName};
use crate::repositories::{MockAccountRepository, MockTokenRepository};
use crate::services::token::{JwtSigner, ManualClock, TokenService, TokenServiceConfig};

pub const SECRET: &str = "test-secret-for-token-service";
pub const ISSUER: &str = "orchid-shop";
pub const AUDIENCE: &str = "orchid-shop-api";
pub const ACCESS_TTL: i64 = 60;
pub const REFRESH_TTL: i64 = 600;

pub type Service = TokenService<MockTokenRepository, MockAccountRepository>;

pub struct Fixture {
    pub service: Arc<Service>,
    pub tokens: Arc<MockTokenRepository>,
    pub clock: Arc<ManualClock>,
    pub signer: Arc<JwtSigner>,
}

pub fn test_config() -> TokenServiceConfig {
    TokenServiceConfig {
        access_token_ttl_seconds: ACCESS_TTL,
        refresh_token_ttl_seconds: REFRESH_TTL,
        max_active_tokens_per_account: 3,
        enforce_refresh_ownership: true,
    }
}

pub fn account(name: &str) -> Account {
    Account::new(name, format!("{}@orchid.shop", name.to_lowercase()), "hash", RoleName::User)
}

pub fn fixture_with(config: TokenServiceConfig, accounts: Vec<Account>) -> Fixture {
    let tokens = Arc::new(MockTokenRepository::new());
    let accounts = Arc::new(MockAccountRepository::with_accounts(accounts));
    let clock = Arc::new(ManualClock::starting_now());
    let signer = Arc::new(JwtSigner::new(SECRET, ISSUER, AUDIENCE));

    let service = TokenService::new(
        Arc::clone(&tokens),
        Arc::clone(&accounts),
        signer.clone(),
        config,
    )
    .with_clock(clock.clone());

    Fixture {
        service: Arc::new(service),
        tokens,
        clock,
        signer,
    }
}

pub fn fixture(accounts: Vec<Account>) -> Fixture {
    fixture_with(test_config(), accounts)
}
