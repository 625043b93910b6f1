//! Test application wired to in-memory repositories

use std::sync::Arc;

use actix_web::web;
use chrono::Duration;

use orchid_api::routes::auth::AppState;
use orchid_core::{
    Account, AuthService, JwtSigner, ManualClock, MockAccountRepository, MockTokenRepository,
    RoleName, TokenService, TokenServiceConfig,
};

pub const PASSWORD: &str = "orchid-pass-123";
pub const ACCESS_TTL: i64 = 300;

pub type State = AppState<MockTokenRepository, MockAccountRepository>;

pub struct TestContext {
    pub state: web::Data<State>,
    pub tokens: Arc<MockTokenRepository>,
    pub clock: Arc<ManualClock>,
    pub mai: Account,
    pub linh: Account,
}

impl TestContext {
    pub fn advance(&self, seconds: i64) {
        self.clock.advance(Duration::seconds(seconds));
    }
}

fn account(name: &str, email: &str) -> Account {
    // Minimum bcrypt cost keeps the suite fast
    let hash = bcrypt::hash(PASSWORD, 4).unwrap();
    Account::new(name, email, hash, RoleName::User)
}

pub fn setup() -> TestContext {
    let mai = account("Mai", "mai@orchid.shop");
    let linh = account("Linh", "linh@orchid.shop");

    let tokens = Arc::new(MockTokenRepository::new());
    let accounts = Arc::new(MockAccountRepository::with_accounts(vec![
        mai.clone(),
        linh.clone(),
    ]));
    let clock = Arc::new(ManualClock::starting_now());
    let signer = Arc::new(JwtSigner::new(
        "api-test-secret",
        "orchid-shop",
        "orchid-shop-api",
    ));

    let config = TokenServiceConfig {
        access_token_ttl_seconds: ACCESS_TTL,
        refresh_token_ttl_seconds: ACCESS_TTL * 10,
        max_active_tokens_per_account: 3,
        enforce_refresh_ownership: true,
    };
    let token_service = Arc::new(
        TokenService::new(Arc::clone(&tokens), Arc::clone(&accounts), signer, config)
            .with_clock(clock.clone()),
    );
    let auth_service = Arc::new(AuthService::new(accounts, token_service));

    TestContext {
        state: web::Data::new(AppState::new(auth_service)),
        tokens,
        clock,
        mai,
        linh,
    }
}
