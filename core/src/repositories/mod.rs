pub mod account;
pub mod token;

pub use account::AccountRepository;
pub use token::TokenRepository;

#[cfg(any(test, feature = "mock-repositories"))]
pub use account::MockAccountRepository;
#[cfg(any(test, feature = "mock-repositories"))]
pub use token::MockTokenRepository;
