//! Domain entities representing core business objects.

pub mod account;
pub mod token;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use account::{Account, RoleName};
pub use token::{Claims, Token, TOKEN_TYPE_BEARER};
