pub mod auth;
pub mod cors;

pub use auth::{AuthContext, JwtAuth, SessionAuthenticator};
pub use cors::create_cors;
