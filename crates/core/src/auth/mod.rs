mod error;
mod functions;
mod types;

pub use error::AuthError;
pub use functions::{decode_claims, query_enabled, token_valid};
pub use types::{AuthContext, TokenClaims};
