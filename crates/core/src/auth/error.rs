use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("malformed bearer token: {0}")]
    MalformedToken(String),
}
