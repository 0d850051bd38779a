use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("not logged in")]
    Unauthenticated,

    #[error("invalid credential: {0}")]
    InvalidCredential(String),

    #[error("session expired")]
    Expired,

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("password hash error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),
}
