use founderval_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Password must be at least 8 characters")]
    WeakPassword,

    #[error("User already exists")]
    UserExists,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("random source unavailable")]
    Random,

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}
