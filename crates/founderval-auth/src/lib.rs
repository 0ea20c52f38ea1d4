//! Local accounts and the current session.
//!
//! A stand-in for a real identity provider: accounts live in the blob store,
//! passwords are salted PBKDF2 hashes, and the session record never expires.

mod credentials;
mod error;
mod service;

pub use error::AuthError;
pub use service::{AuthService, GOOGLE_AVATAR, GOOGLE_EMAIL, GOOGLE_NAME, MIN_PASSWORD_LEN};
