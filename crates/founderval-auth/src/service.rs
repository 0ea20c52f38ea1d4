use std::num::NonZeroU32;
use std::sync::Arc;

use founderval_core::User;
use founderval_store::{BlobStore, StoreError, keys, load_json, save_json};
use tracing::{info, warn};
use uuid::Uuid;

use crate::AuthError;
use crate::credentials::{CredentialRecord, DEFAULT_ITERATIONS, session_token, verify_or_burn};

pub const MIN_PASSWORD_LEN: usize = 8;

pub const GOOGLE_NAME: &str = "Google User";
pub const GOOGLE_EMAIL: &str = "user@gmail.com";
pub const GOOGLE_AVATAR: &str =
    "https://ui-avatars.com/api/?name=Google+User&background=0D8ABC&color=fff";

/// Account and session operations over a [`BlobStore`].
///
/// The current session is a single stored [`User`] with no expiry; signing
/// in replaces it and [`logout`](Self::logout) removes it.
pub struct AuthService {
    blob: Arc<dyn BlobStore>,
    iterations: NonZeroU32,
}

impl AuthService {
    pub fn new(blob: Arc<dyn BlobStore>) -> Self {
        Self {
            blob,
            iterations: DEFAULT_ITERATIONS,
        }
    }

    /// Override the PBKDF2 work factor for newly created accounts.
    ///
    /// Existing accounts keep verifying with the count stored alongside them.
    pub fn with_hash_iterations(mut self, iterations: NonZeroU32) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn signup(&self, name: &str, email: &str, password: &str) -> Result<User, AuthError> {
        let email = normalize_email(email);
        if !email.contains('@') {
            return Err(AuthError::InvalidEmail);
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword);
        }

        let mut records = self.records()?;
        if records.iter().any(|r| r.email == email) {
            return Err(AuthError::UserExists);
        }

        let record = CredentialRecord::new(
            Uuid::new_v4().to_string(),
            name.trim().to_string(),
            email,
            password,
            self.iterations,
        )?;
        let (id, name, email) = (record.id.clone(), record.name.clone(), record.email.clone());
        records.push(record);
        save_json(self.blob.as_ref(), keys::USERS, &records)?;
        let user = self.start_session(&id, &name, &email, None)?;
        info!(user_id = %user.id, "account created");
        Ok(user)
    }

    pub fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = normalize_email(email);
        let records = self.records()?;
        let found = records.iter().find(|r| r.email == email);
        if !verify_or_burn(found, password, self.iterations) {
            return Err(AuthError::InvalidCredentials);
        }
        let record = found.ok_or(AuthError::InvalidCredentials)?;
        let user = self.start_session(&record.id, &record.name, &record.email, None)?;
        info!(user_id = %user.id, "signed in");
        Ok(user)
    }

    /// Sign in as the synthetic Google identity. Always succeeds.
    pub fn login_with_google(&self) -> Result<User, AuthError> {
        let id = format!("google-{}", Uuid::new_v4());
        let user = self.start_session(&id, GOOGLE_NAME, GOOGLE_EMAIL, Some(GOOGLE_AVATAR))?;
        info!(user_id = %user.id, "signed in with Google");
        Ok(user)
    }

    pub fn logout(&self) -> Result<(), AuthError> {
        self.blob.remove(keys::CURRENT_USER)?;
        info!("signed out");
        Ok(())
    }

    /// Request a password reset.
    ///
    /// Succeeds for any well-formed address, whether or not an account
    /// exists, so callers cannot probe for registered emails.
    pub fn reset_password(&self, email: &str) -> Result<(), AuthError> {
        if !normalize_email(email).contains('@') {
            return Err(AuthError::InvalidEmail);
        }
        info!("password reset requested");
        Ok(())
    }

    /// The stored session, if any. An unreadable record counts as signed out.
    pub fn current_user(&self) -> Result<Option<User>, AuthError> {
        match load_json::<User>(self.blob.as_ref(), keys::CURRENT_USER) {
            Ok(user) => Ok(user),
            Err(StoreError::Json(e)) => {
                warn!(error = %e, "discarding unreadable session");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn records(&self) -> Result<Vec<CredentialRecord>, AuthError> {
        match load_json::<Vec<CredentialRecord>>(self.blob.as_ref(), keys::USERS) {
            Ok(records) => Ok(records.unwrap_or_default()),
            Err(StoreError::Json(e)) => {
                warn!(error = %e, "failed to load accounts; treating as empty");
                Ok(Vec::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn start_session(
        &self,
        id: &str,
        name: &str,
        email: &str,
        avatar: Option<&str>,
    ) -> Result<User, AuthError> {
        let user = User {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            token: session_token()?,
            avatar: avatar.map(str::to_string),
        };
        save_json(self.blob.as_ref(), keys::CURRENT_USER, &user)?;
        Ok(user)
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
