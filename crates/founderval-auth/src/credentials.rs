//! Stored account records and password hashing.

use std::num::NonZeroU32;

use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};

use crate::AuthError;

static PBKDF2_ALG: pbkdf2::Algorithm = pbkdf2::PBKDF2_HMAC_SHA256;
const SALT_LEN: usize = 16;
const HASH_LEN: usize = 32;
const TOKEN_LEN: usize = 32;

pub(crate) const DEFAULT_ITERATIONS: NonZeroU32 = NonZeroU32::new(100_000).unwrap();

/// One account as persisted under the users key. Never holds the plaintext.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CredentialRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Hex-encoded random salt.
    pub salt: String,
    /// Hex-encoded PBKDF2-HMAC-SHA256 output.
    pub password_hash: String,
    pub iterations: u32,
}

impl CredentialRecord {
    pub fn new(
        id: String,
        name: String,
        email: String,
        password: &str,
        iterations: NonZeroU32,
    ) -> Result<Self, AuthError> {
        let mut salt = [0u8; SALT_LEN];
        SystemRandom::new()
            .fill(&mut salt)
            .map_err(|_| AuthError::Random)?;
        let mut hash = [0u8; HASH_LEN];
        pbkdf2::derive(PBKDF2_ALG, iterations, &salt, password.as_bytes(), &mut hash);
        Ok(Self {
            id,
            name,
            email,
            salt: hex::encode(salt),
            password_hash: hex::encode(hash),
            iterations: iterations.get(),
        })
    }

    /// Constant-time check of `password` against the stored hash.
    pub fn verify(&self, password: &str) -> bool {
        let (Ok(salt), Ok(expected), Some(iterations)) = (
            hex::decode(&self.salt),
            hex::decode(&self.password_hash),
            NonZeroU32::new(self.iterations),
        ) else {
            return false;
        };
        pbkdf2::verify(
            PBKDF2_ALG,
            iterations,
            &salt,
            password.as_bytes(),
            &expected,
        )
        .is_ok()
    }
}

/// Verify `password` against `record`, or burn an equivalent PBKDF2
/// derivation when there is no record, so unknown emails cost the same as
/// wrong passwords.
pub(crate) fn verify_or_burn(
    record: Option<&CredentialRecord>,
    password: &str,
    iterations: NonZeroU32,
) -> bool {
    match record {
        Some(record) => record.verify(password),
        None => {
            let mut scratch = [0u8; HASH_LEN];
            pbkdf2::derive(
                PBKDF2_ALG,
                iterations,
                &[0u8; SALT_LEN],
                password.as_bytes(),
                &mut scratch,
            );
            false
        }
    }
}

/// Fresh opaque session token.
pub(crate) fn session_token() -> Result<String, AuthError> {
    let mut bytes = [0u8; TOKEN_LEN];
    SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| AuthError::Random)?;
    Ok(hex::encode(bytes))
}
