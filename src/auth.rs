/// Credential handling and the session-based access-control gate.
///
/// Passwords are hashed with argon2 and stored as PHC strings. Sessions
/// carry only the user id; the user record is reloaded per request so a
/// stale cookie cannot resurrect a deleted or unknown account.
use actix_session::{Session, SessionInsertError};
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::rngs::OsRng;
use thiserror::Error;

use crate::db::models::User;
use crate::db::{Database, DbPool};

/// Session key holding the authenticated user's id.
pub const USER_ID_KEY: &str = "user_id";

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error("stored password hash is malformed: {0}")]
    Malformed(String),
}

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, CredentialError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CredentialError::Hash(e.to_string()))
}

/// Verify a password against a stored PHC hash. A mismatch is Ok(false);
/// only an unparseable stored hash is an error.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, CredentialError> {
    let parsed =
        PasswordHash::new(stored_hash).map_err(|e| CredentialError::Malformed(e.to_string()))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(CredentialError::Malformed(e.to_string())),
    }
}

/// Load the user the session cookie refers to, if any. Session read
/// failures and stale ids are logged and treated as "not signed in" so the
/// caller falls through to the login redirect.
pub async fn authenticated_user(pool: &DbPool, session: &Session) -> Option<User> {
    let user_id = match session.get::<i64>(USER_ID_KEY) {
        Ok(Some(id)) => id,
        Ok(None) => return None,
        Err(e) => {
            log::warn!("Failed to read session: {}", e);
            return None;
        }
    };

    match Database::get_user_by_id(pool, user_id).await {
        Ok(Some(user)) => Some(user),
        Ok(None) => {
            log::warn!("Session references unknown user id {}", user_id);
            None
        }
        Err(e) => {
            log::error!("Failed to load session user: {}", e);
            None
        }
    }
}

/// Mark the session as authenticated for the given user.
pub fn login_session(session: &Session, user: &User) -> Result<(), SessionInsertError> {
    session.insert(USER_ID_KEY, user.id)
}

/// Drop all session state, ending the login.
pub fn clear_session(session: &Session) {
    session.purge();
}
