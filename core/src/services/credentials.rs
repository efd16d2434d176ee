//! Administrator credential verification.

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand::rngs::OsRng;
use std::sync::Arc;

use crate::domain::entities::user::User;
use crate::errors::{AuthError, DomainError, DomainResult};
use crate::repositories::UserRepository;

/// Outcome of a successful credential check
#[derive(Debug, Clone)]
pub struct VerifiedCredentials {
    /// The authenticated administrator
    pub user: User,

    /// Advisory: the submitted password equals the configured default.
    /// Login proceeds regardless; the caller should prompt a change.
    pub must_change_password: bool,
}

/// Validates admin username/password against the stored argon2 hash.
///
/// Unknown username, wrong role, missing hash, and wrong password are
/// indistinguishable to the caller.
pub struct CredentialVerifier<U: UserRepository> {
    users: Arc<U>,
    default_password: String,
}

impl<U: UserRepository> CredentialVerifier<U> {
    /// Creates a verifier; `default_password` is the bootstrap admin password
    /// used only for the advisory comparison
    pub fn new(users: Arc<U>, default_password: String) -> Self {
        Self {
            users,
            default_password,
        }
    }

    /// Verify a username/password pair.
    ///
    /// The username resolves through the phone column (admin accounts are
    /// seeded with a phone-shaped login).
    pub async fn verify(&self, username: &str, password: &str) -> DomainResult<VerifiedCredentials> {
        let user = self
            .users
            .find_by_phone(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.is_admin() {
            return Err(AuthError::InvalidCredentials.into());
        }

        let stored_hash = user
            .password_hash
            .as_deref()
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, stored_hash)? {
            tracing::warn!(
                user_id = %user.id,
                event = "admin_login_rejected",
                "Admin password verification failed"
            );
            return Err(AuthError::InvalidCredentials.into());
        }

        let must_change_password = password == self.default_password;

        Ok(VerifiedCredentials {
            user,
            must_change_password,
        })
    }
}

/// Hash a password with argon2id and a random salt
pub fn hash_password(plain: &str) -> DomainResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| DomainError::Internal {
            message: format!("argon2 hash: {e}"),
        })?
        .to_string();
    Ok(hash)
}

/// Verify a password against a stored argon2 hash
pub fn verify_password(plain: &str, hash: &str) -> DomainResult<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| DomainError::Internal {
        message: format!("bad password hash: {e}"),
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}
