use crate::application_port::*;
use crate::domain_model::User;
use crate::domain_port::UserRepo;
use crate::logger::*;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use std::sync::Arc;

pub struct Argon2PasswordHasher;

#[async_trait::async_trait]
impl CredentialHasher for Argon2PasswordHasher {
    async fn hash_password(&self, password: &str) -> Result<String, ForumError> {
        let password = password.to_owned();
        tokio::task::spawn_blocking(move || {
            let salt = argon2::password_hash::SaltString::generate(&mut OsRng);
            Argon2::default()
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|e| ForumError::store(format!("hash error: {e}")))
        })
        .await
        .map_err(|e| ForumError::store(format!("hash task: {e}")))?
    }

    async fn verify_password(
        &self,
        password: &str,
        password_hash: &str,
    ) -> Result<bool, ForumError> {
        let password = password.to_owned();
        let password_hash = password_hash.to_owned();
        tokio::task::spawn_blocking(move || {
            // e.g. a hash written by another hasher backend; treat as a mismatch
            let parsed = match PasswordHash::new(&password_hash) {
                Ok(parsed) => parsed,
                Err(e) => {
                    warn!("stored password hash is not a PHC string: {}", e);
                    return Ok(false);
                }
            };

            match Argon2::default().verify_password(password.as_bytes(), &parsed) {
                Ok(_) => Ok(true),
                Err(argon2::password_hash::Error::Password) => Ok(false),
                Err(e) => Err(ForumError::store(format!("verify error: {e}"))),
            }
        })
        .await
        .map_err(|e| ForumError::store(format!("verify task: {e}")))?
    }
}

/// Resolves `<username> <password>` credentials against the user store.
pub struct RealAuthService {
    user_repo: Arc<dyn UserRepo>,
    credential_hasher: Arc<dyn CredentialHasher>,
}

impl RealAuthService {
    pub fn new(user_repo: Arc<dyn UserRepo>, credential_hasher: Arc<dyn CredentialHasher>) -> Self {
        RealAuthService {
            user_repo,
            credential_hasher,
        }
    }
}

#[async_trait::async_trait]
impl AuthService for RealAuthService {
    async fn resolve(&self, credentials: &Credentials) -> Result<User, ForumError> {
        let invalid = || ForumError::Authentication(INVALID_AUTHENTICATION.to_string());

        let user = self
            .user_repo
            .get_by_username(&credentials.username)
            .await?
            .ok_or_else(invalid)?;

        let verified = self
            .credential_hasher
            .verify_password(&credentials.password, &user.password_hash)
            .await?;
        if !verified {
            return Err(invalid());
        }

        Ok(user)
    }
}
