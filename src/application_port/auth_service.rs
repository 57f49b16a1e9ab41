use crate::application_port::ForumError;
use crate::domain_model::User;

pub const INVALID_AUTHENTICATION: &str = "Invalid authentication.";

#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Parses the `<username> <password>` form carried by the authorization header.
    pub fn parse(value: &str) -> Option<Credentials> {
        let (username, password) = value.split_once(' ')?;
        if username.is_empty() || password.is_empty() {
            return None;
        }
        Some(Credentials {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

#[async_trait::async_trait]
pub trait CredentialHasher: Send + Sync {
    async fn hash_password(&self, password: &str) -> Result<String, ForumError>;
    async fn verify_password(&self, password: &str, password_hash: &str)
    -> Result<bool, ForumError>;
}

#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Resolves the acting user, or fails with `ForumError::Authentication`.
    async fn resolve(&self, credentials: &Credentials) -> Result<User, ForumError>;
}
