use crate::application_port::{CredentialHasher, ForumError};

const FAKE_PREFIX: &str = "plain$";

/// Stores passwords behind a marker prefix instead of hashing them.
/// Selected by `auth.backend = "fake"` for local runs and tests.
#[derive(Debug)]
pub struct FakeCredentialHasher;

impl FakeCredentialHasher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl CredentialHasher for FakeCredentialHasher {
    async fn hash_password(&self, password: &str) -> Result<String, ForumError> {
        Ok(format!("{FAKE_PREFIX}{password}"))
    }

    async fn verify_password(
        &self,
        password: &str,
        password_hash: &str,
    ) -> Result<bool, ForumError> {
        Ok(password_hash.strip_prefix(FAKE_PREFIX) == Some(password))
    }
}
