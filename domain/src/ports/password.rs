use async_trait::async_trait;
use thiserror::Error;

/// Hashing is CPU bound; implementations must not block the async runtime.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait PasswordHasherPort {
    async fn hash(&self, password: &str) -> Result<String, PasswordHashError>;
    async fn verify(
        &self,
        password: &str,
        password_hash: &str,
    ) -> Result<bool, PasswordHashError>;
}

#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Password could not be hashed")]
    HashingFailed,
    #[error("Stored password hash is malformed")]
    MalformedHash,
    #[error("Hashing task did not complete")]
    WorkerFailed,
}
