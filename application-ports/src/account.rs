use async_trait::async_trait;
use domain_shared::authentication::AccessToken;
use thiserror::Error;

#[async_trait]
pub trait AccountPort {
    async fn register(&self, registration: RegistrationDto) -> Result<(), AccountError>;
    async fn authenticate(&self, credentials: CredentialsDto) -> Result<AccessToken, AccountError>;
    /// Resolves the login behind a token; `None` for an invalid or expired one.
    async fn resolve_identity(&self, token: &AccessToken) -> Result<Option<String>, AccountError>;
}

#[derive(Debug, Clone)]
pub struct RegistrationDto {
    pub login: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct CredentialsDto {
    pub login: String,
    pub password: String,
    pub remember_me: bool,
}

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Incorrect password")]
    InvalidPassword,
    #[error("login already exists")]
    LoginAlreadyUsed,
    #[error("Bad credentials")]
    BadCredentials,
    #[error("Service is temporarily unavailable")]
    TemporaryUnavailable,
}
