use domain_shared::authentication::AccessToken;
use thiserror::Error;

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait TokenPort {
    /// Issues a signed token whose subject is `login`.
    fn issue(&self, login: &str, remember_me: bool) -> Result<AccessToken, TokenError>;
    /// Returns the subject of a valid token.
    fn validate(&self, token: &AccessToken) -> Result<String, TokenError>;
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token is invalid or expired")]
    Invalid,
    #[error("Token could not be issued")]
    IssuingFailed,
}
