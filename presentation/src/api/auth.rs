use crate::api::error::ApiError;
use crate::application_ports::Locator;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use domain_shared::authentication::AccessToken;
use tracing::{debug, instrument};

const BEARER_PREFIX: &str = "Bearer ";

/// Login of the caller, taken from a valid bearer token. Rejects with 401
/// otherwise.
#[derive(Debug)]
pub struct Authenticated(pub String);

/// Like [`Authenticated`] but lets anonymous callers through.
#[derive(Debug)]
pub struct Identity(pub Option<String>);

pub(crate) fn bearer_token(parts: &Parts) -> Option<AccessToken> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix(BEARER_PREFIX)?.trim();
    if token.is_empty() {
        return None;
    }

    Some(AccessToken(token.to_string()))
}

impl<S> FromRequestParts<S> for Identity
where
    S: Locator + Send + Sync,
{
    type Rejection = ApiError;

    #[instrument(level = "debug", skip_all)]
    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts) else {
            return Ok(Identity(None));
        };

        let login = state.get_account_port().resolve_identity(&token).await?;

        Ok(Identity(login))
    }
}

impl<S> FromRequestParts<S> for Authenticated
where
    S: Locator + Send + Sync,
{
    type Rejection = ApiError;

    #[instrument(level = "debug", skip_all)]
    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Identity::from_request_parts(parts, state).await? {
            Identity(Some(login)) => Ok(Authenticated(login)),
            Identity(None) => {
                debug!(uri = %parts.uri, "Anonymous request to a protected route");
                Err(ApiError::Unauthorized)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(authorization: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/students");
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn bearer_token_is_extracted() {
        let token = bearer_token(&parts(Some("Bearer abc.def"))).unwrap();

        assert_eq!(token.0, "abc.def");
    }

    #[test]
    fn other_schemes_and_empty_tokens_are_ignored() {
        assert!(bearer_token(&parts(Some("Basic dXNlcjpwYXNz"))).is_none());
        assert!(bearer_token(&parts(Some("Bearer "))).is_none());
        assert!(bearer_token(&parts(None)).is_none());
    }
}
