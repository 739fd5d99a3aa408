use chrono::{Duration, Utc};
use domain::ports::token::{TokenError, TokenPort};
use domain_shared::authentication::AccessToken;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Issues and validates HS512-signed JWTs carrying the account login as
/// subject.
pub struct JwtTokenAdapter {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validity: Duration,
    validity_for_remember_me: Duration,
}

impl JwtTokenAdapter {
    #[instrument(level = "trace", skip(secret))]
    pub fn new(secret: &[u8], validity: Duration, validity_for_remember_me: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validity,
            validity_for_remember_me,
        }
    }
}

impl TokenPort for JwtTokenAdapter {
    #[instrument(level = "debug", skip(self))]
    fn issue(&self, login: &str, remember_me: bool) -> Result<AccessToken, TokenError> {
        let now = Utc::now();
        let validity = if remember_me {
            self.validity_for_remember_me
        } else {
            self.validity
        };
        let claims = Claims {
            sub: login.to_string(),
            iat: now.timestamp(),
            exp: (now + validity).timestamp(),
        };

        encode(&Header::new(Algorithm::HS512), &claims, &self.encoding_key)
            .map(AccessToken)
            .map_err(|err| {
                warn!(error = ?err, "Failed to sign token");
                TokenError::IssuingFailed
            })
    }

    #[instrument(level = "debug", skip_all)]
    fn validate(&self, token: &AccessToken) -> Result<String, TokenError> {
        let mut validation = Validation::new(Algorithm::HS512);
        validation.leeway = 0;

        decode::<Claims>(&token.0, &self.decoding_key, &validation)
            .map(|data| data.claims.sub)
            .map_err(|err| {
                debug!(error = ?err, "Rejected token");
                TokenError::Invalid
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter(secret: &[u8]) -> JwtTokenAdapter {
        JwtTokenAdapter::new(secret, Duration::seconds(60), Duration::days(30))
    }

    #[test]
    fn issued_token_resolves_to_login() {
        let adapter = adapter(b"a-very-secret-key");

        let token = adapter.issue("john", false).unwrap();

        assert_eq!(adapter.validate(&token).unwrap(), "john");
    }

    #[test]
    fn token_signed_with_other_secret_is_invalid() {
        let token = adapter(b"first-secret").issue("john", true).unwrap();

        assert!(matches!(
            adapter(b"second-secret").validate(&token),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn expired_token_is_invalid() {
        let adapter = JwtTokenAdapter::new(b"secret", Duration::seconds(-10), Duration::days(30));

        let token = adapter.issue("john", false).unwrap();

        assert!(matches!(adapter.validate(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn remember_me_outlives_regular_validity() {
        let adapter = JwtTokenAdapter::new(b"secret", Duration::seconds(-10), Duration::days(30));

        let token = adapter.issue("john", true).unwrap();

        assert_eq!(adapter.validate(&token).unwrap(), "john");
    }
}
