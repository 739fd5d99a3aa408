use crate::api::auth::Identity;
use crate::api::error::ApiError;
use crate::api::validation::ValidatedJson;
use crate::application_ports::Locator;
use application_ports::account::{CredentialsDto, RegistrationDto};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use validator::{Validate, ValidationError};

const LOGIN_SYMBOLS: &str = "_.@-";

/// Logins are ASCII letters, digits and `_.@-`.
fn validate_login(login: &str) -> Result<(), ValidationError> {
    let allowed = |c: char| c.is_ascii_alphanumeric() || LOGIN_SYMBOLS.contains(c);
    if login.chars().all(allowed) {
        Ok(())
    } else {
        Err(ValidationError::new("pattern")
            .with_message("login may only contain letters, digits and _.@-".into()))
    }
}

#[derive(Deserialize, Validate)]
pub struct RegistrationBody {
    #[validate(length(min = 1, max = 50), custom(function = "validate_login"))]
    login: String,
    password: String,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginBody {
    #[validate(length(min = 1, max = 50))]
    username: String,
    #[validate(length(min = 4, max = 100))]
    password: String,
    #[serde(default)]
    remember_me: bool,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    id_token: String,
}

#[instrument(level = "info", skip(locator, body), fields(login = %body.login))]
pub async fn register<L: Locator>(
    State(locator): State<L>,
    ValidatedJson(body): ValidatedJson<RegistrationBody>,
) -> Result<StatusCode, ApiError> {
    locator
        .get_account_port()
        .register(RegistrationDto {
            login: body.login,
            password: body.password,
        })
        .await?;

    Ok(StatusCode::CREATED)
}

#[instrument(level = "info", skip(locator, body), fields(login = %body.username))]
pub async fn authenticate<L: Locator>(
    State(locator): State<L>,
    ValidatedJson(body): ValidatedJson<LoginBody>,
) -> Result<([(header::HeaderName, String); 1], Json<TokenResponse>), ApiError> {
    let token = locator
        .get_account_port()
        .authenticate(CredentialsDto {
            login: body.username,
            password: body.password,
            remember_me: body.remember_me,
        })
        .await?;

    Ok((
        [(header::AUTHORIZATION, format!("Bearer {}", token.0))],
        Json(TokenResponse { id_token: token.0 }),
    ))
}

/// Login of the caller, or an empty body for anonymous callers.
#[instrument(level = "debug", skip_all)]
pub async fn is_authenticated(Identity(login): Identity) -> String {
    login.unwrap_or_default()
}
