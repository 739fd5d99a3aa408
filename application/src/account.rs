use application_ports::account::{AccountError, AccountPort, CredentialsDto, RegistrationDto};
use async_trait::async_trait;
use domain::account::{
    create_account, is_password_length_valid, normalize_login, AccountRepository,
    AccountRepositoryError,
};
use domain::ports::password::{PasswordHashError, PasswordHasherPort};
use domain::ports::token::{TokenError, TokenPort};
use domain_shared::authentication::AccessToken;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

pub struct AccountHandler {
    account_repository: Arc<dyn AccountRepository + Send + Sync>,
    password_hasher: Arc<dyn PasswordHasherPort + Send + Sync>,
    token_port: Arc<dyn TokenPort + Send + Sync>,
}

impl AccountHandler {
    #[instrument(level = "trace", skip_all)]
    pub fn new(
        account_repository: Arc<dyn AccountRepository + Send + Sync>,
        password_hasher: Arc<dyn PasswordHasherPort + Send + Sync>,
        token_port: Arc<dyn TokenPort + Send + Sync>,
    ) -> Self {
        Self {
            account_repository,
            password_hasher,
            token_port,
        }
    }
}

#[async_trait]
impl AccountPort for AccountHandler {
    #[instrument(level = "info", skip(self, registration), fields(login = %registration.login))]
    async fn register(&self, registration: RegistrationDto) -> Result<(), AccountError> {
        if !is_password_length_valid(&registration.password) {
            return Err(AccountError::InvalidPassword);
        }

        let login = normalize_login(&registration.login);
        let existing = self
            .account_repository
            .find_one_by_login(&login)
            .await
            .map_err(map_account_repo_err)?;
        if existing.is_some() {
            warn!(login = %login, "Registration with a login that is already used");
            return Err(AccountError::LoginAlreadyUsed);
        }

        let password_hash = self
            .password_hasher
            .hash(&registration.password)
            .await
            .map_err(map_password_hash_err)?;

        let account = self
            .account_repository
            .save(&create_account(&login, password_hash))
            .await
            .map_err(map_account_repo_err)?;

        info!(
            account_id = account.id().map(|id| id.0),
            login = account.login(),
            "Account registered",
        );

        Ok(())
    }

    #[instrument(level = "info", skip(self, credentials), fields(login = %credentials.login))]
    async fn authenticate(&self, credentials: CredentialsDto) -> Result<AccessToken, AccountError> {
        let login = normalize_login(&credentials.login);
        let Some(account) = self
            .account_repository
            .find_one_by_login(&login)
            .await
            .map_err(map_account_repo_err)?
        else {
            warn!(login = %login, "Authentication for an unknown login");
            return Err(AccountError::BadCredentials);
        };

        let matches = self
            .password_hasher
            .verify(&credentials.password, account.password_hash())
            .await
            .map_err(map_password_hash_err)?;
        if !matches {
            warn!(login = %login, "Authentication with a wrong password");
            return Err(AccountError::BadCredentials);
        }

        let token = self
            .token_port
            .issue(account.login(), credentials.remember_me)
            .map_err(map_token_err)?;

        info!(login = %login, remember_me = credentials.remember_me, "Token issued");

        Ok(token)
    }

    #[instrument(level = "debug", skip_all)]
    async fn resolve_identity(&self, token: &AccessToken) -> Result<Option<String>, AccountError> {
        match self.token_port.validate(token) {
            Ok(login) => Ok(Some(login)),
            Err(TokenError::Invalid) => Ok(None),
            Err(err) => Err(map_token_err(err)),
        }
    }
}

#[instrument(level = "trace", skip_all)]
fn map_account_repo_err(err: AccountRepositoryError) -> AccountError {
    match err {
        AccountRepositoryError::LoginAlreadyUsed => {
            warn!("Storage rejected a duplicate login");
            AccountError::LoginAlreadyUsed
        }
        AccountRepositoryError::ServiceUnavailable => {
            error!("AccountRepositoryError::ServiceUnavailable");
            AccountError::TemporaryUnavailable
        }
    }
}

#[instrument(level = "trace", skip_all)]
fn map_password_hash_err(err: PasswordHashError) -> AccountError {
    match err {
        PasswordHashError::HashingFailed => {
            error!("PasswordHashError::HashingFailed");
            AccountError::TemporaryUnavailable
        }
        PasswordHashError::MalformedHash => {
            error!("PasswordHashError::MalformedHash");
            AccountError::BadCredentials
        }
        PasswordHashError::WorkerFailed => {
            error!("PasswordHashError::WorkerFailed");
            AccountError::TemporaryUnavailable
        }
    }
}

#[instrument(level = "trace", skip_all)]
fn map_token_err(err: TokenError) -> AccountError {
    error!(error = ?err, "Token port failed");
    AccountError::TemporaryUnavailable
}
