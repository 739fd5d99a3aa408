use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain_shared::authentication::AccountId;
use thiserror::Error;
use tracing::instrument;

pub const PASSWORD_MIN_LENGTH: usize = 4;
pub const PASSWORD_MAX_LENGTH: usize = 100;

pub struct Account {
    id: Option<AccountId>,
    login: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

/// Logins are stored and looked up lower-cased.
pub fn normalize_login(login: &str) -> String {
    login.to_lowercase()
}

pub fn is_password_length_valid(password: &str) -> bool {
    let length = password.chars().count();
    (PASSWORD_MIN_LENGTH..=PASSWORD_MAX_LENGTH).contains(&length)
}

#[instrument(level = "trace", skip(password_hash))]
pub fn create_account(login: &str, password_hash: String) -> Account {
    Account {
        id: None,
        login: normalize_login(login),
        password_hash,
        created_at: Utc::now(),
    }
}

impl Account {
    pub fn id(&self) -> Option<AccountId> {
        self.id
    }

    pub fn login(&self) -> &str {
        &self.login
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[instrument(level = "trace", skip(snapshot))]
    pub fn from_snapshot(snapshot: AccountSnapshot) -> Self {
        Self {
            id: snapshot.id,
            login: snapshot.login,
            password_hash: snapshot.password_hash,
            created_at: snapshot.created_at,
        }
    }

    #[instrument(level = "trace", skip(self))]
    pub fn to_snapshot(&self) -> AccountSnapshot {
        AccountSnapshot {
            id: self.id,
            login: self.login.clone(),
            password_hash: self.password_hash.clone(),
            created_at: self.created_at,
        }
    }
}

#[derive(Clone)]
pub struct AccountSnapshot {
    pub id: Option<AccountId>,
    pub login: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait AccountRepository {
    async fn save(&self, account: &Account) -> Result<Account, AccountRepositoryError>;
    /// Expects an already normalized login.
    async fn find_one_by_login(
        &self,
        login: &str,
    ) -> Result<Option<Account>, AccountRepositoryError>;
}

#[derive(Debug, Error)]
pub enum AccountRepositoryError {
    #[error("Login is already used")]
    LoginAlreadyUsed,
    #[error("Service is temporarily unavailable")]
    ServiceUnavailable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_account_has_lower_cased_login() {
        let account = create_account("John.Doe", "hash".to_string());

        assert_eq!(account.login(), "john.doe");
        assert!(account.id().is_none());
    }

    #[test]
    fn password_length_bounds() {
        assert!(!is_password_length_valid(""));
        assert!(!is_password_length_valid("abc"));
        assert!(is_password_length_valid("abcd"));
        assert!(is_password_length_valid(&"a".repeat(100)));
        assert!(!is_password_length_valid(&"a".repeat(101)));
    }
}
