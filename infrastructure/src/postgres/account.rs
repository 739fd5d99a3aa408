use crate::database::{violation, Violation};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use domain::account::{Account, AccountRepository, AccountRepositoryError, AccountSnapshot};
use domain_shared::authentication::AccountId;
use sqlx::{query_as, FromRow, PgPool};
use tracing::{instrument, warn};

#[derive(FromRow)]
struct AccountRow {
    id: i64,
    login: String,
    password_hash: String,
    created_at: NaiveDateTime,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Account::from_snapshot(AccountSnapshot {
            id: Some(AccountId(row.id)),
            login: row.login,
            password_hash: row.password_hash,
            created_at: row.created_at.and_utc(),
        })
    }
}

pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    #[instrument(level = "trace", skip_all)]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    #[instrument(level = "debug", err, skip(self, account), fields(login = account.login()))]
    async fn save(&self, account: &Account) -> Result<Account, AccountRepositoryError> {
        let AccountSnapshot {
            id: _,
            login,
            password_hash,
            created_at,
        } = account.to_snapshot();

        let row = query_as::<_, AccountRow>(
            "INSERT INTO account (login, password_hash, created_at) VALUES ($1, $2, $3) RETURNING id, login, password_hash, created_at",
        )
        .bind(login)
        .bind(password_hash)
        .bind(created_at.naive_utc())
        .fetch_one(&self.pool)
        .await
        .map_err(|err| match violation(&err) {
            Violation::Unique => AccountRepositoryError::LoginAlreadyUsed,
            _ => {
                warn!(error = ?err, "Failed to save account");
                AccountRepositoryError::ServiceUnavailable
            }
        })?;

        Ok(row.into())
    }

    #[instrument(level = "debug", err, skip(self))]
    async fn find_one_by_login(
        &self,
        login: &str,
    ) -> Result<Option<Account>, AccountRepositoryError> {
        let row = query_as::<_, AccountRow>(
            "SELECT id, login, password_hash, created_at FROM account WHERE login = $1",
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| {
            warn!(error = ?err, "Failed to fetch account");
            AccountRepositoryError::ServiceUnavailable
        })?;

        Ok(row.map(Account::from))
    }
}
