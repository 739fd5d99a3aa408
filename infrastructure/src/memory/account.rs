use crate::memory::{InMemoryStore, Sequence};
use async_trait::async_trait;
use domain::account::{Account, AccountRepository, AccountRepositoryError};
use domain_shared::authentication::AccountId;
use tracing::instrument;

pub struct InMemoryAccountRepository {
    store: InMemoryStore,
}

impl InMemoryAccountRepository {
    #[instrument(level = "trace", skip_all)]
    pub fn new(store: InMemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    #[instrument(level = "debug", err, skip(self, account), fields(login = account.login()))]
    async fn save(&self, account: &Account) -> Result<Account, AccountRepositoryError> {
        let mut tables = self.store.lock().await;
        let mut snapshot = account.to_snapshot();

        if tables.accounts.contains_key(&snapshot.login) {
            return Err(AccountRepositoryError::LoginAlreadyUsed);
        }

        snapshot.id = Some(AccountId(tables.next_id(Sequence::Account)));
        tables
            .accounts
            .insert(snapshot.login.clone(), snapshot.clone());

        Ok(Account::from_snapshot(snapshot))
    }

    #[instrument(level = "debug", err, skip(self))]
    async fn find_one_by_login(
        &self,
        login: &str,
    ) -> Result<Option<Account>, AccountRepositoryError> {
        let tables = self.store.lock().await;

        Ok(tables.accounts.get(login).cloned().map(Account::from_snapshot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::account::create_account;

    #[tokio::test]
    async fn duplicate_login_is_rejected() {
        let repository = InMemoryAccountRepository::new(InMemoryStore::new());
        repository
            .save(&create_account("john", "hash".to_string()))
            .await
            .unwrap();

        let result = repository
            .save(&create_account("JOHN", "other".to_string()))
            .await;

        assert!(matches!(result, Err(AccountRepositoryError::LoginAlreadyUsed)));
    }

    #[tokio::test]
    async fn saved_account_is_found_by_login() {
        let repository = InMemoryAccountRepository::new(InMemoryStore::new());
        let saved = repository
            .save(&create_account("john", "hash".to_string()))
            .await
            .unwrap();

        let found = repository.find_one_by_login("john").await.unwrap().unwrap();

        assert_eq!(found.id(), saved.id());
        assert_eq!(found.password_hash(), "hash");
    }
}
