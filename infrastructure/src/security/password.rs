use async_trait::async_trait;
use domain::ports::password::{PasswordHashError, PasswordHasherPort};
use tokio::task::{spawn_blocking, JoinError};
use tracing::{instrument, warn};

pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    #[instrument(level = "trace")]
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

#[async_trait]
impl PasswordHasherPort for BcryptPasswordHasher {
    #[instrument(level = "debug", skip_all)]
    async fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        let password = password.to_owned();
        let cost = self.cost;

        spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(worker_failed)?
            .map_err(|err| {
                warn!(error = ?err, "Failed to hash password");
                PasswordHashError::HashingFailed
            })
    }

    #[instrument(level = "debug", skip_all)]
    async fn verify(
        &self,
        password: &str,
        password_hash: &str,
    ) -> Result<bool, PasswordHashError> {
        let password = password.to_owned();
        let password_hash = password_hash.to_owned();

        spawn_blocking(move || bcrypt::verify(password, &password_hash))
            .await
            .map_err(worker_failed)?
            .map_err(|err| {
                warn!(error = ?err, "Stored password hash could not be parsed");
                PasswordHashError::MalformedHash
            })
    }
}

fn worker_failed(err: JoinError) -> PasswordHashError {
    warn!(error = ?err, "Blocking hashing task failed");
    PasswordHashError::WorkerFailed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_verifies_only_the_original_password() {
        let hasher = BcryptPasswordHasher::new(4);
        let hash = hasher.hash("secret").await.unwrap();

        assert_ne!(hash, "secret");
        assert!(hasher.verify("secret", &hash).await.unwrap());
        assert!(!hasher.verify("Secret", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn garbage_hash_is_malformed() {
        let hasher = BcryptPasswordHasher::new(4);

        assert!(matches!(
            hasher.verify("secret", "not-a-hash").await,
            Err(PasswordHashError::MalformedHash)
        ));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn hashing_leaves_the_runtime_free() {
        let hasher = BcryptPasswordHasher::new(12);
        let (tick_tx, mut tick_rx) = tokio::sync::oneshot::channel();

        let hashing = tokio::spawn(async move { hasher.hash("secret").await });
        tokio::spawn(async move {
            let _ = tick_tx.send(());
        });

        tick_rx.await.unwrap();
        assert!(!hashing.is_finished());
        assert!(hashing.await.unwrap().is_ok());
    }
}
