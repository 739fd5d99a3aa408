use crate::args::CommonArgs;
use crate::locator::{ApplicationPortLocator, Repositories};
use anyhow::anyhow;
use chrono::Duration;
use clap::Args;
use infrastructure::memory::account::InMemoryAccountRepository;
use infrastructure::memory::student::InMemoryStudentRepository;
use infrastructure::memory::study_class::InMemoryStudyClassRepository;
use infrastructure::memory::teacher::InMemoryTeacherRepository;
use infrastructure::memory::InMemoryStore;
use infrastructure::postgres::account::PostgresAccountRepository;
use infrastructure::postgres::student::PostgresStudentRepository;
use infrastructure::postgres::study_class::PostgresStudyClassRepository;
use infrastructure::postgres::teacher::PostgresTeacherRepository;
use infrastructure::security::password::BcryptPasswordHasher;
use infrastructure::security::token::JwtTokenAdapter;
use presentation::api::run_api;
use std::sync::Arc;
use tracing::{info, instrument, warn};

#[derive(Args)]
pub struct ServeArgs {
    /// Port of the HTTP API
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,
    /// Secret used to sign and verify JWTs
    #[arg(long, env = "JWT_SECRET")]
    pub jwt_secret: String,
    #[arg(long, env = "TOKEN_VALIDITY_SECONDS", default_value_t = 86_400)]
    pub token_validity_seconds: i64,
    #[arg(long, env = "TOKEN_VALIDITY_SECONDS_FOR_REMEMBER_ME", default_value_t = 2_592_000)]
    pub token_validity_seconds_for_remember_me: i64,
    #[arg(long, env = "BCRYPT_COST", default_value_t = 10)]
    pub bcrypt_cost: u32,
    /// Keep all data in process memory instead of Postgres
    #[arg(long)]
    pub in_memory: bool,
}

#[instrument(level = "trace", skip(common_args, args))]
pub async fn run(common_args: CommonArgs, args: ServeArgs) -> anyhow::Result<()> {
    let ServeArgs {
        port,
        jwt_secret,
        token_validity_seconds,
        token_validity_seconds_for_remember_me,
        bcrypt_cost,
        in_memory,
    } = args;

    let repositories = if in_memory {
        warn!("Serving from in-memory storage, data is lost on exit");
        in_memory_repositories()
    } else {
        let database_connection =
            sqlx::PgPool::connect(common_args.require_database_url()?).await?;
        postgres_repositories(database_connection)
    };

    let password_hasher = Arc::new(BcryptPasswordHasher::new(bcrypt_cost));
    let token_adapter = Arc::new(JwtTokenAdapter::new(
        jwt_secret.as_bytes(),
        Duration::seconds(token_validity_seconds),
        Duration::seconds(token_validity_seconds_for_remember_me),
    ));

    let locator = ApplicationPortLocator::new(repositories, password_hasher, token_adapter);

    info!(port, in_memory, "Starting school registry");

    let api = tokio::spawn(run_api(locator, port));
    api.await?.map_err(|e| anyhow!(e))?;

    Ok(())
}

fn in_memory_repositories() -> Repositories {
    let store = InMemoryStore::new();

    Repositories {
        study_class: Arc::new(InMemoryStudyClassRepository::new(store.clone())),
        teacher: Arc::new(InMemoryTeacherRepository::new(store.clone())),
        student: Arc::new(InMemoryStudentRepository::new(store.clone())),
        account: Arc::new(InMemoryAccountRepository::new(store)),
    }
}

fn postgres_repositories(pool: sqlx::PgPool) -> Repositories {
    Repositories {
        study_class: Arc::new(PostgresStudyClassRepository::new(pool.clone())),
        teacher: Arc::new(PostgresTeacherRepository::new(pool.clone())),
        student: Arc::new(PostgresStudentRepository::new(pool.clone())),
        account: Arc::new(PostgresAccountRepository::new(pool)),
    }
}
