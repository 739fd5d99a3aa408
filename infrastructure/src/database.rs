use sqlx::migrate::Migrator;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Classification of the Postgres errors the repositories translate into
/// domain errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Violation {
    Unique,
    ForeignKey,
    Other,
}

pub(crate) fn violation(err: &sqlx::Error) -> Violation {
    let Some(db_err) = err.as_database_error() else {
        return Violation::Other;
    };
    if db_err.is_unique_violation() {
        return Violation::Unique;
    }
    if db_err.is_foreign_key_violation() {
        return Violation::ForeignKey;
    }
    Violation::Other
}

