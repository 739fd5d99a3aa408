use crate::database::{violation, Violation};
use crate::postgres::page_bounds;
use async_trait::async_trait;
use domain::study_class::{
    StudyClass, StudyClassRepository, StudyClassRepositoryError, StudyClassSnapshot,
};
use domain_shared::pagination::{Page, PageRequest};
use domain_shared::school::StudyClassId;
use sqlx::{query, query_as, query_scalar, FromRow, PgPool};
use tracing::{instrument, warn};

#[derive(FromRow)]
struct StudyClassRow {
    id: i64,
    name: String,
}

impl From<StudyClassRow> for StudyClass {
    fn from(row: StudyClassRow) -> Self {
        StudyClass::from_snapshot(StudyClassSnapshot {
            id: Some(StudyClassId(row.id)),
            name: row.name,
        })
    }
}

pub struct PostgresStudyClassRepository {
    pool: PgPool,
}

impl PostgresStudyClassRepository {
    #[instrument(level = "trace", skip_all)]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn unavailable(err: sqlx::Error) -> StudyClassRepositoryError {
    warn!(error = ?err, "Study class query failed");
    StudyClassRepositoryError::ServiceUnavailable
}

#[async_trait]
impl StudyClassRepository for PostgresStudyClassRepository {
    #[instrument(level = "debug", err, skip(self, study_class))]
    async fn save(
        &self,
        study_class: &StudyClass,
    ) -> Result<StudyClass, StudyClassRepositoryError> {
        let StudyClassSnapshot { id, name } = study_class.to_snapshot();

        let row = match id {
            None => {
                query_as::<_, StudyClassRow>(
                    "INSERT INTO study_class (name) VALUES ($1) RETURNING id, name",
                )
                .bind(name)
                .fetch_one(&self.pool)
                .await
            }
            Some(StudyClassId(id)) => {
                query_as::<_, StudyClassRow>(
                    "INSERT INTO study_class (id, name) VALUES ($1, $2) ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name RETURNING id, name",
                )
                .bind(id)
                .bind(name)
                .fetch_one(&self.pool)
                .await
            }
        }
        .map_err(unavailable)?;

        Ok(row.into())
    }

    #[instrument(level = "debug", err, skip(self))]
    async fn find_by_id(
        &self,
        id: StudyClassId,
    ) -> Result<Option<StudyClass>, StudyClassRepositoryError> {
        let row = query_as::<_, StudyClassRow>("SELECT id, name FROM study_class WHERE id = $1")
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(unavailable)?;

        Ok(row.map(StudyClass::from))
    }

    #[instrument(level = "debug", err, skip(self))]
    async fn find_all(
        &self,
        page: PageRequest,
    ) -> Result<Page<StudyClass>, StudyClassRepositoryError> {
        let (limit, offset) = page_bounds(page);

        let total: i64 = query_scalar("SELECT COUNT(*) FROM study_class")
            .fetch_one(&self.pool)
            .await
            .map_err(unavailable)?;
        let rows = query_as::<_, StudyClassRow>(
            "SELECT id, name FROM study_class ORDER BY id LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(unavailable)?;

        Ok(Page::new(
            rows.into_iter().map(StudyClass::from).collect(),
            total as u64,
            page,
        ))
    }

    #[instrument(level = "debug", err, skip(self))]
    async fn exists_by_id(&self, id: StudyClassId) -> Result<bool, StudyClassRepositoryError> {
        query_scalar("SELECT EXISTS(SELECT 1 FROM study_class WHERE id = $1)")
            .bind(id.0)
            .fetch_one(&self.pool)
            .await
            .map_err(unavailable)
    }

    #[instrument(level = "debug", err, skip(self))]
    async fn delete_by_id(&self, id: StudyClassId) -> Result<(), StudyClassRepositoryError> {
        query("DELETE FROM study_class WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|err| match violation(&err) {
                Violation::ForeignKey => {
                    warn!(study_class_id = id.0, "Study class is still referenced");
                    StudyClassRepositoryError::StillReferenced
                }
                _ => unavailable(err),
            })?;

        Ok(())
    }
}
