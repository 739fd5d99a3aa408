use crate::database::{violation, Violation};
use crate::postgres::page_bounds;
use async_trait::async_trait;
use domain::teacher::{Teacher, TeacherRepository, TeacherRepositoryError, TeacherSnapshot};
use domain_shared::pagination::{Page, PageRequest};
use domain_shared::school::{StudyClassId, TeacherId};
use sqlx::{query, query_as, query_scalar, FromRow, PgPool};
use tracing::{instrument, warn};

#[derive(FromRow)]
struct TeacherRow {
    id: i64,
    first_name: String,
    last_name: String,
    study_class_id: i64,
}

impl From<TeacherRow> for Teacher {
    fn from(row: TeacherRow) -> Self {
        Teacher::from_snapshot(TeacherSnapshot {
            id: Some(TeacherId(row.id)),
            first_name: row.first_name,
            last_name: row.last_name,
            study_class_id: StudyClassId(row.study_class_id),
        })
    }
}

pub struct PostgresTeacherRepository {
    pool: PgPool,
}

impl PostgresTeacherRepository {
    #[instrument(level = "trace", skip_all)]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn unavailable(err: sqlx::Error) -> TeacherRepositoryError {
    warn!(error = ?err, "Teacher query failed");
    TeacherRepositoryError::ServiceUnavailable
}

#[async_trait]
impl TeacherRepository for PostgresTeacherRepository {
    /// The unique constraint on `teacher.study_class_id` backs the
    /// one-teacher-per-class rule even when two requests race past the
    /// application check.
    #[instrument(level = "debug", err, skip(self, teacher))]
    async fn save(&self, teacher: &Teacher) -> Result<Teacher, TeacherRepositoryError> {
        let TeacherSnapshot {
            id,
            first_name,
            last_name,
            study_class_id,
        } = teacher.to_snapshot();

        let row = match id {
            None => {
                query_as::<_, TeacherRow>(
                    "INSERT INTO teacher (first_name, last_name, study_class_id) VALUES ($1, $2, $3) RETURNING id, first_name, last_name, study_class_id",
                )
                .bind(first_name)
                .bind(last_name)
                .bind(study_class_id.0)
                .fetch_one(&self.pool)
                .await
            }
            Some(TeacherId(id)) => {
                query_as::<_, TeacherRow>(
                    "INSERT INTO teacher (id, first_name, last_name, study_class_id) VALUES ($1, $2, $3, $4) ON CONFLICT (id) DO UPDATE SET first_name = EXCLUDED.first_name, last_name = EXCLUDED.last_name, study_class_id = EXCLUDED.study_class_id RETURNING id, first_name, last_name, study_class_id",
                )
                .bind(id)
                .bind(first_name)
                .bind(last_name)
                .bind(study_class_id.0)
                .fetch_one(&self.pool)
                .await
            }
        }
        .map_err(|err| match violation(&err) {
            Violation::Unique => {
                warn!(
                    study_class_id = study_class_id.0,
                    "Study class already has a teacher",
                );
                TeacherRepositoryError::StudyClassAlreadyAssigned(study_class_id)
            }
            Violation::ForeignKey => {
                warn!(study_class_id = study_class_id.0, "Study class does not exist");
                TeacherRepositoryError::StudyClassNotFound(study_class_id)
            }
            Violation::Other => unavailable(err),
        })?;

        Ok(row.into())
    }

    #[instrument(level = "debug", err, skip(self))]
    async fn find_by_id(&self, id: TeacherId) -> Result<Option<Teacher>, TeacherRepositoryError> {
        let row = query_as::<_, TeacherRow>(
            "SELECT id, first_name, last_name, study_class_id FROM teacher WHERE id = $1",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(unavailable)?;

        Ok(row.map(Teacher::from))
    }

    #[instrument(level = "debug", err, skip(self))]
    async fn find_all(&self, page: PageRequest) -> Result<Page<Teacher>, TeacherRepositoryError> {
        let (limit, offset) = page_bounds(page);

        let total: i64 = query_scalar("SELECT COUNT(*) FROM teacher")
            .fetch_one(&self.pool)
            .await
            .map_err(unavailable)?;
        let rows = query_as::<_, TeacherRow>(
            "SELECT id, first_name, last_name, study_class_id FROM teacher ORDER BY id LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(unavailable)?;

        Ok(Page::new(
            rows.into_iter().map(Teacher::from).collect(),
            total as u64,
            page,
        ))
    }

    #[instrument(level = "debug", err, skip(self))]
    async fn exists_by_id(&self, id: TeacherId) -> Result<bool, TeacherRepositoryError> {
        query_scalar("SELECT EXISTS(SELECT 1 FROM teacher WHERE id = $1)")
            .bind(id.0)
            .fetch_one(&self.pool)
            .await
            .map_err(unavailable)
    }

    #[instrument(level = "debug", err, skip(self))]
    async fn delete_by_id(&self, id: TeacherId) -> Result<(), TeacherRepositoryError> {
        query("DELETE FROM teacher WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(unavailable)?;

        Ok(())
    }

    #[instrument(level = "debug", err, skip(self))]
    async fn find_one_by_study_class_id(
        &self,
        study_class_id: StudyClassId,
    ) -> Result<Option<Teacher>, TeacherRepositoryError> {
        let row = query_as::<_, TeacherRow>(
            "SELECT id, first_name, last_name, study_class_id FROM teacher WHERE study_class_id = $1",
        )
        .bind(study_class_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(unavailable)?;

        Ok(row.map(Teacher::from))
    }
}
