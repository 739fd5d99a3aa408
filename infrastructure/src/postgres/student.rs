use crate::database::{violation, Violation};
use crate::postgres::page_bounds;
use async_trait::async_trait;
use domain::student::{Student, StudentRepository, StudentRepositoryError, StudentSnapshot};
use domain_shared::pagination::{Page, PageRequest};
use domain_shared::school::{StudentId, StudyClassId};
use sqlx::{query, query_as, query_scalar, FromRow, PgPool};
use tracing::{instrument, warn};

const STUDY_CLASS_NAME_FILTER: &str =
    "JOIN study_class c ON c.id = s.study_class_id WHERE c.name = $1";
const TEACHER_FULL_NAME_FILTER: &str = "JOIN teacher t ON t.study_class_id = s.study_class_id WHERE t.first_name || ' ' || t.last_name = $1";
const BOTH_FILTERS: &str = "JOIN study_class c ON c.id = s.study_class_id JOIN teacher t ON t.study_class_id = s.study_class_id WHERE c.name = $1 AND t.first_name || ' ' || t.last_name = $2";

#[derive(FromRow)]
struct StudentRow {
    id: i64,
    first_name: String,
    last_name: String,
    study_class_id: i64,
}

impl From<StudentRow> for Student {
    fn from(row: StudentRow) -> Self {
        Student::from_snapshot(StudentSnapshot {
            id: Some(StudentId(row.id)),
            first_name: row.first_name,
            last_name: row.last_name,
            study_class_id: StudyClassId(row.study_class_id),
        })
    }
}

pub struct PostgresStudentRepository {
    pool: PgPool,
}

impl PostgresStudentRepository {
    #[instrument(level = "trace", skip_all)]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Runs a paged read of students narrowed by `filter`, a join and
    /// `WHERE` clause whose placeholders are bound from `params` in order.
    #[instrument(level = "trace", skip(self))]
    async fn find_page(
        &self,
        filter: &str,
        params: &[&str],
        page: PageRequest,
    ) -> Result<Page<Student>, StudentRepositoryError> {
        let (limit, offset) = page_bounds(page);
        let limit_placeholder = params.len() + 1;
        let offset_placeholder = params.len() + 2;

        let count_sql = format!("SELECT COUNT(*) FROM student s {filter}");
        let mut count = query_scalar::<_, i64>(&count_sql);
        for param in params {
            count = count.bind(*param);
        }
        let total = count.fetch_one(&self.pool).await.map_err(unavailable)?;

        let select_sql = format!(
            "SELECT s.id, s.first_name, s.last_name, s.study_class_id FROM student s {filter} ORDER BY s.id LIMIT ${limit_placeholder} OFFSET ${offset_placeholder}",
        );
        let mut select = query_as::<_, StudentRow>(&select_sql);
        for param in params {
            select = select.bind(*param);
        }
        let rows = select
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(unavailable)?;

        Ok(Page::new(
            rows.into_iter().map(Student::from).collect(),
            total as u64,
            page,
        ))
    }
}

fn unavailable(err: sqlx::Error) -> StudentRepositoryError {
    warn!(error = ?err, "Student query failed");
    StudentRepositoryError::ServiceUnavailable
}

#[async_trait]
impl StudentRepository for PostgresStudentRepository {
    #[instrument(level = "debug", err, skip(self, student))]
    async fn save(&self, student: &Student) -> Result<Student, StudentRepositoryError> {
        let StudentSnapshot {
            id,
            first_name,
            last_name,
            study_class_id,
        } = student.to_snapshot();

        let row = match id {
            None => {
                query_as::<_, StudentRow>(
                    "INSERT INTO student (first_name, last_name, study_class_id) VALUES ($1, $2, $3) RETURNING id, first_name, last_name, study_class_id",
                )
                .bind(first_name)
                .bind(last_name)
                .bind(study_class_id.0)
                .fetch_one(&self.pool)
                .await
            }
            Some(StudentId(id)) => {
                query_as::<_, StudentRow>(
                    "INSERT INTO student (id, first_name, last_name, study_class_id) VALUES ($1, $2, $3, $4) ON CONFLICT (id) DO UPDATE SET first_name = EXCLUDED.first_name, last_name = EXCLUDED.last_name, study_class_id = EXCLUDED.study_class_id RETURNING id, first_name, last_name, study_class_id",
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
            Violation::ForeignKey => {
                warn!(study_class_id = study_class_id.0, "Study class does not exist");
                StudentRepositoryError::StudyClassNotFound(study_class_id)
            }
            _ => unavailable(err),
        })?;

        Ok(row.into())
    }

    #[instrument(level = "debug", err, skip(self))]
    async fn find_by_id(&self, id: StudentId) -> Result<Option<Student>, StudentRepositoryError> {
        let row = query_as::<_, StudentRow>(
            "SELECT id, first_name, last_name, study_class_id FROM student WHERE id = $1",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(unavailable)?;

        Ok(row.map(Student::from))
    }

    #[instrument(level = "debug", err, skip(self))]
    async fn find_all(&self, page: PageRequest) -> Result<Page<Student>, StudentRepositoryError> {
        self.find_page("", &[], page).await
    }

    #[instrument(level = "debug", err, skip(self))]
    async fn exists_by_id(&self, id: StudentId) -> Result<bool, StudentRepositoryError> {
        query_scalar("SELECT EXISTS(SELECT 1 FROM student WHERE id = $1)")
            .bind(id.0)
            .fetch_one(&self.pool)
            .await
            .map_err(unavailable)
    }

    #[instrument(level = "debug", err, skip(self))]
    async fn delete_by_id(&self, id: StudentId) -> Result<(), StudentRepositoryError> {
        query("DELETE FROM student WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(unavailable)?;

        Ok(())
    }

    #[instrument(level = "debug", err, skip(self))]
    async fn find_by_study_class_name(
        &self,
        study_class_name: &str,
        page: PageRequest,
    ) -> Result<Page<Student>, StudentRepositoryError> {
        self.find_page(STUDY_CLASS_NAME_FILTER, &[study_class_name], page)
            .await
    }

    #[instrument(level = "debug", err, skip(self))]
    async fn find_by_teacher_full_name(
        &self,
        teacher_full_name: &str,
        page: PageRequest,
    ) -> Result<Page<Student>, StudentRepositoryError> {
        self.find_page(TEACHER_FULL_NAME_FILTER, &[teacher_full_name], page)
            .await
    }

    #[instrument(level = "debug", err, skip(self))]
    async fn find_by_study_class_name_and_teacher_full_name(
        &self,
        study_class_name: &str,
        teacher_full_name: &str,
        page: PageRequest,
    ) -> Result<Page<Student>, StudentRepositoryError> {
        self.find_page(BOTH_FILTERS, &[study_class_name, teacher_full_name], page)
            .await
    }
}
