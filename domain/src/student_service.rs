use crate::student::{Student, StudentPatch, StudentRepository, StudentRepositoryError};
use domain_shared::pagination::{Page, PageRequest};
use domain_shared::school::StudentId;
use std::sync::Arc;
use tracing::{debug, instrument};

pub struct StudentService {
    student_repository: Arc<dyn StudentRepository + Send + Sync>,
}

impl StudentService {
    #[instrument(level = "trace", skip_all)]
    pub fn new(student_repository: Arc<dyn StudentRepository + Send + Sync>) -> Self {
        Self { student_repository }
    }

    #[instrument(level = "debug", skip(self, student))]
    pub async fn save(&self, student: &Student) -> Result<Student, StudentRepositoryError> {
        self.student_repository.save(student).await
    }

    #[instrument(level = "debug", skip(self, student))]
    pub async fn update(&self, student: &Student) -> Result<Student, StudentRepositoryError> {
        self.student_repository.save(student).await
    }

    /// Returns `None` when no student has the patch's id.
    #[instrument(level = "debug", skip(self))]
    pub async fn partial_update(
        &self,
        patch: StudentPatch,
    ) -> Result<Option<Student>, StudentRepositoryError> {
        let Some(mut student) = self.student_repository.find_by_id(patch.id).await? else {
            return Ok(None);
        };

        student.merge(patch);

        self.student_repository.save(&student).await.map(Some)
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn find_all(
        &self,
        page: PageRequest,
        study_class_name: Option<&str>,
        teacher_full_name: Option<&str>,
    ) -> Result<Page<Student>, StudentRepositoryError> {
        match (study_class_name, teacher_full_name) {
            (Some(study_class_name), Some(teacher_full_name)) => {
                debug!("Listing students by study class name and teacher full name");
                self.student_repository
                    .find_by_study_class_name_and_teacher_full_name(
                        study_class_name,
                        teacher_full_name,
                        page,
                    )
                    .await
            }
            (Some(study_class_name), None) => {
                self.student_repository
                    .find_by_study_class_name(study_class_name, page)
                    .await
            }
            (None, Some(teacher_full_name)) => {
                self.student_repository
                    .find_by_teacher_full_name(teacher_full_name, page)
                    .await
            }
            (None, None) => self.student_repository.find_all(page).await,
        }
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn find_one(&self, id: StudentId) -> Result<Option<Student>, StudentRepositoryError> {
        self.student_repository.find_by_id(id).await
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn exists(&self, id: StudentId) -> Result<bool, StudentRepositoryError> {
        self.student_repository.exists_by_id(id).await
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn delete(&self, id: StudentId) -> Result<(), StudentRepositoryError> {
        self.student_repository.delete_by_id(id).await
    }
}
