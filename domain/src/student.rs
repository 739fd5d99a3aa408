use crate::identity::Entity;
use async_trait::async_trait;
use domain_shared::pagination::{Page, PageRequest};
use domain_shared::school::{StudentId, StudyClassId};
use thiserror::Error;
use tracing::instrument;

#[derive(Debug, Clone)]
pub struct Student {
    id: Option<StudentId>,
    first_name: String,
    last_name: String,
    study_class_id: StudyClassId,
}

#[instrument(level = "trace")]
pub fn create_student(
    first_name: String,
    last_name: String,
    study_class_id: StudyClassId,
) -> Student {
    Student {
        id: None,
        first_name,
        last_name,
        study_class_id,
    }
}

impl Student {
    pub fn id(&self) -> Option<StudentId> {
        self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn study_class_id(&self) -> StudyClassId {
        self.study_class_id
    }

    #[instrument(level = "trace", skip(self))]
    pub fn merge(&mut self, patch: StudentPatch) {
        if let Some(first_name) = patch.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            self.last_name = last_name;
        }
    }

    #[instrument(level = "trace", skip(snapshot))]
    pub fn from_snapshot(snapshot: StudentSnapshot) -> Self {
        Self {
            id: snapshot.id,
            first_name: snapshot.first_name,
            last_name: snapshot.last_name,
            study_class_id: snapshot.study_class_id,
        }
    }

    #[instrument(level = "trace", skip(self))]
    pub fn to_snapshot(&self) -> StudentSnapshot {
        StudentSnapshot {
            id: self.id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            study_class_id: self.study_class_id,
        }
    }
}

impl Entity for Student {
    type Id = StudentId;

    fn id(&self) -> Option<StudentId> {
        self.id
    }
}

#[derive(Debug, Clone)]
pub struct StudentSnapshot {
    pub id: Option<StudentId>,
    pub first_name: String,
    pub last_name: String,
    pub study_class_id: StudyClassId,
}

#[derive(Debug, Clone)]
pub struct StudentPatch {
    pub id: StudentId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait StudentRepository {
    async fn save(&self, student: &Student) -> Result<Student, StudentRepositoryError>;
    async fn find_by_id(&self, id: StudentId) -> Result<Option<Student>, StudentRepositoryError>;
    async fn find_all(&self, page: PageRequest) -> Result<Page<Student>, StudentRepositoryError>;
    async fn exists_by_id(&self, id: StudentId) -> Result<bool, StudentRepositoryError>;
    async fn delete_by_id(&self, id: StudentId) -> Result<(), StudentRepositoryError>;
    async fn find_by_study_class_name(
        &self,
        study_class_name: &str,
        page: PageRequest,
    ) -> Result<Page<Student>, StudentRepositoryError>;
    /// `teacher_full_name` is matched against `"{first_name} {last_name}"` of
    /// the teacher of the student's study class.
    async fn find_by_teacher_full_name(
        &self,
        teacher_full_name: &str,
        page: PageRequest,
    ) -> Result<Page<Student>, StudentRepositoryError>;
    async fn find_by_study_class_name_and_teacher_full_name(
        &self,
        study_class_name: &str,
        teacher_full_name: &str,
        page: PageRequest,
    ) -> Result<Page<Student>, StudentRepositoryError>;
}

#[derive(Debug, Error)]
pub enum StudentRepositoryError {
    #[error("Study class {0:?} does not exist")]
    StudyClassNotFound(StudyClassId),
    #[error("Service is temporarily unavailable")]
    ServiceUnavailable,
}
