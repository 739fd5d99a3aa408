use async_trait::async_trait;
use domain_shared::pagination::{Page, PageRequest};
use domain_shared::school::{StudentId, StudyClassId};
use thiserror::Error;

#[async_trait]
pub trait StudentPort {
    async fn create_student(&self, draft: StudentDraftDto) -> Result<StudentDto, StudentError>;
    async fn update_student(
        &self,
        id: StudentId,
        draft: StudentDraftDto,
    ) -> Result<StudentDto, StudentError>;
    async fn partial_update_student(
        &self,
        id: StudentId,
        patch: StudentPatchDto,
    ) -> Result<StudentDto, StudentError>;
    async fn get_students(
        &self,
        page: PageRequest,
        filter: StudentFilterDto,
    ) -> Result<Page<StudentDto>, StudentError>;
    async fn get_student(&self, id: StudentId) -> Result<StudentDto, StudentError>;
    async fn delete_student(&self, id: StudentId) -> Result<(), StudentError>;
}

#[derive(Debug, Clone)]
pub struct StudentDto {
    pub id: StudentId,
    pub first_name: String,
    pub last_name: String,
    pub study_class_id: StudyClassId,
}

/// Full student record as sent for create and update.
#[derive(Debug, Clone)]
pub struct StudentDraftDto {
    pub id: Option<StudentId>,
    pub first_name: String,
    pub last_name: String,
    pub study_class_id: StudyClassId,
}

#[derive(Debug, Clone)]
pub struct StudentPatchDto {
    pub id: Option<StudentId>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct StudentFilterDto {
    pub study_class_name: Option<String>,
    pub teacher_full_name: Option<String>,
}

#[derive(Debug, Error)]
pub enum StudentError {
    #[error("A new student cannot already have an ID")]
    IdAlreadyAssigned,
    #[error("Invalid id")]
    MissingId,
    #[error("Invalid ID")]
    IdMismatch,
    #[error("Entity not found")]
    EntityNotFound,
    #[error("Study Class doesn't exist")]
    StudyClassNotFound,
    #[error("student not found")]
    StudentNotFound,
    #[error("student not found")]
    PartialUpdateTargetNotFound,
    #[error("Service is temporarily unavailable")]
    TemporaryUnavailable,
}
