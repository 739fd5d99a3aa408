use async_trait::async_trait;
use domain_shared::pagination::{Page, PageRequest};
use domain_shared::school::{StudyClassId, TeacherId};
use thiserror::Error;

#[async_trait]
pub trait TeacherPort {
    async fn create_teacher(&self, draft: TeacherDraftDto) -> Result<TeacherDto, TeacherError>;
    async fn update_teacher(
        &self,
        id: TeacherId,
        draft: TeacherDraftDto,
    ) -> Result<TeacherDto, TeacherError>;
    async fn partial_update_teacher(
        &self,
        id: TeacherId,
        patch: TeacherPatchDto,
    ) -> Result<TeacherDto, TeacherError>;
    async fn get_teachers(&self, page: PageRequest) -> Result<Page<TeacherDto>, TeacherError>;
    async fn get_teacher(&self, id: TeacherId) -> Result<TeacherDto, TeacherError>;
    async fn delete_teacher(&self, id: TeacherId) -> Result<(), TeacherError>;
}

#[derive(Debug, Clone)]
pub struct TeacherDto {
    pub id: TeacherId,
    pub first_name: String,
    pub last_name: String,
    pub study_class_id: StudyClassId,
}

#[derive(Debug, Clone)]
pub struct TeacherDraftDto {
    pub id: Option<TeacherId>,
    pub first_name: String,
    pub last_name: String,
    pub study_class_id: StudyClassId,
}

#[derive(Debug, Clone)]
pub struct TeacherPatchDto {
    pub id: Option<TeacherId>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Error)]
pub enum TeacherError {
    #[error("A new teacher cannot already have an ID")]
    IdAlreadyAssigned,
    #[error("Invalid id")]
    MissingId,
    #[error("Invalid ID")]
    IdMismatch,
    #[error("Entity not found")]
    EntityNotFound,
    #[error("Study Class doesn't exist")]
    StudyClassNotFound,
    #[error("Study Class has already a teacher")]
    StudyClassAlreadyHasTeacher,
    #[error("teacher not found")]
    TeacherNotFound,
    #[error("teacher not found")]
    PartialUpdateTargetNotFound,
    #[error("Service is temporarily unavailable")]
    TemporaryUnavailable,
}
