use async_trait::async_trait;
use domain_shared::pagination::{Page, PageRequest};
use domain_shared::school::{StudyClassId, TeacherId};
use thiserror::Error;

#[async_trait]
pub trait StudyClassPort {
    async fn create_study_class(
        &self,
        draft: StudyClassDraftDto,
    ) -> Result<StudyClassDto, StudyClassError>;
    async fn update_study_class(
        &self,
        id: StudyClassId,
        draft: StudyClassDraftDto,
    ) -> Result<StudyClassDto, StudyClassError>;
    async fn partial_update_study_class(
        &self,
        id: StudyClassId,
        patch: StudyClassPatchDto,
    ) -> Result<StudyClassDto, StudyClassError>;
    async fn get_study_classes(
        &self,
        page: PageRequest,
    ) -> Result<Page<StudyClassDto>, StudyClassError>;
    async fn get_study_class(&self, id: StudyClassId) -> Result<StudyClassDto, StudyClassError>;
    async fn delete_study_class(&self, id: StudyClassId) -> Result<(), StudyClassError>;
}

#[derive(Debug, Clone)]
pub struct StudyClassDto {
    pub id: StudyClassId,
    pub name: String,
    pub teacher: Option<TeacherSummaryDto>,
}

#[derive(Debug, Clone)]
pub struct TeacherSummaryDto {
    pub id: TeacherId,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone)]
pub struct StudyClassDraftDto {
    pub id: Option<StudyClassId>,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct StudyClassPatchDto {
    pub id: Option<StudyClassId>,
    pub name: Option<String>,
}

#[derive(Debug, Error)]
pub enum StudyClassError {
    #[error("A new studyClass cannot already have an ID")]
    IdAlreadyAssigned,
    #[error("Invalid id")]
    MissingId,
    #[error("Invalid ID")]
    IdMismatch,
    #[error("Entity not found")]
    EntityNotFound,
    #[error("study class not found")]
    StudyClassNotFound,
    #[error("study class not found")]
    PartialUpdateTargetNotFound,
    #[error("Study Class is still referenced")]
    StillReferenced,
    #[error("Service is temporarily unavailable")]
    TemporaryUnavailable,
}
