use crate::teacher::{Teacher, TeacherPatch, TeacherRepository, TeacherRepositoryError};
use domain_shared::pagination::{Page, PageRequest};
use domain_shared::school::{StudyClassId, TeacherId};
use std::sync::Arc;
use tracing::instrument;

pub struct TeacherService {
    teacher_repository: Arc<dyn TeacherRepository + Send + Sync>,
}

impl TeacherService {
    #[instrument(level = "trace", skip_all)]
    pub fn new(teacher_repository: Arc<dyn TeacherRepository + Send + Sync>) -> Self {
        Self { teacher_repository }
    }

    #[instrument(level = "debug", skip(self, teacher))]
    pub async fn save(&self, teacher: &Teacher) -> Result<Teacher, TeacherRepositoryError> {
        self.teacher_repository.save(teacher).await
    }

    #[instrument(level = "debug", skip(self, teacher))]
    pub async fn update(&self, teacher: &Teacher) -> Result<Teacher, TeacherRepositoryError> {
        self.teacher_repository.save(teacher).await
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn partial_update(
        &self,
        patch: TeacherPatch,
    ) -> Result<Option<Teacher>, TeacherRepositoryError> {
        let Some(mut teacher) = self.teacher_repository.find_by_id(patch.id).await? else {
            return Ok(None);
        };

        teacher.merge(patch);

        self.teacher_repository.save(&teacher).await.map(Some)
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn find_all(
        &self,
        page: PageRequest,
    ) -> Result<Page<Teacher>, TeacherRepositoryError> {
        self.teacher_repository.find_all(page).await
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn find_one(&self, id: TeacherId) -> Result<Option<Teacher>, TeacherRepositoryError> {
        self.teacher_repository.find_by_id(id).await
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn find_one_by_study_class_id(
        &self,
        study_class_id: StudyClassId,
    ) -> Result<Option<Teacher>, TeacherRepositoryError> {
        self.teacher_repository
            .find_one_by_study_class_id(study_class_id)
            .await
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn exists(&self, id: TeacherId) -> Result<bool, TeacherRepositoryError> {
        self.teacher_repository.exists_by_id(id).await
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn delete(&self, id: TeacherId) -> Result<(), TeacherRepositoryError> {
        self.teacher_repository.delete_by_id(id).await
    }
}
