use crate::study_class::{
    StudyClass, StudyClassPatch, StudyClassRepository, StudyClassRepositoryError,
};
use domain_shared::pagination::{Page, PageRequest};
use domain_shared::school::StudyClassId;
use std::sync::Arc;
use tracing::instrument;

pub struct StudyClassService {
    study_class_repository: Arc<dyn StudyClassRepository + Send + Sync>,
}

impl StudyClassService {
    #[instrument(level = "trace", skip_all)]
    pub fn new(study_class_repository: Arc<dyn StudyClassRepository + Send + Sync>) -> Self {
        Self {
            study_class_repository,
        }
    }

    #[instrument(level = "debug", skip(self, study_class))]
    pub async fn save(
        &self,
        study_class: &StudyClass,
    ) -> Result<StudyClass, StudyClassRepositoryError> {
        self.study_class_repository.save(study_class).await
    }

    #[instrument(level = "debug", skip(self, study_class))]
    pub async fn update(
        &self,
        study_class: &StudyClass,
    ) -> Result<StudyClass, StudyClassRepositoryError> {
        self.study_class_repository.save(study_class).await
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn partial_update(
        &self,
        patch: StudyClassPatch,
    ) -> Result<Option<StudyClass>, StudyClassRepositoryError> {
        let Some(mut study_class) = self.study_class_repository.find_by_id(patch.id).await? else {
            return Ok(None);
        };

        study_class.merge(patch);

        self.study_class_repository
            .save(&study_class)
            .await
            .map(Some)
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn find_all(
        &self,
        page: PageRequest,
    ) -> Result<Page<StudyClass>, StudyClassRepositoryError> {
        self.study_class_repository.find_all(page).await
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn find_one(
        &self,
        id: StudyClassId,
    ) -> Result<Option<StudyClass>, StudyClassRepositoryError> {
        self.study_class_repository.find_by_id(id).await
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn exists(&self, id: StudyClassId) -> Result<bool, StudyClassRepositoryError> {
        self.study_class_repository.exists_by_id(id).await
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn delete(&self, id: StudyClassId) -> Result<(), StudyClassRepositoryError> {
        self.study_class_repository.delete_by_id(id).await
    }
}
