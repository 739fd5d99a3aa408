use application_ports::study_class::{
    StudyClassDraftDto, StudyClassDto, StudyClassError, StudyClassPatchDto, StudyClassPort,
    TeacherSummaryDto,
};
use async_trait::async_trait;
use domain::study_class::{
    create_study_class, StudyClass, StudyClassPatch, StudyClassRepositoryError, StudyClassSnapshot,
};
use domain::study_class_service::StudyClassService;
use domain::teacher::TeacherRepositoryError;
use domain::teacher_service::TeacherService;
use domain_shared::pagination::{Page, PageRequest};
use domain_shared::school::StudyClassId;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

pub struct StudyClassHandler {
    study_class_service: Arc<StudyClassService>,
    teacher_service: Arc<TeacherService>,
}

impl StudyClassHandler {
    #[instrument(level = "trace", skip_all)]
    pub fn new(
        study_class_service: Arc<StudyClassService>,
        teacher_service: Arc<TeacherService>,
    ) -> Self {
        Self {
            study_class_service,
            teacher_service,
        }
    }

    #[instrument(level = "debug", skip(self))]
    async fn check_existing(
        &self,
        path_id: StudyClassId,
        body_id: Option<StudyClassId>,
    ) -> Result<(), StudyClassError> {
        let body_id = body_id.ok_or(StudyClassError::MissingId)?;
        if body_id != path_id {
            warn!(path_id = path_id.0, body_id = body_id.0, "Study class id mismatch");
            return Err(StudyClassError::IdMismatch);
        }

        let exists = self
            .study_class_service
            .exists(path_id)
            .await
            .map_err(map_study_class_repo_err)?;
        if !exists {
            return Err(StudyClassError::EntityNotFound);
        }

        Ok(())
    }

    /// Attaches the teacher holding the class, looked up from the teacher side.
    #[instrument(level = "debug", skip(self, study_class))]
    async fn to_dto(&self, study_class: &StudyClass) -> Result<StudyClassDto, StudyClassError> {
        let StudyClassSnapshot { id, name } = study_class.to_snapshot();
        let id = id.ok_or_else(|| {
            error!("Persisted study class has no id");
            StudyClassError::TemporaryUnavailable
        })?;

        let teacher = self
            .teacher_service
            .find_one_by_study_class_id(id)
            .await
            .map_err(map_teacher_repo_err)?
            .and_then(|teacher| {
                Some(TeacherSummaryDto {
                    id: teacher.id()?,
                    first_name: teacher.first_name().to_string(),
                    last_name: teacher.last_name().to_string(),
                })
            });

        Ok(StudyClassDto { id, name, teacher })
    }
}

#[async_trait]
impl StudyClassPort for StudyClassHandler {
    #[instrument(level = "info", skip(self))]
    async fn create_study_class(
        &self,
        draft: StudyClassDraftDto,
    ) -> Result<StudyClassDto, StudyClassError> {
        if draft.id.is_some() {
            return Err(StudyClassError::IdAlreadyAssigned);
        }

        let study_class = self
            .study_class_service
            .save(&create_study_class(draft.name))
            .await
            .map_err(map_study_class_repo_err)?;

        info!(
            study_class_id = study_class.id().map(|id| id.0),
            "Study class created",
        );

        self.to_dto(&study_class).await
    }

    #[instrument(level = "info", skip(self))]
    async fn update_study_class(
        &self,
        id: StudyClassId,
        draft: StudyClassDraftDto,
    ) -> Result<StudyClassDto, StudyClassError> {
        self.check_existing(id, draft.id).await?;

        let study_class = StudyClass::from_snapshot(StudyClassSnapshot {
            id: Some(id),
            name: draft.name,
        });
        let study_class = self
            .study_class_service
            .update(&study_class)
            .await
            .map_err(map_study_class_repo_err)?;

        info!(study_class_id = id.0, "Study class updated");

        self.to_dto(&study_class).await
    }

    #[instrument(level = "info", skip(self))]
    async fn partial_update_study_class(
        &self,
        id: StudyClassId,
        patch: StudyClassPatchDto,
    ) -> Result<StudyClassDto, StudyClassError> {
        self.check_existing(id, patch.id).await?;

        let study_class = self
            .study_class_service
            .partial_update(StudyClassPatch {
                id,
                name: patch.name,
            })
            .await
            .map_err(map_study_class_repo_err)?
            .ok_or(StudyClassError::PartialUpdateTargetNotFound)?;

        info!(study_class_id = id.0, "Study class partially updated");

        self.to_dto(&study_class).await
    }

    #[instrument(level = "info", skip(self))]
    async fn get_study_classes(
        &self,
        page: PageRequest,
    ) -> Result<Page<StudyClassDto>, StudyClassError> {
        let Page {
            content,
            total_elements,
            page,
            size,
        } = self
            .study_class_service
            .find_all(page)
            .await
            .map_err(map_study_class_repo_err)?;

        let mut dtos = Vec::with_capacity(content.len());
        for study_class in &content {
            dtos.push(self.to_dto(study_class).await?);
        }

        Ok(Page {
            content: dtos,
            total_elements,
            page,
            size,
        })
    }

    #[instrument(level = "info", skip(self))]
    async fn get_study_class(&self, id: StudyClassId) -> Result<StudyClassDto, StudyClassError> {
        let study_class = self
            .study_class_service
            .find_one(id)
            .await
            .map_err(map_study_class_repo_err)?
            .ok_or(StudyClassError::StudyClassNotFound)?;

        self.to_dto(&study_class).await
    }

    #[instrument(level = "info", skip(self))]
    async fn delete_study_class(&self, id: StudyClassId) -> Result<(), StudyClassError> {
        let exists = self
            .study_class_service
            .exists(id)
            .await
            .map_err(map_study_class_repo_err)?;
        if !exists {
            return Err(StudyClassError::EntityNotFound);
        }

        self.study_class_service
            .delete(id)
            .await
            .map_err(map_study_class_repo_err)?;

        info!(study_class_id = id.0, "Study class deleted");

        Ok(())
    }
}

#[instrument(level = "trace", skip_all)]
fn map_study_class_repo_err(err: StudyClassRepositoryError) -> StudyClassError {
    match err {
        StudyClassRepositoryError::StillReferenced => {
            warn!("Study class is still referenced by a teacher or a student");
            StudyClassError::StillReferenced
        }
        StudyClassRepositoryError::ServiceUnavailable => {
            error!("StudyClassRepositoryError::ServiceUnavailable");
            StudyClassError::TemporaryUnavailable
        }
    }
}

#[instrument(level = "trace", skip_all)]
fn map_teacher_repo_err(err: TeacherRepositoryError) -> StudyClassError {
    error!(error = ?err, "Teacher repository failed while handling a study class");
    StudyClassError::TemporaryUnavailable
}
