use application_ports::teacher::{
    TeacherDraftDto, TeacherDto, TeacherError, TeacherPatchDto, TeacherPort,
};
use async_trait::async_trait;
use domain::identity::same_identity;
use domain::study_class::StudyClassRepositoryError;
use domain::study_class_service::StudyClassService;
use domain::teacher::{
    create_teacher, Teacher, TeacherPatch, TeacherRepositoryError, TeacherSnapshot,
};
use domain::teacher_service::TeacherService;
use domain_shared::pagination::{Page, PageRequest};
use domain_shared::school::{StudyClassId, TeacherId};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

pub struct TeacherHandler {
    teacher_service: Arc<TeacherService>,
    study_class_service: Arc<StudyClassService>,
}

impl TeacherHandler {
    #[instrument(level = "trace", skip_all)]
    pub fn new(
        teacher_service: Arc<TeacherService>,
        study_class_service: Arc<StudyClassService>,
    ) -> Self {
        Self {
            teacher_service,
            study_class_service,
        }
    }

    /// The study class must exist and must not be held by a teacher other
    /// than `teacher_id`.
    #[instrument(level = "debug", skip(self))]
    async fn check_study_class_assignment(
        &self,
        study_class_id: StudyClassId,
        teacher_id: Option<TeacherId>,
    ) -> Result<(), TeacherError> {
        let exists = self
            .study_class_service
            .exists(study_class_id)
            .await
            .map_err(map_study_class_repo_err)?;
        if !exists {
            warn!(
                study_class_id = study_class_id.0,
                "Teacher references a study class that does not exist",
            );
            return Err(TeacherError::StudyClassNotFound);
        }

        let holder = self
            .teacher_service
            .find_one_by_study_class_id(study_class_id)
            .await
            .map_err(map_teacher_repo_err)?;

        if let Some(holder) = holder {
            if !same_identity(holder.id(), teacher_id) {
                warn!(
                    study_class_id = study_class_id.0,
                    holder_id = holder.id().map(|id| id.0),
                    "Study class already has a teacher",
                );
                return Err(TeacherError::StudyClassAlreadyHasTeacher);
            }
        }

        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    async fn check_existing(
        &self,
        path_id: TeacherId,
        body_id: Option<TeacherId>,
    ) -> Result<(), TeacherError> {
        let body_id = body_id.ok_or(TeacherError::MissingId)?;
        if body_id != path_id {
            warn!(path_id = path_id.0, body_id = body_id.0, "Teacher id mismatch");
            return Err(TeacherError::IdMismatch);
        }

        let exists = self
            .teacher_service
            .exists(path_id)
            .await
            .map_err(map_teacher_repo_err)?;
        if !exists {
            return Err(TeacherError::EntityNotFound);
        }

        Ok(())
    }
}

#[async_trait]
impl TeacherPort for TeacherHandler {
    #[instrument(level = "info", skip(self))]
    async fn create_teacher(&self, draft: TeacherDraftDto) -> Result<TeacherDto, TeacherError> {
        if draft.id.is_some() {
            return Err(TeacherError::IdAlreadyAssigned);
        }

        self.check_study_class_assignment(draft.study_class_id, None)
            .await?;

        let teacher = create_teacher(draft.first_name, draft.last_name, draft.study_class_id);
        let teacher = self
            .teacher_service
            .save(&teacher)
            .await
            .map_err(map_teacher_repo_err)?;
        let dto = to_dto(&teacher)?;

        info!(
            teacher_id = dto.id.0,
            study_class_id = dto.study_class_id.0,
            "Teacher created",
        );

        Ok(dto)
    }

    #[instrument(level = "info", skip(self))]
    async fn update_teacher(
        &self,
        id: TeacherId,
        draft: TeacherDraftDto,
    ) -> Result<TeacherDto, TeacherError> {
        self.check_existing(id, draft.id).await?;
        self.check_study_class_assignment(draft.study_class_id, Some(id))
            .await?;

        let teacher = Teacher::from_snapshot(TeacherSnapshot {
            id: Some(id),
            first_name: draft.first_name,
            last_name: draft.last_name,
            study_class_id: draft.study_class_id,
        });
        let teacher = self
            .teacher_service
            .update(&teacher)
            .await
            .map_err(map_teacher_repo_err)?;

        info!(teacher_id = id.0, "Teacher updated");

        to_dto(&teacher)
    }

    #[instrument(level = "info", skip(self))]
    async fn partial_update_teacher(
        &self,
        id: TeacherId,
        patch: TeacherPatchDto,
    ) -> Result<TeacherDto, TeacherError> {
        self.check_existing(id, patch.id).await?;

        let teacher = self
            .teacher_service
            .partial_update(TeacherPatch {
                id,
                first_name: patch.first_name,
                last_name: patch.last_name,
            })
            .await
            .map_err(map_teacher_repo_err)?
            .ok_or(TeacherError::PartialUpdateTargetNotFound)?;

        info!(teacher_id = id.0, "Teacher partially updated");

        to_dto(&teacher)
    }

    #[instrument(level = "info", skip(self))]
    async fn get_teachers(&self, page: PageRequest) -> Result<Page<TeacherDto>, TeacherError> {
        self.teacher_service
            .find_all(page)
            .await
            .map_err(map_teacher_repo_err)?
            .try_map(|teacher| to_dto(&teacher))
    }

    #[instrument(level = "info", skip(self))]
    async fn get_teacher(&self, id: TeacherId) -> Result<TeacherDto, TeacherError> {
        let teacher = self
            .teacher_service
            .find_one(id)
            .await
            .map_err(map_teacher_repo_err)?
            .ok_or(TeacherError::TeacherNotFound)?;

        to_dto(&teacher)
    }

    #[instrument(level = "info", skip(self))]
    async fn delete_teacher(&self, id: TeacherId) -> Result<(), TeacherError> {
        let exists = self
            .teacher_service
            .exists(id)
            .await
            .map_err(map_teacher_repo_err)?;
        if !exists {
            return Err(TeacherError::EntityNotFound);
        }

        self.teacher_service
            .delete(id)
            .await
            .map_err(map_teacher_repo_err)?;

        info!(teacher_id = id.0, "Teacher deleted, study class released");

        Ok(())
    }
}

#[instrument(level = "trace", skip_all)]
fn to_dto(teacher: &Teacher) -> Result<TeacherDto, TeacherError> {
    let TeacherSnapshot {
        id,
        first_name,
        last_name,
        study_class_id,
    } = teacher.to_snapshot();

    let id = id.ok_or_else(|| {
        error!("Persisted teacher has no id");
        TeacherError::TemporaryUnavailable
    })?;

    Ok(TeacherDto {
        id,
        first_name,
        last_name,
        study_class_id,
    })
}

#[instrument(level = "trace", skip_all)]
fn map_teacher_repo_err(err: TeacherRepositoryError) -> TeacherError {
    match err {
        TeacherRepositoryError::StudyClassNotFound(study_class_id) => {
            warn!(
                study_class_id = study_class_id.0,
                "Study class disappeared before the teacher was saved",
            );
            TeacherError::StudyClassNotFound
        }
        TeacherRepositoryError::StudyClassAlreadyAssigned(study_class_id) => {
            warn!(
                study_class_id = study_class_id.0,
                "Storage rejected a second teacher for the study class",
            );
            TeacherError::StudyClassAlreadyHasTeacher
        }
        TeacherRepositoryError::ServiceUnavailable => {
            error!("TeacherRepositoryError::ServiceUnavailable");
            TeacherError::TemporaryUnavailable
        }
    }
}

#[instrument(level = "trace", skip_all)]
fn map_study_class_repo_err(err: StudyClassRepositoryError) -> TeacherError {
    error!(error = ?err, "Study class repository failed while handling a teacher");
    TeacherError::TemporaryUnavailable
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::study_class::MockStudyClassRepository;
    use domain::teacher::MockTeacherRepository;
    use mockall::predicate::eq;

    fn handler(
        teacher_repository: MockTeacherRepository,
        study_class_repository: MockStudyClassRepository,
    ) -> TeacherHandler {
        TeacherHandler::new(
            Arc::new(TeacherService::new(Arc::new(teacher_repository))),
            Arc::new(StudyClassService::new(Arc::new(study_class_repository))),
        )
    }

    fn existing_study_classes() -> MockStudyClassRepository {
        let mut study_classes = MockStudyClassRepository::new();
        study_classes.expect_exists_by_id().returning(|_| Ok(true));
        study_classes
    }

    fn teacher(id: i64, study_class_id: i64) -> Teacher {
        Teacher::from_snapshot(TeacherSnapshot {
            id: Some(TeacherId(id)),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            study_class_id: StudyClassId(study_class_id),
        })
    }

    fn draft(id: Option<i64>, study_class_id: i64) -> TeacherDraftDto {
        TeacherDraftDto {
            id: id.map(TeacherId),
            first_name: "John".to_string(),
            last_name: "Smith".to_string(),
            study_class_id: StudyClassId(study_class_id),
        }
    }

    #[tokio::test]
    async fn create_rejects_study_class_held_by_another_teacher() {
        let mut teachers = MockTeacherRepository::new();
        teachers
            .expect_find_one_by_study_class_id()
            .with(eq(StudyClassId(5)))
            .returning(|_| Ok(Some(teacher(3, 5))));
        teachers.expect_save().never();

        let result = handler(teachers, existing_study_classes())
            .create_teacher(draft(None, 5))
            .await;

        assert!(matches!(
            result,
            Err(TeacherError::StudyClassAlreadyHasTeacher)
        ));
    }

    #[tokio::test]
    async fn create_succeeds_once_study_class_is_free() {
        let mut teachers = MockTeacherRepository::new();
        teachers
            .expect_find_one_by_study_class_id()
            .returning(|_| Ok(None));
        teachers.expect_save().times(1).returning(|t| {
            let mut snapshot = t.to_snapshot();
            snapshot.id = Some(TeacherId(4));
            Ok(Teacher::from_snapshot(snapshot))
        });

        let dto = handler(teachers, existing_study_classes())
            .create_teacher(draft(None, 5))
            .await
            .unwrap();

        assert_eq!(dto.id, TeacherId(4));
        assert_eq!(dto.study_class_id, StudyClassId(5));
    }

    #[tokio::test]
    async fn create_rejects_missing_study_class() {
        let mut study_classes = MockStudyClassRepository::new();
        study_classes.expect_exists_by_id().returning(|_| Ok(false));
        let mut teachers = MockTeacherRepository::new();
        teachers.expect_find_one_by_study_class_id().never();

        let result = handler(teachers, study_classes)
            .create_teacher(draft(None, 5))
            .await;

        assert!(matches!(result, Err(TeacherError::StudyClassNotFound)));
    }

    #[tokio::test]
    async fn update_keeping_own_study_class_is_allowed() {
        let mut teachers = MockTeacherRepository::new();
        teachers.expect_exists_by_id().returning(|_| Ok(true));
        teachers
            .expect_find_one_by_study_class_id()
            .returning(|_| Ok(Some(teacher(3, 5))));
        teachers
            .expect_save()
            .times(1)
            .returning(|t| Ok(t.clone()));

        let dto = handler(teachers, existing_study_classes())
            .update_teacher(TeacherId(3), draft(Some(3), 5))
            .await
            .unwrap();

        assert_eq!(dto.first_name, "John");
    }

    #[tokio::test]
    async fn update_to_study_class_of_another_teacher_is_rejected() {
        let mut teachers = MockTeacherRepository::new();
        teachers.expect_exists_by_id().returning(|_| Ok(true));
        teachers
            .expect_find_one_by_study_class_id()
            .returning(|_| Ok(Some(teacher(7, 6))));
        teachers.expect_save().never();

        let result = handler(teachers, existing_study_classes())
            .update_teacher(TeacherId(3), draft(Some(3), 6))
            .await;

        assert!(matches!(
            result,
            Err(TeacherError::StudyClassAlreadyHasTeacher)
        ));
    }

    #[tokio::test]
    async fn storage_unique_violation_maps_to_same_rejection() {
        let mut teachers = MockTeacherRepository::new();
        teachers
            .expect_find_one_by_study_class_id()
            .returning(|_| Ok(None));
        teachers.expect_save().returning(|teacher| {
            Err(TeacherRepositoryError::StudyClassAlreadyAssigned(
                teacher.study_class_id(),
            ))
        });

        let result = handler(teachers, existing_study_classes())
            .create_teacher(draft(None, 5))
            .await;

        assert!(matches!(
            result,
            Err(TeacherError::StudyClassAlreadyHasTeacher)
        ));
    }

    #[tokio::test]
    async fn partial_update_with_mismatching_id_is_rejected() {
        let result = handler(MockTeacherRepository::new(), MockStudyClassRepository::new())
            .partial_update_teacher(
                TeacherId(3),
                TeacherPatchDto {
                    id: Some(TeacherId(4)),
                    first_name: None,
                    last_name: Some("Roe".to_string()),
                },
            )
            .await;

        assert!(matches!(result, Err(TeacherError::IdMismatch)));
    }

    #[tokio::test]
    async fn delete_of_unknown_teacher_is_rejected() {
        let mut teachers = MockTeacherRepository::new();
        teachers.expect_exists_by_id().returning(|_| Ok(false));
        teachers.expect_delete_by_id().never();

        let result = handler(teachers, MockStudyClassRepository::new())
            .delete_teacher(TeacherId(3))
            .await;

        assert!(matches!(result, Err(TeacherError::EntityNotFound)));
    }
}
