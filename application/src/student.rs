use application_ports::student::{
    StudentDraftDto, StudentDto, StudentError, StudentFilterDto, StudentPatchDto, StudentPort,
};
use async_trait::async_trait;
use domain::student::{
    create_student, Student, StudentPatch, StudentRepositoryError, StudentSnapshot,
};
use domain::student_service::StudentService;
use domain::study_class::StudyClassRepositoryError;
use domain::study_class_service::StudyClassService;
use domain_shared::pagination::{Page, PageRequest};
use domain_shared::school::{StudentId, StudyClassId};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

pub struct StudentHandler {
    student_service: Arc<StudentService>,
    study_class_service: Arc<StudyClassService>,
}

impl StudentHandler {
    #[instrument(level = "trace", skip_all)]
    pub fn new(
        student_service: Arc<StudentService>,
        study_class_service: Arc<StudyClassService>,
    ) -> Self {
        Self {
            student_service,
            study_class_service,
        }
    }

    #[instrument(level = "debug", skip(self))]
    async fn check_study_class_existence(
        &self,
        study_class_id: StudyClassId,
    ) -> Result<(), StudentError> {
        let exists = self
            .study_class_service
            .exists(study_class_id)
            .await
            .map_err(map_study_class_repo_err)?;

        if !exists {
            warn!(
                study_class_id = study_class_id.0,
                "Student references a study class that does not exist",
            );
            return Err(StudentError::StudyClassNotFound);
        }

        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    async fn check_existing(
        &self,
        path_id: StudentId,
        body_id: Option<StudentId>,
    ) -> Result<(), StudentError> {
        let body_id = body_id.ok_or(StudentError::MissingId)?;
        if body_id != path_id {
            warn!(path_id = path_id.0, body_id = body_id.0, "Student id mismatch");
            return Err(StudentError::IdMismatch);
        }

        let exists = self
            .student_service
            .exists(path_id)
            .await
            .map_err(map_student_repo_err)?;
        if !exists {
            return Err(StudentError::EntityNotFound);
        }

        Ok(())
    }
}

#[async_trait]
impl StudentPort for StudentHandler {
    #[instrument(level = "info", skip(self))]
    async fn create_student(&self, draft: StudentDraftDto) -> Result<StudentDto, StudentError> {
        if draft.id.is_some() {
            return Err(StudentError::IdAlreadyAssigned);
        }

        self.check_study_class_existence(draft.study_class_id).await?;

        let student = create_student(draft.first_name, draft.last_name, draft.study_class_id);
        let student = self
            .student_service
            .save(&student)
            .await
            .map_err(map_student_repo_err)?;
        let dto = to_dto(&student)?;

        info!(student_id = dto.id.0, "Student created");

        Ok(dto)
    }

    #[instrument(level = "info", skip(self))]
    async fn update_student(
        &self,
        id: StudentId,
        draft: StudentDraftDto,
    ) -> Result<StudentDto, StudentError> {
        self.check_existing(id, draft.id).await?;
        self.check_study_class_existence(draft.study_class_id).await?;

        let student = Student::from_snapshot(StudentSnapshot {
            id: Some(id),
            first_name: draft.first_name,
            last_name: draft.last_name,
            study_class_id: draft.study_class_id,
        });
        let student = self
            .student_service
            .update(&student)
            .await
            .map_err(map_student_repo_err)?;

        info!(student_id = id.0, "Student updated");

        to_dto(&student)
    }

    #[instrument(level = "info", skip(self))]
    async fn partial_update_student(
        &self,
        id: StudentId,
        patch: StudentPatchDto,
    ) -> Result<StudentDto, StudentError> {
        self.check_existing(id, patch.id).await?;

        let student = self
            .student_service
            .partial_update(StudentPatch {
                id,
                first_name: patch.first_name,
                last_name: patch.last_name,
            })
            .await
            .map_err(map_student_repo_err)?
            .ok_or(StudentError::PartialUpdateTargetNotFound)?;

        info!(student_id = id.0, "Student partially updated");

        to_dto(&student)
    }

    #[instrument(level = "info", skip(self))]
    async fn get_students(
        &self,
        page: PageRequest,
        filter: StudentFilterDto,
    ) -> Result<Page<StudentDto>, StudentError> {
        self.student_service
            .find_all(
                page,
                filter.study_class_name.as_deref(),
                filter.teacher_full_name.as_deref(),
            )
            .await
            .map_err(map_student_repo_err)?
            .try_map(|student| to_dto(&student))
    }

    #[instrument(level = "info", skip(self))]
    async fn get_student(&self, id: StudentId) -> Result<StudentDto, StudentError> {
        let student = self
            .student_service
            .find_one(id)
            .await
            .map_err(map_student_repo_err)?
            .ok_or(StudentError::StudentNotFound)?;

        to_dto(&student)
    }

    #[instrument(level = "info", skip(self))]
    async fn delete_student(&self, id: StudentId) -> Result<(), StudentError> {
        let exists = self
            .student_service
            .exists(id)
            .await
            .map_err(map_student_repo_err)?;
        if !exists {
            return Err(StudentError::EntityNotFound);
        }

        self.student_service
            .delete(id)
            .await
            .map_err(map_student_repo_err)?;

        info!(student_id = id.0, "Student deleted");

        Ok(())
    }
}

#[instrument(level = "trace", skip_all)]
fn to_dto(student: &Student) -> Result<StudentDto, StudentError> {
    let StudentSnapshot {
        id,
        first_name,
        last_name,
        study_class_id,
    } = student.to_snapshot();

    let id = id.ok_or_else(|| {
        error!("Persisted student has no id");
        StudentError::TemporaryUnavailable
    })?;

    Ok(StudentDto {
        id,
        first_name,
        last_name,
        study_class_id,
    })
}

#[instrument(level = "trace", skip_all)]
fn map_student_repo_err(err: StudentRepositoryError) -> StudentError {
    match err {
        StudentRepositoryError::StudyClassNotFound(study_class_id) => {
            warn!(
                study_class_id = study_class_id.0,
                "Study class disappeared before the student was saved",
            );
            StudentError::StudyClassNotFound
        }
        StudentRepositoryError::ServiceUnavailable => {
            error!("StudentRepositoryError::ServiceUnavailable");
            StudentError::TemporaryUnavailable
        }
    }
}

#[instrument(level = "trace", skip_all)]
fn map_study_class_repo_err(err: StudyClassRepositoryError) -> StudentError {
    match err {
        StudyClassRepositoryError::StillReferenced
        | StudyClassRepositoryError::ServiceUnavailable => {
            error!(error = ?err, "Study class repository failed while handling a student");
            StudentError::TemporaryUnavailable
        }
    }
}
