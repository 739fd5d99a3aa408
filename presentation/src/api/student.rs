use crate::api::auth::Authenticated;
use crate::api::error::ApiError;
use crate::api::pagination::{page_headers, PageQuery};
use crate::api::validation::{required, ValidatedJson};
use crate::api::IdRef;
use crate::application_ports::Locator;
use application_ports::student::{StudentDraftDto, StudentDto, StudentFilterDto, StudentPatchDto};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::Json;
use domain_shared::school::{StudentId, StudyClassId};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use validator::Validate;

const RESOURCE_PATH: &str = "/api/students";

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StudentBody {
    id: Option<StudentId>,
    #[validate(required, length(max = 255))]
    first_name: Option<String>,
    #[validate(required, length(max = 255))]
    last_name: Option<String>,
    #[validate(required)]
    study_class: Option<IdRef<StudyClassId>>,
}

impl StudentBody {
    fn into_draft(self) -> Result<StudentDraftDto, ApiError> {
        Ok(StudentDraftDto {
            id: self.id,
            first_name: required(self.first_name, "firstName")?,
            last_name: required(self.last_name, "lastName")?,
            study_class_id: required(self.study_class, "studyClass")?.id,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StudentPatchBody {
    id: Option<StudentId>,
    #[validate(length(max = 255))]
    first_name: Option<String>,
    #[validate(length(max = 255))]
    last_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentQuery {
    page: Option<u32>,
    size: Option<u32>,
    study_class_name: Option<String>,
    teacher_full_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentResponse {
    id: StudentId,
    first_name: String,
    last_name: String,
    study_class: IdRef<StudyClassId>,
}

impl From<StudentDto> for StudentResponse {
    fn from(dto: StudentDto) -> Self {
        Self {
            id: dto.id,
            first_name: dto.first_name,
            last_name: dto.last_name,
            study_class: IdRef {
                id: dto.study_class_id,
            },
        }
    }
}

#[instrument(level = "info", skip(locator))]
pub async fn create_student<L: Locator>(
    State(locator): State<L>,
    Authenticated(login): Authenticated,
    ValidatedJson(body): ValidatedJson<StudentBody>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<StudentResponse>), ApiError> {
    let student = locator
        .get_student_port()
        .create_student(body.into_draft()?)
        .await?;
    let location = format!("{}/{}", RESOURCE_PATH, student.id.0);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(student.into()),
    ))
}

#[instrument(level = "info", skip(locator))]
pub async fn update_student<L: Locator>(
    State(locator): State<L>,
    Authenticated(login): Authenticated,
    Path(id): Path<i64>,
    ValidatedJson(body): ValidatedJson<StudentBody>,
) -> Result<Json<StudentResponse>, ApiError> {
    let student = locator
        .get_student_port()
        .update_student(StudentId(id), body.into_draft()?)
        .await?;

    Ok(Json(student.into()))
}

#[instrument(level = "info", skip(locator))]
pub async fn partial_update_student<L: Locator>(
    State(locator): State<L>,
    Authenticated(login): Authenticated,
    Path(id): Path<i64>,
    ValidatedJson(body): ValidatedJson<StudentPatchBody>,
) -> Result<Json<StudentResponse>, ApiError> {
    let student = locator
        .get_student_port()
        .partial_update_student(
            StudentId(id),
            StudentPatchDto {
                id: body.id,
                first_name: body.first_name,
                last_name: body.last_name,
            },
        )
        .await?;

    Ok(Json(student.into()))
}

#[instrument(level = "info", skip(locator))]
pub async fn get_students<L: Locator>(
    State(locator): State<L>,
    Authenticated(login): Authenticated,
    query: Result<Query<StudentQuery>, QueryRejection>,
) -> Result<(HeaderMap, Json<Vec<StudentResponse>>), ApiError> {
    let Query(StudentQuery {
        page,
        size,
        study_class_name,
        teacher_full_name,
    }) = query?;
    let request = PageQuery { page, size }.to_request();

    let students = locator
        .get_student_port()
        .get_students(
            request,
            StudentFilterDto {
                study_class_name: study_class_name.clone(),
                teacher_full_name: teacher_full_name.clone(),
            },
        )
        .await?;

    let mut filters = Vec::new();
    if let Some(name) = study_class_name.as_deref() {
        filters.push(("studyClassName", name));
    }
    if let Some(name) = teacher_full_name.as_deref() {
        filters.push(("teacherFullName", name));
    }
    let headers = page_headers(RESOURCE_PATH, &filters, &students);

    Ok((
        headers,
        Json(students.content.into_iter().map(Into::into).collect()),
    ))
}

#[instrument(level = "info", skip(locator))]
pub async fn get_student<L: Locator>(
    State(locator): State<L>,
    Authenticated(login): Authenticated,
    Path(id): Path<i64>,
) -> Result<Json<StudentResponse>, ApiError> {
    let student = locator.get_student_port().get_student(StudentId(id)).await?;

    Ok(Json(student.into()))
}

#[instrument(level = "info", skip(locator))]
pub async fn delete_student<L: Locator>(
    State(locator): State<L>,
    Authenticated(login): Authenticated,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    locator
        .get_student_port()
        .delete_student(StudentId(id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
