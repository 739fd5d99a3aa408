use crate::api::auth::Authenticated;
use crate::api::error::ApiError;
use crate::api::pagination::{page_headers, PageQuery};
use crate::api::validation::{required, ValidatedJson};
use crate::api::IdRef;
use crate::application_ports::Locator;
use application_ports::teacher::{TeacherDraftDto, TeacherDto, TeacherPatchDto};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::Json;
use domain_shared::school::{StudyClassId, TeacherId};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use validator::Validate;

const RESOURCE_PATH: &str = "/api/teachers";

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TeacherBody {
    id: Option<TeacherId>,
    #[validate(required, length(max = 255))]
    first_name: Option<String>,
    #[validate(required, length(max = 255))]
    last_name: Option<String>,
    #[validate(required)]
    study_class: Option<IdRef<StudyClassId>>,
}

impl TeacherBody {
    fn into_draft(self) -> Result<TeacherDraftDto, ApiError> {
        Ok(TeacherDraftDto {
            id: self.id,
            first_name: required(self.first_name, "firstName")?,
            last_name: required(self.last_name, "lastName")?,
            study_class_id: required(self.study_class, "studyClass")?.id,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TeacherPatchBody {
    id: Option<TeacherId>,
    #[validate(length(max = 255))]
    first_name: Option<String>,
    #[validate(length(max = 255))]
    last_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherResponse {
    id: TeacherId,
    first_name: String,
    last_name: String,
    study_class: IdRef<StudyClassId>,
}

impl From<TeacherDto> for TeacherResponse {
    fn from(dto: TeacherDto) -> Self {
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
pub async fn create_teacher<L: Locator>(
    State(locator): State<L>,
    Authenticated(login): Authenticated,
    ValidatedJson(body): ValidatedJson<TeacherBody>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<TeacherResponse>), ApiError> {
    let teacher = locator
        .get_teacher_port()
        .create_teacher(body.into_draft()?)
        .await?;
    let location = format!("{}/{}", RESOURCE_PATH, teacher.id.0);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(teacher.into()),
    ))
}

#[instrument(level = "info", skip(locator))]
pub async fn update_teacher<L: Locator>(
    State(locator): State<L>,
    Authenticated(login): Authenticated,
    Path(id): Path<i64>,
    ValidatedJson(body): ValidatedJson<TeacherBody>,
) -> Result<Json<TeacherResponse>, ApiError> {
    let teacher = locator
        .get_teacher_port()
        .update_teacher(TeacherId(id), body.into_draft()?)
        .await?;

    Ok(Json(teacher.into()))
}

#[instrument(level = "info", skip(locator))]
pub async fn partial_update_teacher<L: Locator>(
    State(locator): State<L>,
    Authenticated(login): Authenticated,
    Path(id): Path<i64>,
    ValidatedJson(body): ValidatedJson<TeacherPatchBody>,
) -> Result<Json<TeacherResponse>, ApiError> {
    let teacher = locator
        .get_teacher_port()
        .partial_update_teacher(
            TeacherId(id),
            TeacherPatchDto {
                id: body.id,
                first_name: body.first_name,
                last_name: body.last_name,
            },
        )
        .await?;

    Ok(Json(teacher.into()))
}

#[instrument(level = "info", skip(locator))]
pub async fn get_teachers<L: Locator>(
    State(locator): State<L>,
    Authenticated(login): Authenticated,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<(HeaderMap, Json<Vec<TeacherResponse>>), ApiError> {
    let Query(page) = query?;

    let teachers = locator
        .get_teacher_port()
        .get_teachers(page.to_request())
        .await?;
    let headers = page_headers(RESOURCE_PATH, &[], &teachers);

    Ok((
        headers,
        Json(teachers.content.into_iter().map(Into::into).collect()),
    ))
}

#[instrument(level = "info", skip(locator))]
pub async fn get_teacher<L: Locator>(
    State(locator): State<L>,
    Authenticated(login): Authenticated,
    Path(id): Path<i64>,
) -> Result<Json<TeacherResponse>, ApiError> {
    let teacher = locator.get_teacher_port().get_teacher(TeacherId(id)).await?;

    Ok(Json(teacher.into()))
}

#[instrument(level = "info", skip(locator))]
pub async fn delete_teacher<L: Locator>(
    State(locator): State<L>,
    Authenticated(login): Authenticated,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    locator
        .get_teacher_port()
        .delete_teacher(TeacherId(id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
