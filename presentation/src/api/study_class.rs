use crate::api::auth::Authenticated;
use crate::api::error::ApiError;
use crate::api::pagination::{page_headers, PageQuery};
use crate::api::validation::{required, ValidatedJson};
use crate::application_ports::Locator;
use application_ports::study_class::{
    StudyClassDraftDto, StudyClassDto, StudyClassPatchDto, TeacherSummaryDto,
};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::Json;
use domain_shared::school::{StudyClassId, TeacherId};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use validator::Validate;

const RESOURCE_PATH: &str = "/api/study-classes";

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StudyClassBody {
    id: Option<StudyClassId>,
    #[validate(required, length(max = 255))]
    name: Option<String>,
}

impl StudyClassBody {
    fn into_draft(self) -> Result<StudyClassDraftDto, ApiError> {
        Ok(StudyClassDraftDto {
            id: self.id,
            name: required(self.name, "name")?,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StudyClassPatchBody {
    id: Option<StudyClassId>,
    #[validate(length(max = 255))]
    name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherSummaryResponse {
    id: TeacherId,
    first_name: String,
    last_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyClassResponse {
    id: StudyClassId,
    name: String,
    teacher: Option<TeacherSummaryResponse>,
}

impl From<StudyClassDto> for StudyClassResponse {
    fn from(dto: StudyClassDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            teacher: dto.teacher.map(
                |TeacherSummaryDto {
                     id,
                     first_name,
                     last_name,
                 }| TeacherSummaryResponse {
                    id,
                    first_name,
                    last_name,
                },
            ),
        }
    }
}

#[instrument(level = "info", skip(locator))]
pub async fn create_study_class<L: Locator>(
    State(locator): State<L>,
    Authenticated(login): Authenticated,
    ValidatedJson(body): ValidatedJson<StudyClassBody>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<StudyClassResponse>), ApiError>
{
    let study_class = locator
        .get_study_class_port()
        .create_study_class(body.into_draft()?)
        .await?;
    let location = format!("{}/{}", RESOURCE_PATH, study_class.id.0);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(study_class.into()),
    ))
}

#[instrument(level = "info", skip(locator))]
pub async fn update_study_class<L: Locator>(
    State(locator): State<L>,
    Authenticated(login): Authenticated,
    Path(id): Path<i64>,
    ValidatedJson(body): ValidatedJson<StudyClassBody>,
) -> Result<Json<StudyClassResponse>, ApiError> {
    let study_class = locator
        .get_study_class_port()
        .update_study_class(StudyClassId(id), body.into_draft()?)
        .await?;

    Ok(Json(study_class.into()))
}

#[instrument(level = "info", skip(locator))]
pub async fn partial_update_study_class<L: Locator>(
    State(locator): State<L>,
    Authenticated(login): Authenticated,
    Path(id): Path<i64>,
    ValidatedJson(body): ValidatedJson<StudyClassPatchBody>,
) -> Result<Json<StudyClassResponse>, ApiError> {
    let study_class = locator
        .get_study_class_port()
        .partial_update_study_class(
            StudyClassId(id),
            StudyClassPatchDto {
                id: body.id,
                name: body.name,
            },
        )
        .await?;

    Ok(Json(study_class.into()))
}

#[instrument(level = "info", skip(locator))]
pub async fn get_study_classes<L: Locator>(
    State(locator): State<L>,
    Authenticated(login): Authenticated,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<(HeaderMap, Json<Vec<StudyClassResponse>>), ApiError> {
    let Query(page) = query?;

    let study_classes = locator
        .get_study_class_port()
        .get_study_classes(page.to_request())
        .await?;
    let headers = page_headers(RESOURCE_PATH, &[], &study_classes);

    Ok((
        headers,
        Json(study_classes.content.into_iter().map(Into::into).collect()),
    ))
}

#[instrument(level = "info", skip(locator))]
pub async fn get_study_class<L: Locator>(
    State(locator): State<L>,
    Authenticated(login): Authenticated,
    Path(id): Path<i64>,
) -> Result<Json<StudyClassResponse>, ApiError> {
    let study_class = locator
        .get_study_class_port()
        .get_study_class(StudyClassId(id))
        .await?;

    Ok(Json(study_class.into()))
}

#[instrument(level = "info", skip(locator))]
pub async fn delete_study_class<L: Locator>(
    State(locator): State<L>,
    Authenticated(login): Authenticated,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    locator
        .get_study_class_port()
        .delete_study_class(StudyClassId(id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
