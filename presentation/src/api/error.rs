use application_ports::account::AccountError;
use application_ports::student::StudentError;
use application_ports::study_class::StudyClassError;
use application_ports::teacher::TeacherError;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use convert_case::{Case, Casing};
use serde::Serialize;
use tracing::warn;
use validator::ValidationErrors;

/// Every failure an HTTP handler can answer with. This is the only place
/// where statuses are chosen.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    InvalidFields(Vec<FieldError>),
    Unauthorized,
    NotFound(String),
    Unavailable,
}

#[derive(Debug, Serialize)]
pub struct FieldError {
    pub field: String,
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
struct FieldErrorsBody {
    errors: Vec<FieldError>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason).into_response(),
            ApiError::InvalidFields(errors) => {
                (StatusCode::BAD_REQUEST, Json(FieldErrorsBody { errors })).into_response()
            }
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            ApiError::NotFound(reason) => (StatusCode::NOT_FOUND, reason).into_response(),
            ApiError::Unavailable => StatusCode::SERVICE_UNAVAILABLE.into_response(),
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut field_errors: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                let field = field.to_string().to_case(Case::Camel);
                errors.iter().map(move |error| FieldError {
                    field: field.clone(),
                    code: error.code.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|message| message.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field)),
                })
            })
            .collect();
        field_errors.sort_by(|left, right| left.field.cmp(&right.field));

        warn!(errors = ?field_errors, "Request rejected by field validation");

        ApiError::InvalidFields(field_errors)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(error = %rejection, "Malformed JSON body");
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        warn!(error = %rejection, "Malformed query string");
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<StudentError> for ApiError {
    fn from(err: StudentError) -> Self {
        match err {
            StudentError::PartialUpdateTargetNotFound => ApiError::NotFound(err.to_string()),
            StudentError::TemporaryUnavailable => ApiError::Unavailable,
            _ => ApiError::BadRequest(err.to_string()),
        }
    }
}

impl From<TeacherError> for ApiError {
    fn from(err: TeacherError) -> Self {
        match err {
            TeacherError::PartialUpdateTargetNotFound => ApiError::NotFound(err.to_string()),
            TeacherError::TemporaryUnavailable => ApiError::Unavailable,
            _ => ApiError::BadRequest(err.to_string()),
        }
    }
}

impl From<StudyClassError> for ApiError {
    fn from(err: StudyClassError) -> Self {
        match err {
            StudyClassError::PartialUpdateTargetNotFound => ApiError::NotFound(err.to_string()),
            StudyClassError::TemporaryUnavailable => ApiError::Unavailable,
            _ => ApiError::BadRequest(err.to_string()),
        }
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::BadCredentials => ApiError::Unauthorized,
            AccountError::TemporaryUnavailable => ApiError::Unavailable,
            AccountError::InvalidPassword | AccountError::LoginAlreadyUsed => {
                ApiError::BadRequest(err.to_string())
            }
        }
    }
}
