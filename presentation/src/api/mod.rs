use crate::application_ports::Locator;
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod account;
pub mod auth;
pub mod error;
pub mod pagination;
pub mod student;
pub mod study_class;
pub mod teacher;
pub mod validation;

/// Reference to another record by id, as in `"studyClass": {"id": 5}`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IdRef<I> {
    pub id: I,
}

pub fn create_router<L: Locator + Send + Sync + Clone + 'static>() -> Router<L> {
    Router::new()
        .route("/api/register", post(account::register::<L>))
        .route(
            "/api/authenticate",
            get(account::is_authenticated).post(account::authenticate::<L>),
        )
        .route(
            "/api/students",
            get(student::get_students::<L>).post(student::create_student::<L>),
        )
        .route(
            "/api/students/{id}",
            get(student::get_student::<L>)
                .put(student::update_student::<L>)
                .patch(student::partial_update_student::<L>)
                .delete(student::delete_student::<L>),
        )
        .route(
            "/api/teachers",
            get(teacher::get_teachers::<L>).post(teacher::create_teacher::<L>),
        )
        .route(
            "/api/teachers/{id}",
            get(teacher::get_teacher::<L>)
                .put(teacher::update_teacher::<L>)
                .patch(teacher::partial_update_teacher::<L>)
                .delete(teacher::delete_teacher::<L>),
        )
        .route(
            "/api/study-classes",
            get(study_class::get_study_classes::<L>).post(study_class::create_study_class::<L>),
        )
        .route(
            "/api/study-classes/{id}",
            get(study_class::get_study_class::<L>)
                .put(study_class::update_study_class::<L>)
                .patch(study_class::partial_update_study_class::<L>)
                .delete(study_class::delete_study_class::<L>),
        )
}

pub async fn run_api<L: Locator + Send + Sync + Clone + 'static>(
    locator: L,
    port: u16,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let router: Router<()> = create_router::<L>()
        .layer(TraceLayer::new_for_http())
        .with_state(locator);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!(port, "HTTP API listening");

    axum::serve(listener, router.into_make_service()).await?;

    Ok(())
}
