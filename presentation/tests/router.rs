use application::account::AccountHandler;
use application::student::StudentHandler;
use application::study_class::StudyClassHandler;
use application::teacher::TeacherHandler;
use application_ports::account::AccountPort;
use application_ports::student::StudentPort;
use application_ports::study_class::StudyClassPort;
use application_ports::teacher::TeacherPort;
use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use chrono::Duration;
use domain::student_service::StudentService;
use domain::study_class_service::StudyClassService;
use domain::teacher_service::TeacherService;
use infrastructure::memory::account::InMemoryAccountRepository;
use infrastructure::memory::student::InMemoryStudentRepository;
use infrastructure::memory::study_class::InMemoryStudyClassRepository;
use infrastructure::memory::teacher::InMemoryTeacherRepository;
use infrastructure::memory::InMemoryStore;
use infrastructure::security::password::BcryptPasswordHasher;
use infrastructure::security::token::JwtTokenAdapter;
use presentation::api::create_router;
use presentation::application_ports::Locator;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

#[derive(Clone)]
struct TestLocator {
    account: Arc<AccountHandler>,
    student: Arc<StudentHandler>,
    study_class: Arc<StudyClassHandler>,
    teacher: Arc<TeacherHandler>,
}

impl Locator for TestLocator {
    fn get_account_port(&self) -> Arc<dyn AccountPort + Send + Sync> {
        self.account.clone()
    }

    fn get_student_port(&self) -> Arc<dyn StudentPort + Send + Sync> {
        self.student.clone()
    }

    fn get_study_class_port(&self) -> Arc<dyn StudyClassPort + Send + Sync> {
        self.study_class.clone()
    }

    fn get_teacher_port(&self) -> Arc<dyn TeacherPort + Send + Sync> {
        self.teacher.clone()
    }
}

fn app() -> Router {
    let store = InMemoryStore::new();
    let study_class_service = Arc::new(StudyClassService::new(Arc::new(
        InMemoryStudyClassRepository::new(store.clone()),
    )));
    let teacher_service = Arc::new(TeacherService::new(Arc::new(
        InMemoryTeacherRepository::new(store.clone()),
    )));
    let student_service = Arc::new(StudentService::new(Arc::new(
        InMemoryStudentRepository::new(store.clone()),
    )));

    let locator = TestLocator {
        account: Arc::new(AccountHandler::new(
            Arc::new(InMemoryAccountRepository::new(store)),
            Arc::new(BcryptPasswordHasher::new(4)),
            Arc::new(JwtTokenAdapter::new(
                b"router-test-secret",
                Duration::hours(1),
                Duration::days(30),
            )),
        )),
        student: Arc::new(StudentHandler::new(
            student_service,
            study_class_service.clone(),
        )),
        study_class: Arc::new(StudyClassHandler::new(
            study_class_service.clone(),
            teacher_service.clone(),
        )),
        teacher: Arc::new(TeacherHandler::new(teacher_service, study_class_service)),
    };

    create_router::<TestLocator>().with_state(locator)
}

struct Reply {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl Reply {
    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    fn text(&self) -> String {
        String::from_utf8(self.body.clone()).unwrap()
    }
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Reply {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec();

    Reply {
        status,
        headers,
        body,
    }
}

async fn login(app: &Router) -> String {
    let registered = send(
        app,
        Method::POST,
        "/api/register",
        None,
        Some(json!({"login": "Admin", "password": "admin"})),
    )
    .await;
    assert_eq!(registered.status, StatusCode::CREATED);

    let authenticated = send(
        app,
        Method::POST,
        "/api/authenticate",
        None,
        Some(json!({"username": "admin", "password": "admin"})),
    )
    .await;
    assert_eq!(authenticated.status, StatusCode::OK);
    assert!(authenticated.headers[header::AUTHORIZATION]
        .to_str()
        .unwrap()
        .starts_with("Bearer "));

    authenticated.json()["id_token"].as_str().unwrap().to_string()
}

async fn create_study_class(app: &Router, token: &str, name: &str) -> i64 {
    let reply = send(
        app,
        Method::POST,
        "/api/study-classes",
        Some(token),
        Some(json!({"name": name})),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED);

    reply.json()["id"].as_i64().unwrap()
}

#[tokio::test]
async fn entity_routes_require_a_token() {
    let app = app();

    let reply = send(&app, Method::GET, "/api/students", None, None).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);

    let reply = send(&app, Method::GET, "/api/students", Some("forged"), None).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn session_check_reports_login_or_nothing() {
    let app = app();
    let token = login(&app).await;

    let anonymous = send(&app, Method::GET, "/api/authenticate", None, None).await;
    assert_eq!(anonymous.status, StatusCode::OK);
    assert_eq!(anonymous.text(), "");

    let known = send(&app, Method::GET, "/api/authenticate", Some(&token), None).await;
    assert_eq!(known.text(), "admin");
}

#[tokio::test]
async fn registration_rejections() {
    let app = app();
    login(&app).await;

    let short = send(
        &app,
        Method::POST,
        "/api/register",
        None,
        Some(json!({"login": "jane", "password": "abc"})),
    )
    .await;
    assert_eq!(short.status, StatusCode::BAD_REQUEST);
    assert_eq!(short.text(), "Incorrect password");

    let duplicate = send(
        &app,
        Method::POST,
        "/api/register",
        None,
        Some(json!({"login": "ADMIN", "password": "secret"})),
    )
    .await;
    assert_eq!(duplicate.status, StatusCode::BAD_REQUEST);
    assert_eq!(duplicate.text(), "login already exists");

    let wrong = send(
        &app,
        Method::POST,
        "/api/authenticate",
        None,
        Some(json!({"username": "admin", "password": "wrong"})),
    )
    .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn second_teacher_for_class_succeeds_only_after_first_is_deleted() {
    let app = app();
    let token = login(&app).await;
    let class_id = create_study_class(&app, &token, "10A").await;
    let teacher = json!({"firstName": "John", "lastName": "Smith", "studyClass": {"id": class_id}});

    let first = send(
        &app,
        Method::POST,
        "/api/teachers",
        Some(&token),
        Some(json!({"firstName": "Jane", "lastName": "Doe", "studyClass": {"id": class_id}})),
    )
    .await;
    assert_eq!(first.status, StatusCode::CREATED);
    let first_id = first.json()["id"].as_i64().unwrap();
    assert_eq!(
        first.headers[header::LOCATION],
        format!("/api/teachers/{}", first_id).as_str()
    );

    let rejected = send(
        &app,
        Method::POST,
        "/api/teachers",
        Some(&token),
        Some(teacher.clone()),
    )
    .await;
    assert_eq!(rejected.status, StatusCode::BAD_REQUEST);
    assert_eq!(rejected.text(), "Study Class has already a teacher");

    let deleted = send(
        &app,
        Method::DELETE,
        &format!("/api/teachers/{}", first_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let accepted = send(&app, Method::POST, "/api/teachers", Some(&token), Some(teacher)).await;
    assert_eq!(accepted.status, StatusCode::CREATED);

    let study_class = send(
        &app,
        Method::GET,
        &format!("/api/study-classes/{}", class_id),
        Some(&token),
        None,
    )
    .await
    .json();
    assert_eq!(study_class["teacher"]["firstName"], "John");
    assert_eq!(study_class["teacher"]["lastName"], "Smith");
}

#[tokio::test]
async fn teacher_update_keeping_its_class_is_accepted() {
    let app = app();
    let token = login(&app).await;
    let class_id = create_study_class(&app, &token, "10A").await;
    let created = send(
        &app,
        Method::POST,
        "/api/teachers",
        Some(&token),
        Some(json!({"firstName": "Jane", "lastName": "Doe", "studyClass": {"id": class_id}})),
    )
    .await
    .json();
    let id = created["id"].as_i64().unwrap();

    let updated = send(
        &app,
        Method::PUT,
        &format!("/api/teachers/{}", id),
        Some(&token),
        Some(json!({
            "id": id,
            "firstName": "Janet",
            "lastName": "Doe",
            "studyClass": {"id": class_id},
        })),
    )
    .await;

    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.json()["firstName"], "Janet");
}

#[tokio::test]
async fn student_lifecycle() {
    let app = app();
    let token = login(&app).await;

    let orphan = send(
        &app,
        Method::POST,
        "/api/students",
        Some(&token),
        Some(json!({"firstName": "Ann", "lastName": "Lee", "studyClass": {"id": 99}})),
    )
    .await;
    assert_eq!(orphan.status, StatusCode::BAD_REQUEST);
    assert_eq!(orphan.text(), "Study Class doesn't exist");

    let class_id = create_study_class(&app, &token, "10A").await;
    let created = send(
        &app,
        Method::POST,
        "/api/students",
        Some(&token),
        Some(json!({"firstName": "Ann", "lastName": "Lee", "studyClass": {"id": class_id}})),
    )
    .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let student = created.json();
    let id = student["id"].as_i64().unwrap();
    assert_eq!(student["studyClass"]["id"], class_id);

    let patched = send(
        &app,
        Method::PATCH,
        &format!("/api/students/{}", id),
        Some(&token),
        Some(json!({"id": id, "firstName": "Anna"})),
    )
    .await;
    assert_eq!(patched.status, StatusCode::OK);
    assert_eq!(patched.json()["firstName"], "Anna");
    assert_eq!(patched.json()["lastName"], "Lee");

    let mismatch = send(
        &app,
        Method::PATCH,
        &format!("/api/students/{}", id),
        Some(&token),
        Some(json!({"id": id + 1, "firstName": "Bob"})),
    )
    .await;
    assert_eq!(mismatch.status, StatusCode::BAD_REQUEST);
    assert_eq!(mismatch.text(), "Invalid ID");

    let referenced = send(
        &app,
        Method::DELETE,
        &format!("/api/study-classes/{}", class_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(referenced.status, StatusCode::BAD_REQUEST);
    assert_eq!(referenced.text(), "Study Class is still referenced");

    let deleted = send(
        &app,
        Method::DELETE,
        &format!("/api/students/{}", id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let missing = send(
        &app,
        Method::GET,
        &format!("/api/students/{}", id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing.text(), "student not found");
}

#[tokio::test]
async fn create_with_id_or_missing_fields_is_rejected() {
    let app = app();
    let token = login(&app).await;
    let class_id = create_study_class(&app, &token, "10A").await;

    let with_id = send(
        &app,
        Method::POST,
        "/api/students",
        Some(&token),
        Some(json!({
            "id": 5,
            "firstName": "Ann",
            "lastName": "Lee",
            "studyClass": {"id": class_id},
        })),
    )
    .await;
    assert_eq!(with_id.status, StatusCode::BAD_REQUEST);
    assert_eq!(with_id.text(), "A new student cannot already have an ID");

    let incomplete = send(
        &app,
        Method::POST,
        "/api/students",
        Some(&token),
        Some(json!({"lastName": "Lee", "studyClass": {"id": class_id}})),
    )
    .await;
    assert_eq!(incomplete.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        incomplete.json(),
        json!({"errors": [{
            "field": "firstName",
            "code": "required",
            "message": "firstName is invalid",
        }]})
    );
}

#[tokio::test]
async fn student_list_is_filtered_and_paged() {
    let app = app();
    let token = login(&app).await;
    let class_a = create_study_class(&app, &token, "10A").await;
    let class_b = create_study_class(&app, &token, "10B").await;
    send(
        &app,
        Method::POST,
        "/api/teachers",
        Some(&token),
        Some(json!({"firstName": "Jane", "lastName": "Doe", "studyClass": {"id": class_a}})),
    )
    .await;
    for (name, class_id) in [("Ann", class_a), ("Bob", class_a), ("Cid", class_b)] {
        send(
            &app,
            Method::POST,
            "/api/students",
            Some(&token),
            Some(json!({"firstName": name, "lastName": "Lee", "studyClass": {"id": class_id}})),
        )
        .await;
    }

    let by_teacher = send(
        &app,
        Method::GET,
        "/api/students?teacherFullName=Jane%20Doe&size=1",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(by_teacher.status, StatusCode::OK);
    assert_eq!(by_teacher.headers["x-total-count"], "2");
    assert_eq!(by_teacher.json().as_array().unwrap().len(), 1);
    assert_eq!(by_teacher.json()[0]["firstName"], "Ann");
    let link = by_teacher.headers[header::LINK].to_str().unwrap();
    assert!(link.contains("</api/students?teacherFullName=Jane+Doe&page=1&size=1>; rel=\"next\""));

    let by_class = send(
        &app,
        Method::GET,
        "/api/students?studyClassName=10B",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(by_class.json()[0]["firstName"], "Cid");
    assert_eq!(by_class.headers["x-total-count"], "1");

    let everyone = send(&app, Method::GET, "/api/students", Some(&token), None).await;
    assert_eq!(everyone.headers["x-total-count"], "3");
}

#[tokio::test]
async fn last_representable_page_is_served_without_next_link() {
    let app = app();
    let token = login(&app).await;
    create_study_class(&app, &token, "10A").await;

    let reply = send(
        &app,
        Method::GET,
        "/api/study-classes?page=4294967295",
        Some(&token),
        None,
    )
    .await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json(), json!([]));
    assert_eq!(reply.headers["x-total-count"], "1");
    let link = reply.headers[header::LINK].to_str().unwrap();
    assert!(!link.contains("rel=\"next\""));
    assert!(link.contains("</api/study-classes?page=4294967294&size=20>; rel=\"prev\""));
}

#[tokio::test]
async fn missing_study_class_is_reported_by_name() {
    let app = app();
    let token = login(&app).await;

    let reply = send(&app, Method::GET, "/api/study-classes/999", Some(&token), None).await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.text(), "study class not found");
}
