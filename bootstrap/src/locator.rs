use application::account::AccountHandler;
use application::student::StudentHandler;
use application::study_class::StudyClassHandler;
use application::teacher::TeacherHandler;
use application_ports::account::AccountPort;
use application_ports::student::StudentPort;
use application_ports::study_class::StudyClassPort;
use application_ports::teacher::TeacherPort;
use domain::account::AccountRepository;
use domain::ports::password::PasswordHasherPort;
use domain::ports::token::TokenPort;
use domain::student::StudentRepository;
use domain::student_service::StudentService;
use domain::study_class::StudyClassRepository;
use domain::study_class_service::StudyClassService;
use domain::teacher::TeacherRepository;
use domain::teacher_service::TeacherService;
use presentation::application_ports::Locator;
use std::sync::Arc;
use tracing::instrument;

/// Storage adapters the application is wired against.
pub struct Repositories {
    pub study_class: Arc<dyn StudyClassRepository + Send + Sync>,
    pub teacher: Arc<dyn TeacherRepository + Send + Sync>,
    pub student: Arc<dyn StudentRepository + Send + Sync>,
    pub account: Arc<dyn AccountRepository + Send + Sync>,
}

#[derive(Clone)]
pub struct ApplicationPortLocator {
    account_adapter: Arc<AccountHandler>,
    student_adapter: Arc<StudentHandler>,
    study_class_adapter: Arc<StudyClassHandler>,
    teacher_adapter: Arc<TeacherHandler>,
}

impl ApplicationPortLocator {
    #[instrument(level = "trace", skip_all)]
    pub fn new(
        repositories: Repositories,
        password_hasher: Arc<dyn PasswordHasherPort + Send + Sync>,
        token_port: Arc<dyn TokenPort + Send + Sync>,
    ) -> Self {
        let Repositories {
            study_class,
            teacher,
            student,
            account,
        } = repositories;

        let study_class_service = Arc::new(StudyClassService::new(study_class));
        let teacher_service = Arc::new(TeacherService::new(teacher));
        let student_service = Arc::new(StudentService::new(student));

        Self {
            account_adapter: Arc::new(AccountHandler::new(account, password_hasher, token_port)),
            student_adapter: Arc::new(StudentHandler::new(
                student_service,
                study_class_service.clone(),
            )),
            study_class_adapter: Arc::new(StudyClassHandler::new(
                study_class_service.clone(),
                teacher_service.clone(),
            )),
            teacher_adapter: Arc::new(TeacherHandler::new(teacher_service, study_class_service)),
        }
    }
}

impl Locator for ApplicationPortLocator {
    #[instrument(level = "trace", skip(self))]
    fn get_account_port(&self) -> Arc<dyn AccountPort + Send + Sync> {
        self.account_adapter.clone()
    }

    #[instrument(level = "trace", skip(self))]
    fn get_student_port(&self) -> Arc<dyn StudentPort + Send + Sync> {
        self.student_adapter.clone()
    }

    #[instrument(level = "trace", skip(self))]
    fn get_study_class_port(&self) -> Arc<dyn StudyClassPort + Send + Sync> {
        self.study_class_adapter.clone()
    }

    #[instrument(level = "trace", skip(self))]
    fn get_teacher_port(&self) -> Arc<dyn TeacherPort + Send + Sync> {
        self.teacher_adapter.clone()
    }
}
