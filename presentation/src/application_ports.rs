use application_ports::account::AccountPort;
use application_ports::student::StudentPort;
use application_ports::study_class::StudyClassPort;
use application_ports::teacher::TeacherPort;
use std::sync::Arc;

pub trait Locator {
    fn get_account_port(&self) -> Arc<dyn AccountPort + Send + Sync>;
    fn get_student_port(&self) -> Arc<dyn StudentPort + Send + Sync>;
    fn get_study_class_port(&self) -> Arc<dyn StudyClassPort + Send + Sync>;
    fn get_teacher_port(&self) -> Arc<dyn TeacherPort + Send + Sync>;
}
