use crate::memory::{InMemoryStore, Sequence, Tables};
use async_trait::async_trait;
use domain::student::{Student, StudentRepository, StudentRepositoryError, StudentSnapshot};
use domain::teacher::full_name;
use domain_shared::pagination::{Page, PageRequest};
use domain_shared::school::{StudentId, StudyClassId};
use tracing::{instrument, warn};

pub struct InMemoryStudentRepository {
    store: InMemoryStore,
}

impl InMemoryStudentRepository {
    #[instrument(level = "trace", skip_all)]
    pub fn new(store: InMemoryStore) -> Self {
        Self { store }
    }

    async fn find_page<F>(&self, page: PageRequest, filter: F) -> Page<Student>
    where
        F: Fn(&Tables, &StudentSnapshot) -> bool,
    {
        let guard = self.store.lock().await;
        let tables: &Tables = &guard;
        let students = tables
            .students
            .values()
            .filter(|student| filter(tables, student))
            .cloned()
            .map(Student::from_snapshot)
            .collect();

        Page::from_ordered(students, page)
    }
}

fn study_class_named(tables: &Tables, study_class_id: StudyClassId, name: &str) -> bool {
    tables
        .study_classes
        .get(&study_class_id.0)
        .is_some_and(|study_class| study_class.name == name)
}

fn taught_by(tables: &Tables, study_class_id: StudyClassId, teacher_full_name: &str) -> bool {
    tables
        .teacher_by_study_class
        .get(&study_class_id.0)
        .and_then(|teacher_id| tables.teachers.get(teacher_id))
        .is_some_and(|teacher| {
            full_name(&teacher.first_name, &teacher.last_name) == teacher_full_name
        })
}

#[async_trait]
impl StudentRepository for InMemoryStudentRepository {
    #[instrument(level = "debug", err, skip(self, student))]
    async fn save(&self, student: &Student) -> Result<Student, StudentRepositoryError> {
        let mut tables = self.store.lock().await;
        let mut snapshot = student.to_snapshot();

        if !tables
            .study_classes
            .contains_key(&snapshot.study_class_id.0)
        {
            warn!(
                study_class_id = snapshot.study_class_id.0,
                "Study class does not exist",
            );
            return Err(StudentRepositoryError::StudyClassNotFound(
                snapshot.study_class_id,
            ));
        }

        let id = match snapshot.id {
            Some(StudentId(id)) => {
                tables.observe_id(Sequence::Student, id);
                id
            }
            None => tables.next_id(Sequence::Student),
        };
        snapshot.id = Some(StudentId(id));
        tables.students.insert(id, snapshot.clone());

        Ok(Student::from_snapshot(snapshot))
    }

    #[instrument(level = "debug", err, skip(self))]
    async fn find_by_id(&self, id: StudentId) -> Result<Option<Student>, StudentRepositoryError> {
        let tables = self.store.lock().await;

        Ok(tables.students.get(&id.0).cloned().map(Student::from_snapshot))
    }

    #[instrument(level = "debug", err, skip(self))]
    async fn find_all(&self, page: PageRequest) -> Result<Page<Student>, StudentRepositoryError> {
        Ok(self.find_page(page, |_, _| true).await)
    }

    #[instrument(level = "debug", err, skip(self))]
    async fn exists_by_id(&self, id: StudentId) -> Result<bool, StudentRepositoryError> {
        Ok(self.store.lock().await.students.contains_key(&id.0))
    }

    #[instrument(level = "debug", err, skip(self))]
    async fn delete_by_id(&self, id: StudentId) -> Result<(), StudentRepositoryError> {
        self.store.lock().await.students.remove(&id.0);

        Ok(())
    }

    #[instrument(level = "debug", err, skip(self))]
    async fn find_by_study_class_name(
        &self,
        study_class_name: &str,
        page: PageRequest,
    ) -> Result<Page<Student>, StudentRepositoryError> {
        Ok(self
            .find_page(page, |tables, student| {
                study_class_named(tables, student.study_class_id, study_class_name)
            })
            .await)
    }

    #[instrument(level = "debug", err, skip(self))]
    async fn find_by_teacher_full_name(
        &self,
        teacher_full_name: &str,
        page: PageRequest,
    ) -> Result<Page<Student>, StudentRepositoryError> {
        Ok(self
            .find_page(page, |tables, student| {
                taught_by(tables, student.study_class_id, teacher_full_name)
            })
            .await)
    }

    #[instrument(level = "debug", err, skip(self))]
    async fn find_by_study_class_name_and_teacher_full_name(
        &self,
        study_class_name: &str,
        teacher_full_name: &str,
        page: PageRequest,
    ) -> Result<Page<Student>, StudentRepositoryError> {
        Ok(self
            .find_page(page, |tables, student| {
                study_class_named(tables, student.study_class_id, study_class_name)
                    && taught_by(tables, student.study_class_id, teacher_full_name)
            })
            .await)
    }
}
