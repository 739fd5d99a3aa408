use crate::memory::{InMemoryStore, Sequence};
use async_trait::async_trait;
use domain::teacher::{Teacher, TeacherRepository, TeacherRepositoryError};
use domain_shared::pagination::{Page, PageRequest};
use domain_shared::school::{StudyClassId, TeacherId};
use tracing::{instrument, warn};

pub struct InMemoryTeacherRepository {
    store: InMemoryStore,
}

impl InMemoryTeacherRepository {
    #[instrument(level = "trace", skip_all)]
    pub fn new(store: InMemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl TeacherRepository for InMemoryTeacherRepository {
    #[instrument(level = "debug", err, skip(self, teacher))]
    async fn save(&self, teacher: &Teacher) -> Result<Teacher, TeacherRepositoryError> {
        let mut tables = self.store.lock().await;
        let mut snapshot = teacher.to_snapshot();
        let study_class_id = snapshot.study_class_id;

        if !tables.study_classes.contains_key(&study_class_id.0) {
            warn!(study_class_id = study_class_id.0, "Study class does not exist");
            return Err(TeacherRepositoryError::StudyClassNotFound(study_class_id));
        }
        if let Some(holder) = tables.teacher_by_study_class.get(&study_class_id.0) {
            if Some(TeacherId(*holder)) != snapshot.id {
                warn!(
                    study_class_id = study_class_id.0,
                    holder_id = *holder,
                    "Study class already has a teacher",
                );
                return Err(TeacherRepositoryError::StudyClassAlreadyAssigned(
                    study_class_id,
                ));
            }
        }

        let id = match snapshot.id {
            Some(TeacherId(id)) => {
                tables.observe_id(Sequence::Teacher, id);
                id
            }
            None => tables.next_id(Sequence::Teacher),
        };
        snapshot.id = Some(TeacherId(id));

        if let Some(previous) = tables.teachers.insert(id, snapshot.clone()) {
            tables
                .teacher_by_study_class
                .remove(&previous.study_class_id.0);
        }
        tables.teacher_by_study_class.insert(study_class_id.0, id);

        Ok(Teacher::from_snapshot(snapshot))
    }

    #[instrument(level = "debug", err, skip(self))]
    async fn find_by_id(&self, id: TeacherId) -> Result<Option<Teacher>, TeacherRepositoryError> {
        let tables = self.store.lock().await;

        Ok(tables.teachers.get(&id.0).cloned().map(Teacher::from_snapshot))
    }

    #[instrument(level = "debug", err, skip(self))]
    async fn find_all(&self, page: PageRequest) -> Result<Page<Teacher>, TeacherRepositoryError> {
        let tables = self.store.lock().await;
        let teachers = tables
            .teachers
            .values()
            .cloned()
            .map(Teacher::from_snapshot)
            .collect();

        Ok(Page::from_ordered(teachers, page))
    }

    #[instrument(level = "debug", err, skip(self))]
    async fn exists_by_id(&self, id: TeacherId) -> Result<bool, TeacherRepositoryError> {
        Ok(self.store.lock().await.teachers.contains_key(&id.0))
    }

    #[instrument(level = "debug", err, skip(self))]
    async fn delete_by_id(&self, id: TeacherId) -> Result<(), TeacherRepositoryError> {
        let mut tables = self.store.lock().await;
        if let Some(removed) = tables.teachers.remove(&id.0) {
            tables
                .teacher_by_study_class
                .remove(&removed.study_class_id.0);
        }

        Ok(())
    }

    #[instrument(level = "debug", err, skip(self))]
    async fn find_one_by_study_class_id(
        &self,
        study_class_id: StudyClassId,
    ) -> Result<Option<Teacher>, TeacherRepositoryError> {
        let tables = self.store.lock().await;

        Ok(tables
            .teacher_by_study_class
            .get(&study_class_id.0)
            .and_then(|teacher_id| tables.teachers.get(teacher_id))
            .cloned()
            .map(Teacher::from_snapshot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::study_class::InMemoryStudyClassRepository;
    use domain::study_class::{create_study_class, StudyClassRepository};
    use domain::teacher::create_teacher;

    struct Fixture {
        study_classes: InMemoryStudyClassRepository,
        teachers: InMemoryTeacherRepository,
    }

    impl Fixture {
        fn new() -> Self {
            let store = InMemoryStore::new();
            Self {
                study_classes: InMemoryStudyClassRepository::new(store.clone()),
                teachers: InMemoryTeacherRepository::new(store),
            }
        }

        async fn study_class(&self, name: &str) -> StudyClassId {
            self.study_classes
                .save(&create_study_class(name.to_string()))
                .await
                .unwrap()
                .id()
                .unwrap()
        }
    }

    #[tokio::test]
    async fn teacher_is_found_through_its_study_class() {
        let fixture = Fixture::new();
        let class_id = fixture.study_class("10A").await;
        let saved = fixture
            .teachers
            .save(&create_teacher("Jane".to_string(), "Doe".to_string(), class_id))
            .await
            .unwrap();

        let found = fixture
            .teachers
            .find_one_by_study_class_id(class_id)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(found.id(), saved.id());
    }

    #[tokio::test]
    async fn reassigning_releases_previous_study_class() {
        let fixture = Fixture::new();
        let first = fixture.study_class("10A").await;
        let second = fixture.study_class("10B").await;
        let mut teacher = fixture
            .teachers
            .save(&create_teacher("Jane".to_string(), "Doe".to_string(), first))
            .await
            .unwrap();

        teacher.assign_study_class(second);
        fixture.teachers.save(&teacher).await.unwrap();

        assert!(fixture
            .teachers
            .find_one_by_study_class_id(first)
            .await
            .unwrap()
            .is_none());
        let holder = fixture
            .teachers
            .find_one_by_study_class_id(second)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(holder.id(), teacher.id());
    }

    #[tokio::test]
    async fn second_teacher_for_class_is_rejected_until_first_is_deleted() {
        let fixture = Fixture::new();
        let class_id = fixture.study_class("10A").await;
        let first = fixture
            .teachers
            .save(&create_teacher("Jane".to_string(), "Doe".to_string(), class_id))
            .await
            .unwrap();
        let second = create_teacher("John".to_string(), "Smith".to_string(), class_id);

        let rejected = fixture.teachers.save(&second).await;
        assert!(matches!(
            rejected,
            Err(TeacherRepositoryError::StudyClassAlreadyAssigned(id)) if id == class_id
        ));

        fixture
            .teachers
            .delete_by_id(first.id().unwrap())
            .await
            .unwrap();
        let saved = fixture.teachers.save(&second).await.unwrap();

        assert_eq!(saved.full_name(), "John Smith");
    }

    #[tokio::test]
    async fn teacher_needs_existing_study_class() {
        let fixture = Fixture::new();

        let result = fixture
            .teachers
            .save(&create_teacher(
                "Jane".to_string(),
                "Doe".to_string(),
                StudyClassId(42),
            ))
            .await;

        assert!(matches!(
            result,
            Err(TeacherRepositoryError::StudyClassNotFound(StudyClassId(42)))
        ));
    }
}
