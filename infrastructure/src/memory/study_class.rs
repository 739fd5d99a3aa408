use crate::memory::{InMemoryStore, Sequence};
use async_trait::async_trait;
use domain::study_class::{
    StudyClass, StudyClassRepository, StudyClassRepositoryError, StudyClassSnapshot,
};
use domain_shared::pagination::{Page, PageRequest};
use domain_shared::school::StudyClassId;
use tracing::{instrument, warn};

pub struct InMemoryStudyClassRepository {
    store: InMemoryStore,
}

impl InMemoryStudyClassRepository {
    #[instrument(level = "trace", skip_all)]
    pub fn new(store: InMemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl StudyClassRepository for InMemoryStudyClassRepository {
    #[instrument(level = "debug", err, skip(self, study_class))]
    async fn save(
        &self,
        study_class: &StudyClass,
    ) -> Result<StudyClass, StudyClassRepositoryError> {
        let mut tables = self.store.lock().await;
        let mut snapshot = study_class.to_snapshot();

        let id = match snapshot.id {
            Some(StudyClassId(id)) => {
                tables.observe_id(Sequence::StudyClass, id);
                id
            }
            None => tables.next_id(Sequence::StudyClass),
        };
        snapshot.id = Some(StudyClassId(id));
        tables.study_classes.insert(id, snapshot.clone());

        Ok(StudyClass::from_snapshot(snapshot))
    }

    #[instrument(level = "debug", err, skip(self))]
    async fn find_by_id(
        &self,
        id: StudyClassId,
    ) -> Result<Option<StudyClass>, StudyClassRepositoryError> {
        let tables = self.store.lock().await;

        Ok(tables
            .study_classes
            .get(&id.0)
            .cloned()
            .map(StudyClass::from_snapshot))
    }

    #[instrument(level = "debug", err, skip(self))]
    async fn find_all(
        &self,
        page: PageRequest,
    ) -> Result<Page<StudyClass>, StudyClassRepositoryError> {
        let tables = self.store.lock().await;
        let study_classes = tables
            .study_classes
            .values()
            .cloned()
            .map(StudyClass::from_snapshot)
            .collect();

        Ok(Page::from_ordered(study_classes, page))
    }

    #[instrument(level = "debug", err, skip(self))]
    async fn exists_by_id(&self, id: StudyClassId) -> Result<bool, StudyClassRepositoryError> {
        Ok(self.store.lock().await.study_classes.contains_key(&id.0))
    }

    #[instrument(level = "debug", err, skip(self))]
    async fn delete_by_id(&self, id: StudyClassId) -> Result<(), StudyClassRepositoryError> {
        let mut tables = self.store.lock().await;
        if tables.is_study_class_referenced(id.0) {
            warn!(study_class_id = id.0, "Study class is still referenced");
            return Err(StudyClassRepositoryError::StillReferenced);
        }

        tables.study_classes.remove(&id.0);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::student::InMemoryStudentRepository;
    use domain::student::{create_student, StudentRepository};
    use domain::study_class::create_study_class;

    #[tokio::test]
    async fn saved_study_classes_are_listed_in_id_order() {
        let repository = InMemoryStudyClassRepository::new(InMemoryStore::new());
        for name in ["10A", "10B", "11A"] {
            repository
                .save(&create_study_class(name.to_string()))
                .await
                .unwrap();
        }

        let page = repository.find_all(PageRequest::new(0, 2)).await.unwrap();

        let names: Vec<_> = page.content.iter().map(|c| c.name().to_string()).collect();
        assert_eq!(names, ["10A", "10B"]);
        assert_eq!(page.total_elements, 3);
    }

    #[tokio::test]
    async fn study_class_with_students_cannot_be_deleted() {
        let store = InMemoryStore::new();
        let study_classes = InMemoryStudyClassRepository::new(store.clone());
        let students = InMemoryStudentRepository::new(store);
        let class_id = study_classes
            .save(&create_study_class("10A".to_string()))
            .await
            .unwrap()
            .id()
            .unwrap();
        students
            .save(&create_student(
                "Ann".to_string(),
                "Lee".to_string(),
                class_id,
            ))
            .await
            .unwrap();

        let result = study_classes.delete_by_id(class_id).await;

        assert!(matches!(result, Err(StudyClassRepositoryError::StillReferenced)));
        assert!(study_classes.exists_by_id(class_id).await.unwrap());
    }

    #[tokio::test]
    async fn update_keeps_the_id() {
        let repository = InMemoryStudyClassRepository::new(InMemoryStore::new());
        let saved = repository
            .save(&create_study_class("10A".to_string()))
            .await
            .unwrap();
        let mut snapshot = saved.to_snapshot();
        snapshot.name = "10B".to_string();

        repository
            .save(&StudyClass::from_snapshot(snapshot))
            .await
            .unwrap();

        let found = repository.find_by_id(saved.id().unwrap()).await.unwrap().unwrap();
        assert_eq!(found.name(), "10B");
        assert_eq!(repository.find_all(PageRequest::default()).await.unwrap().total_elements, 1);
    }
}
