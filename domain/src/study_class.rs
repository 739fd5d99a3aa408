use crate::identity::Entity;
use async_trait::async_trait;
use domain_shared::pagination::{Page, PageRequest};
use domain_shared::school::StudyClassId;
use thiserror::Error;
use tracing::instrument;

#[derive(Debug, Clone)]
pub struct StudyClass {
    id: Option<StudyClassId>,
    name: String,
}

#[instrument(level = "trace")]
pub fn create_study_class(name: String) -> StudyClass {
    StudyClass { id: None, name }
}

impl StudyClass {
    pub fn id(&self) -> Option<StudyClassId> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Overwrites the fields present in `patch`.
    #[instrument(level = "trace", skip(self))]
    pub fn merge(&mut self, patch: StudyClassPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
    }

    #[instrument(level = "trace", skip(snapshot))]
    pub fn from_snapshot(snapshot: StudyClassSnapshot) -> Self {
        Self {
            id: snapshot.id,
            name: snapshot.name,
        }
    }

    #[instrument(level = "trace", skip(self))]
    pub fn to_snapshot(&self) -> StudyClassSnapshot {
        StudyClassSnapshot {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

impl Entity for StudyClass {
    type Id = StudyClassId;

    fn id(&self) -> Option<StudyClassId> {
        self.id
    }
}

#[derive(Debug, Clone)]
pub struct StudyClassSnapshot {
    pub id: Option<StudyClassId>,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct StudyClassPatch {
    pub id: StudyClassId,
    pub name: Option<String>,
}

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait StudyClassRepository {
    /// Inserts the study class when it has no id yet, otherwise overwrites it.
    async fn save(
        &self,
        study_class: &StudyClass,
    ) -> Result<StudyClass, StudyClassRepositoryError>;
    async fn find_by_id(
        &self,
        id: StudyClassId,
    ) -> Result<Option<StudyClass>, StudyClassRepositoryError>;
    async fn find_all(
        &self,
        page: PageRequest,
    ) -> Result<Page<StudyClass>, StudyClassRepositoryError>;
    async fn exists_by_id(&self, id: StudyClassId) -> Result<bool, StudyClassRepositoryError>;
    async fn delete_by_id(&self, id: StudyClassId) -> Result<(), StudyClassRepositoryError>;
}

#[derive(Debug, Error)]
pub enum StudyClassRepositoryError {
    #[error("Study class is still referenced by a teacher or a student")]
    StillReferenced,
    #[error("Service is temporarily unavailable")]
    ServiceUnavailable,
}
