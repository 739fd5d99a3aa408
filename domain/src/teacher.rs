use crate::identity::Entity;
use async_trait::async_trait;
use domain_shared::pagination::{Page, PageRequest};
use domain_shared::school::{StudyClassId, TeacherId};
use thiserror::Error;
use tracing::instrument;

/// A teacher owns exactly one study class through `study_class_id`.
///
/// The inverse direction (which teacher a study class has) is never stored on
/// the study class; the repository answers it with
/// [`TeacherRepository::find_one_by_study_class_id`].
#[derive(Debug, Clone)]
pub struct Teacher {
    id: Option<TeacherId>,
    first_name: String,
    last_name: String,
    study_class_id: StudyClassId,
}

#[instrument(level = "trace")]
pub fn create_teacher(
    first_name: String,
    last_name: String,
    study_class_id: StudyClassId,
) -> Teacher {
    Teacher {
        id: None,
        first_name,
        last_name,
        study_class_id,
    }
}

/// Joins first and last name the way full-name lookups expect them.
pub fn full_name(first_name: &str, last_name: &str) -> String {
    format!("{} {}", first_name, last_name)
}

impl Teacher {
    pub fn id(&self) -> Option<TeacherId> {
        self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn full_name(&self) -> String {
        full_name(&self.first_name, &self.last_name)
    }

    pub fn study_class_id(&self) -> StudyClassId {
        self.study_class_id
    }

    /// Moves the teacher to another study class. Saving the teacher releases
    /// the previous class in the same write.
    #[instrument(level = "trace", skip(self))]
    pub fn assign_study_class(&mut self, study_class_id: StudyClassId) {
        self.study_class_id = study_class_id;
    }

    #[instrument(level = "trace", skip(self))]
    pub fn merge(&mut self, patch: TeacherPatch) {
        if let Some(first_name) = patch.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            self.last_name = last_name;
        }
    }

    #[instrument(level = "trace", skip(snapshot))]
    pub fn from_snapshot(snapshot: TeacherSnapshot) -> Self {
        Self {
            id: snapshot.id,
            first_name: snapshot.first_name,
            last_name: snapshot.last_name,
            study_class_id: snapshot.study_class_id,
        }
    }

    #[instrument(level = "trace", skip(self))]
    pub fn to_snapshot(&self) -> TeacherSnapshot {
        TeacherSnapshot {
            id: self.id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            study_class_id: self.study_class_id,
        }
    }
}

impl Entity for Teacher {
    type Id = TeacherId;

    fn id(&self) -> Option<TeacherId> {
        self.id
    }
}

#[derive(Debug, Clone)]
pub struct TeacherSnapshot {
    pub id: Option<TeacherId>,
    pub first_name: String,
    pub last_name: String,
    pub study_class_id: StudyClassId,
}

#[derive(Debug, Clone)]
pub struct TeacherPatch {
    pub id: TeacherId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait TeacherRepository {
    /// Inserts or overwrites the teacher. Fails with
    /// [`TeacherRepositoryError::StudyClassAlreadyAssigned`] when another
    /// teacher holds the study class.
    async fn save(&self, teacher: &Teacher) -> Result<Teacher, TeacherRepositoryError>;
    async fn find_by_id(&self, id: TeacherId) -> Result<Option<Teacher>, TeacherRepositoryError>;
    async fn find_all(&self, page: PageRequest) -> Result<Page<Teacher>, TeacherRepositoryError>;
    async fn exists_by_id(&self, id: TeacherId) -> Result<bool, TeacherRepositoryError>;
    async fn delete_by_id(&self, id: TeacherId) -> Result<(), TeacherRepositoryError>;
    async fn find_one_by_study_class_id(
        &self,
        study_class_id: StudyClassId,
    ) -> Result<Option<Teacher>, TeacherRepositoryError>;
}

#[derive(Debug, Error)]
pub enum TeacherRepositoryError {
    #[error("Study class {0:?} does not exist")]
    StudyClassNotFound(StudyClassId),
    #[error("Study class {0:?} already has a teacher")]
    StudyClassAlreadyAssigned(StudyClassId),
    #[error("Service is temporarily unavailable")]
    ServiceUnavailable,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jane() -> Teacher {
        Teacher::from_snapshot(TeacherSnapshot {
            id: Some(TeacherId(3)),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            study_class_id: StudyClassId(5),
        })
    }

    #[test]
    fn full_name_is_separated_by_single_space() {
        assert_eq!(jane().full_name(), "Jane Doe");
    }

    #[test]
    fn merge_with_only_first_name_keeps_the_rest() {
        let mut teacher = jane();

        teacher.merge(TeacherPatch {
            id: TeacherId(3),
            first_name: Some("Janet".to_string()),
            last_name: None,
        });

        assert_eq!(teacher.first_name(), "Janet");
        assert_eq!(teacher.last_name(), "Doe");
        assert_eq!(teacher.study_class_id(), StudyClassId(5));
    }

    #[test]
    fn same_id_means_same_entity_regardless_of_fields() {
        let mut renamed = jane();
        renamed.merge(TeacherPatch {
            id: TeacherId(3),
            first_name: Some("John".to_string()),
            last_name: Some("Smith".to_string()),
        });
        renamed.assign_study_class(StudyClassId(6));

        assert!(jane().is_same_entity(&renamed));
    }

    #[test]
    fn unsaved_teachers_are_never_the_same_entity() {
        let first = create_teacher("Jane".to_string(), "Doe".to_string(), StudyClassId(5));
        let second = create_teacher("Jane".to_string(), "Doe".to_string(), StudyClassId(5));

        assert!(!first.is_same_entity(&second));
    }
}
