//! Process-local storage used by `serve --in-memory` and by tests.
//!
//! All four repositories share one [`InMemoryStore`], so the foreign keys
//! between tables and the one-teacher-per-class index are checked inside a
//! single critical section, the same guarantees the Postgres schema gives.

pub mod account;
pub mod student;
pub mod study_class;
pub mod teacher;

use domain::account::AccountSnapshot;
use domain::student::StudentSnapshot;
use domain::study_class::StudyClassSnapshot;
use domain::teacher::TeacherSnapshot;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().await
    }
}

#[derive(Default)]
pub(crate) struct Tables {
    pub study_classes: BTreeMap<i64, StudyClassSnapshot>,
    pub teachers: BTreeMap<i64, TeacherSnapshot>,
    pub students: BTreeMap<i64, StudentSnapshot>,
    /// Keyed by normalized login.
    pub accounts: HashMap<String, AccountSnapshot>,
    /// study class id -> teacher id
    pub teacher_by_study_class: HashMap<i64, i64>,
    sequences: Sequences,
}

#[derive(Default)]
struct Sequences {
    study_class: i64,
    teacher: i64,
    student: i64,
    account: i64,
}

#[derive(Clone, Copy)]
pub(crate) enum Sequence {
    StudyClass,
    Teacher,
    Student,
    Account,
}

impl Tables {
    pub fn next_id(&mut self, sequence: Sequence) -> i64 {
        let counter = self.counter(sequence);
        *counter += 1;
        *counter
    }

    /// Keeps the sequence ahead of ids that were written explicitly.
    pub fn observe_id(&mut self, sequence: Sequence, id: i64) {
        let counter = self.counter(sequence);
        *counter = (*counter).max(id);
    }

    fn counter(&mut self, sequence: Sequence) -> &mut i64 {
        match sequence {
            Sequence::StudyClass => &mut self.sequences.study_class,
            Sequence::Teacher => &mut self.sequences.teacher,
            Sequence::Student => &mut self.sequences.student,
            Sequence::Account => &mut self.sequences.account,
        }
    }

    pub fn is_study_class_referenced(&self, study_class_id: i64) -> bool {
        self.teacher_by_study_class.contains_key(&study_class_id)
            || self
                .students
                .values()
                .any(|student| student.study_class_id.0 == study_class_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sequences_skip_explicitly_written_ids() {
        let store = InMemoryStore::new();
        let mut tables = store.lock().await;

        assert_eq!(tables.next_id(Sequence::Student), 1);
        tables.observe_id(Sequence::Student, 10);
        assert_eq!(tables.next_id(Sequence::Student), 11);
        assert_eq!(tables.next_id(Sequence::Teacher), 1);
    }
}
