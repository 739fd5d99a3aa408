pub mod account;
pub mod student;
pub mod study_class;
pub mod teacher;
