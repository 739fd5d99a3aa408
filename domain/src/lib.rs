pub mod account;
pub mod identity;
pub mod ports;
pub mod student;
pub mod student_service;
pub mod study_class;
pub mod study_class_service;
pub mod teacher;
pub mod teacher_service;
