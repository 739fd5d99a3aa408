pub mod authentication;
pub mod pagination;
pub mod school;
