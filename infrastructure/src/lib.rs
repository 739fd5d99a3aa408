pub mod database;
pub mod memory;
pub mod postgres;
pub mod security;
