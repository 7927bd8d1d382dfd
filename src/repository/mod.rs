//! Data access layer (Repository pattern)

pub mod student;

pub use student::{StudentRepository, StudentRepositoryImpl};
