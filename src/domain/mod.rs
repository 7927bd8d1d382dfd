//! Domain models for the student records service

pub mod common;
pub mod student;

pub use common::StringUuid;
pub use student::*;
