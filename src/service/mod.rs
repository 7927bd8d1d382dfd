//! Business logic layer

pub mod student;

pub use student::StudentService;
