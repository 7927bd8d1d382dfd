//! Application state trait for dependency injection
//!
//! Handlers are generic over [`HasServices`] so the same router serves the
//! production `AppState` and the in-memory state used by the HTTP tests.

use crate::config::Config;
use crate::identity::TokenValidator;
use crate::repository::StudentRepository;
use crate::service::StudentService;

pub trait HasServices: Clone + Send + Sync + 'static {
    /// The student repository type
    type StudentRepo: StudentRepository;
    /// The bearer token validator type
    type Validator: TokenValidator;

    /// Get the application configuration
    fn config(&self) -> &Config;

    /// Get the student service
    fn student_service(&self) -> &StudentService<Self::StudentRepo>;

    /// Get the token validator used by the auth extractor
    fn token_validator(&self) -> &Self::Validator;

    /// Check whether the backing store answers
    fn check_ready(&self) -> impl std::future::Future<Output = bool> + Send;
}
