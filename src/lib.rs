//! Students Core - student records service backend
//!
//! REST API over MySQL for student records, their position-addressed phone
//! numbers and class references, with bearer tokens validated by an external
//! identity gateway.

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod identity;
pub mod middleware;
pub mod migration;
pub mod openapi;
pub mod repository;
pub mod server;
pub mod service;
pub mod state;
pub mod telemetry;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
