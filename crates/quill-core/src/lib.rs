//! # Quill Core
//!
//! The domain layer of the Quill blog.
//! Entities, repository and collaborator ports, the published-post query layer
//! and form validation. No infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod forms;
pub mod ports;
pub mod query;

pub use error::DomainError;
