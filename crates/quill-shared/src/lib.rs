//! # Quill Shared
//!
//! Serializable view contexts and error bodies.
//! Kept free of server types so a front end can deserialize what the renderer emits.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
