//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`:
//! content stores, mail transports and renderers.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external services, in-memory only
//! - `postgres` - PostgreSQL content store via SeaORM
//! - `smtp` - SMTP mail transport via lettre

pub mod database;
pub mod mail;
pub mod render;

// Re-exports - In-Memory
pub use database::{DatabaseConfig, InMemoryStore};
pub use mail::{InMemoryMailer, SmtpConfig};
pub use render::JsonRenderer;

// Re-exports - External services
#[cfg(feature = "postgres")]
pub use database::DatabaseConnections;
#[cfg(feature = "smtp")]
pub use mail::SmtpMailer;
