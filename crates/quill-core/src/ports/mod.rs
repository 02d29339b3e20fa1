//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod mailer;
mod render;
mod repository;

pub use mailer::{MailError, MailMessage, Mailer};
pub use render::{RenderError, Rendered, Renderer};
pub use repository::{
    BaseRepository, CommentRepository, PostRepository, PostScope, TagRepository,
};
