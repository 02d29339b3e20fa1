//! Form validation for reader submissions.
//!
//! Forms hold the raw submitted strings, so a failed submission can be
//! re-rendered with what the reader typed next to the field errors.

mod comment;
mod errors;
mod share;

pub use comment::CommentForm;
pub use errors::{ValidationErrors, is_valid_email};
pub use share::SharePostForm;
