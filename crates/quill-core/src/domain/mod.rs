//! Domain entities - the core business objects.

mod comment;
mod locator;
mod post;
mod record;
mod slug;
mod tag;

pub use comment::{Comment, EMAIL_MAX_LEN, NAME_MAX_LEN};
pub use locator::PostLocator;
pub use post::{Post, PostStatus, SLUG_MAX_LEN, TITLE_MAX_LEN};
pub use record::{Record, stamp_for_write};
pub use slug::{is_valid_slug, slugify};
pub use tag::{TAG_NAME_MAX_LEN, Tag};
