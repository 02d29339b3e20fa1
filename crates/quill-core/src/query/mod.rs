//! Query layer - published-only reads, tag filtering, similarity and pagination.

mod pagination;
mod service;
mod similarity;

pub use pagination::{PAGE_SIZE, Page, PageWindow, resolve_page};
pub use service::{PostListing, PostQueries};
pub use similarity::{SIMILAR_POSTS_LIMIT, rank_similar};
