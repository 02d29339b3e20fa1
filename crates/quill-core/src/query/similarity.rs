use std::cmp::Reverse;

use crate::domain::Post;

/// Maximum number of similar posts shown next to a post.
pub const SIMILAR_POSTS_LIMIT: usize = 4;

/// Rank `candidates` by how many tags they share with `post`.
///
/// Posts sharing no tag, and `post` itself, are dropped. Order is shared-tag
/// count descending, then publish date descending, then id ascending.
pub fn rank_similar(post: &Post, candidates: Vec<Post>, limit: usize) -> Vec<Post> {
    let mut ranked: Vec<(usize, Post)> = candidates
        .into_iter()
        .filter(|candidate| candidate.id != post.id)
        .map(|candidate| (post.shared_tag_count(&candidate), candidate))
        .filter(|(shared, _)| *shared > 0)
        .collect();

    ranked.sort_by_key(|(shared, candidate)| {
        (Reverse(*shared), Reverse(candidate.publish_date), candidate.id)
    });

    ranked
        .into_iter()
        .take(limit)
        .map(|(_, candidate)| candidate)
        .collect()
}
