//! Post listing and detail handlers.

use actix_web::{HttpResponse, web};
use serde::Deserialize;

use quill_core::domain::PostLocator;
use quill_core::forms::CommentForm;
use quill_core::query::SIMILAR_POSTS_LIMIT;
use quill_shared::dto::{FormResponse, PostDetailContext, PostListContext};

use crate::middleware::error::AppResult;
use crate::state::AppState;
use crate::views;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    /// Raw value; anything unparsable selects the first page.
    pub page: Option<String>,
}

async fn list(
    state: &AppState,
    tag_slug: Option<&str>,
    page: Option<&str>,
) -> AppResult<HttpResponse> {
    let listing = state.queries.list_published(tag_slug, page).await?;

    let context = PostListContext {
        posts: listing.posts.items.iter().map(views::post).collect(),
        page: views::page(&listing.posts),
        tag: listing.tag.as_ref().map(views::tag),
    };
    views::render(state, views::POST_LIST, &context)
}

/// GET /
pub async fn post_list(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    list(&state, None, query.page.as_deref()).await
}

/// GET /tag/{tag_slug}/
pub async fn post_list_by_tag(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    list(&state, Some(path.as_str()), query.page.as_deref()).await
}

/// GET /{year}/{month}/{day}/{slug}/
pub async fn post_detail(
    state: web::Data<AppState>,
    path: web::Path<(i32, u32, u32, String)>,
) -> AppResult<HttpResponse> {
    let (year, month, day, slug) = path.into_inner();
    let locator = PostLocator::new(year, month, day, slug);

    let post = state.queries.published_by_date(&locator).await?;
    let comments = state.comments.list_for_post(post.id, true).await?;
    let similar = state
        .queries
        .similar_posts(&post, SIMILAR_POSTS_LIMIT)
        .await?;

    let context = PostDetailContext {
        post: views::post(&post),
        comments: comments.iter().map(views::comment).collect(),
        form: FormResponse::unbound(CommentForm::default()),
        similar_posts: similar.iter().map(views::post).collect(),
    };
    views::render(&state, views::POST_DETAIL, &context)
}
