//! Conversions from domain values into view contexts.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use quill_core::domain::{Comment, Post, Tag};
use quill_core::forms::ValidationErrors;
use quill_core::query::Page;
use quill_shared::dto::{CommentResponse, FormResponse, PageResponse, PostResponse, TagResponse};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

pub const POST_LIST: &str = "blog/post/list";
pub const POST_DETAIL: &str = "blog/post/detail";
pub const POST_SHARE: &str = "blog/post/share";
pub const POST_COMMENT: &str = "blog/post/comment";

pub fn tag(tag: &Tag) -> TagResponse {
    TagResponse {
        name: tag.name.clone(),
        slug: tag.slug.clone(),
        url: format!("/tag/{}/", tag.slug),
    }
}

pub fn post(post: &Post) -> PostResponse {
    PostResponse {
        id: post.id,
        title: post.title.clone(),
        slug: post.slug.clone(),
        author_id: post.author_id,
        body: post.body.clone(),
        publish: post.publish_date,
        status: post.status.label().to_string(),
        url: post.absolute_path(),
        tags: post.tags.iter().map(tag).collect(),
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

pub fn comment(comment: &Comment) -> CommentResponse {
    CommentResponse {
        id: comment.id,
        name: comment.name.clone(),
        body: comment.body.clone(),
        created_at: comment.created_at,
    }
}

pub fn page<T>(page: &Page<T>) -> PageResponse {
    PageResponse {
        number: page.number,
        num_pages: page.num_pages,
        per_page: page.per_page,
        total: page.total,
        has_next: page.has_next,
        has_previous: page.has_previous,
        next_page_number: page.next_page_number,
        previous_page_number: page.previous_page_number,
    }
}

/// Submitted form data; a body that is not a well-formed form binds as empty.
pub fn submitted<T: Default>(form: Option<web::Form<T>>) -> T {
    form.map(web::Form::into_inner).unwrap_or_default()
}

/// A bound form carrying its validation errors.
pub fn invalid_form<T>(data: T, errors: &ValidationErrors) -> FormResponse<T> {
    let mut form = FormResponse::unbound(data);
    for field in errors.fields() {
        form.errors
            .insert(field.to_string(), errors.get(field).to_vec());
    }
    form
}

/// Render `view` through the configured renderer as a 200 response.
pub fn render<C: Serialize>(state: &AppState, view: &str, context: &C) -> AppResult<HttpResponse> {
    let context =
        serde_json::to_value(context).map_err(|e| AppError::Internal(e.to_string()))?;
    let rendered = state.renderer.render(view, &context)?;

    Ok(HttpResponse::Ok()
        .content_type(rendered.content_type)
        .body(rendered.body))
}
