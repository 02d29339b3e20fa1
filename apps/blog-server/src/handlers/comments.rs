//! Comment submission handler.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::forms::CommentForm;
use quill_shared::dto::{CommentContext, FormResponse};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;
use crate::views;

/// POST /{post_id}/comment/
///
/// Every valid submission creates a new comment, including identical resubmissions.
pub async fn post_comment(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    form: Option<web::Form<CommentForm>>,
) -> AppResult<HttpResponse> {
    let post = state.queries.published_by_id(path.into_inner()).await?;
    let submitted = views::submitted(form);

    let (form, comment) = match submitted.build_comment(&post) {
        Ok(comment) => {
            let saved = state.comments.save(comment).await?;
            tracing::debug!(comment_id = %saved.id, post_id = %post.id, "Comment created");
            (FormResponse::unbound(submitted), Some(views::comment(&saved)))
        }
        Err(errors) => (views::invalid_form(submitted, &errors), None),
    };

    let context = CommentContext {
        post: views::post(&post),
        form,
        comment,
    };
    views::render(&state, views::POST_COMMENT, &context)
}

/// Any other method on the comment route.
pub async fn method_not_allowed() -> AppResult<HttpResponse> {
    Err(AppError::MethodNotAllowed(&["POST"]))
}
