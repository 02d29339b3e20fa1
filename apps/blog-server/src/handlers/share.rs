//! Share-by-email handler.

use actix_web::{HttpRequest, HttpResponse, web};
use uuid::Uuid;

use quill_core::domain::Post;
use quill_core::forms::SharePostForm;
use quill_shared::dto::{FormResponse, ShareContext};

use crate::middleware::error::AppResult;
use crate::state::AppState;
use crate::views;

/// Absolute URL of `post`, from `SITE_URL` or else the request's scheme and host.
fn absolute_url(state: &AppState, req: &HttpRequest, post: &Post) -> String {
    let path = post.absolute_path();
    match &state.site.site_url {
        Some(base) => format!("{base}{path}"),
        None => {
            let info = req.connection_info();
            format!("{}://{}{}", info.scheme(), info.host(), path)
        }
    }
}

/// GET /{post_id}/share/
pub async fn share_form(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state.queries.published_by_id(path.into_inner()).await?;

    let context = ShareContext {
        post: views::post(&post),
        form: FormResponse::unbound(SharePostForm::default()),
        sent: false,
    };
    views::render(&state, views::POST_SHARE, &context)
}

/// POST /{post_id}/share/
pub async fn share_submit(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    form: Option<web::Form<SharePostForm>>,
) -> AppResult<HttpResponse> {
    let post = state.queries.published_by_id(path.into_inner()).await?;
    let submitted = views::submitted(form);

    let (form, sent) = match submitted.clean() {
        Ok(cleaned) => {
            let url = absolute_url(&state, &req, &post);
            let message = cleaned.compose(&post, &url, &state.site.mail_from);
            state.mailer.send(&message).await?;

            tracing::info!(post_id = %post.id, "Post shared by email");
            (FormResponse::unbound(cleaned), true)
        }
        Err(errors) => (views::invalid_form(submitted, &errors), false),
    };

    let context = ShareContext {
        post: views::post(&post),
        form,
        sent,
    };
    views::render(&state, views::POST_SHARE, &context)
}
