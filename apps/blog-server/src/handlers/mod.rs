//! HTTP handlers and route configuration.

mod comments;
mod health;
mod posts;
mod share;


use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .route("/", web::get().to(posts::post_list))
        .route("/tag/{tag_slug}/", web::get().to(posts::post_list_by_tag))
        .route(
            "/{year}/{month}/{day}/{slug}/",
            web::get().to(posts::post_detail),
        )
        .service(
            web::resource("/{post_id}/share/")
                .route(web::get().to(share::share_form))
                .route(web::post().to(share::share_submit)),
        )
        .service(
            web::resource("/{post_id}/comment/")
                .route(web::post().to(comments::post_comment))
                .default_service(web::to(comments::method_not_allowed)),
        );
}
