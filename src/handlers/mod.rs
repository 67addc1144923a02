use actix_web::{HttpResponse, web};

use crate::auth;
use crate::config::AppConfig;
use crate::errors::AppError;
use crate::templates_structs::NotFoundTemplate;

pub mod auth_handlers;
pub mod dashboard;
pub mod meeting_handlers;

/// Register every application route. Shared by the server and the tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        // Public routes
        .route("/login", web::get().to(auth_handlers::login_page))
        .route("/login", web::post().to(auth_handlers::login_submit))
        // Protected routes
        .service(
            web::scope("")
                .wrap(actix_web::middleware::from_fn(auth::middleware::require_auth))
                .route("/", web::get().to(dashboard::index))
                .route("/logout", web::post().to(auth_handlers::logout))
                // Meeting creation
                .route("/create", web::get().to(meeting_handlers::choose_type))
                .route("/create/one-on-one", web::get().to(meeting_handlers::one_on_one_form))
                .route("/create/one-on-one", web::post().to(meeting_handlers::one_on_one_submit))
                .route("/create/video-conference", web::get().to(meeting_handlers::video_conference_form))
                .route("/create/video-conference", web::post().to(meeting_handlers::video_conference_submit))
                // Lists, /meetings/mine before /meetings/{meeting_id}/status
                .route("/meetings", web::get().to(meeting_handlers::joinable))
                .route("/meetings/mine", web::get().to(meeting_handlers::mine))
                .route("/meetings/{meeting_id}/status", web::post().to(meeting_handlers::set_status))
                // Join check
                .route("/join/{meeting_id}", web::get().to(meeting_handlers::join)),
        );
}

/// Default 404 page.
pub async fn not_found(config: web::Data<AppConfig>) -> Result<HttpResponse, AppError> {
    let html = askama::Template::render(&NotFoundTemplate { app_name: config.app_name.clone() })?;
    Ok(HttpResponse::NotFound()
        .content_type("text/html; charset=utf-8")
        .body(html))
}
