use actix_session::Session;
use actix_web::{HttpResponse, web};
use sqlx::PgPool;

use crate::auth::session::require_user_id;
use crate::config::AppConfig;
use crate::errors::{AppError, render};
use crate::models::meeting;
use crate::templates_structs::{MeetingListTemplate, MyMeetingsTemplate, PageContext};

/// GET /meetings/mine: meetings the current user created.
pub async fn mine(
    pool: web::Data<PgPool>,
    config: web::Data<AppConfig>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user_id(&session)?;
    let ctx = PageContext::build(&session, &config.app_name, "/meetings/mine")?;
    let meetings = meeting::find_created_by(&pool, user_id).await?;
    render(MyMeetingsTemplate { ctx, meetings })
}

/// GET /meetings: meetings the current user can join.
pub async fn joinable(
    pool: web::Data<PgPool>,
    config: web::Data<AppConfig>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user_id(&session)?;
    let ctx = PageContext::build(&session, &config.app_name, "/meetings")?;
    let meetings = meeting::find_for_user(&pool, user_id).await?;
    render(MeetingListTemplate { ctx, meetings })
}
