use actix_session::Session;
use actix_web::{HttpResponse, web};
use chrono::Local;
use sqlx::PgPool;

use crate::auth::session::require_user_id;
use crate::config::AppConfig;
use crate::errors::{AppError, render};
use crate::models::meeting::{self, access, id::is_meeting_id};
use crate::templates_structs::{JoinMeetingTemplate, PageContext};

/// GET /join/{meeting_id}: tell the user whether they can join today.
pub async fn join(
    pool: web::Data<PgPool>,
    config: web::Data<AppConfig>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user_id(&session)?;
    let meeting_id = path.into_inner();
    if !is_meeting_id(&meeting_id) {
        return Err(AppError::NotFound);
    }

    let record = meeting::find_by_meeting_id(&pool, &meeting_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let decision = access::evaluate(&record, user_id, Local::now().date_naive());
    log::debug!("Join check for meeting {meeting_id} by user {user_id}: {decision:?}");

    let ctx = PageContext::build(&session, &config.app_name, "/join")?;
    render(JoinMeetingTemplate {
        ctx,
        allowed: decision.is_allowed(),
        message: decision.message(),
        record,
    })
}
