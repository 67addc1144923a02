use actix_session::Session;
use actix_web::{HttpResponse, web};
use sqlx::PgPool;

use crate::audit;
use crate::auth::csrf;
use crate::auth::session::{require_user_id, set_flash};
use crate::errors::AppError;
use crate::models::meeting;

#[derive(serde::Deserialize)]
pub struct StatusForm {
    pub csrf_token: String,
    pub active: String,
}

/// POST /meetings/{meeting_id}/status: cancel or reactivate. Creator only.
pub async fn set_status(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<StatusForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let user_id = require_user_id(&session)?;
    let meeting_id = path.into_inner();

    let record = meeting::find_by_meeting_id(&pool, &meeting_id)
        .await?
        .ok_or(AppError::NotFound)?;
    if !record.is_creator(user_id) {
        return Err(AppError::PermissionDenied(format!("meeting {meeting_id} status")));
    }

    let active = form.active == "true";
    if !meeting::set_status(&pool, record.meeting.id, active).await? {
        return Err(AppError::NotFound);
    }

    let (action, message) = if active {
        ("meeting.reactivated", "Meeting reactivated.")
    } else {
        ("meeting.cancelled", "Meeting cancelled.")
    };
    let details = serde_json::json!({
        "meeting_id": &meeting_id,
        "summary": format!("{} '{}'", message.trim_end_matches('.'), record.meeting.meeting_name),
    });
    audit::log_quietly(&pool, user_id, action, "meeting", record.meeting.id, details).await;

    set_flash(&session, message);
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", "/meetings/mine"))
        .finish())
}
