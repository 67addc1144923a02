use actix_session::Session;
use actix_web::{HttpResponse, web};
use chrono::{Local, Timelike};
use sqlx::PgPool;

use crate::audit;
use crate::auth::session::require_user_id;
use crate::config::AppConfig;
use crate::errors::{AppError, render};
use crate::models::{meeting, user};
use crate::templates_structs::{DashboardTemplate, PageContext};

fn time_greeting(hour: u32, username: &str) -> String {
    let period = match hour {
        5..=11 => "Good morning",
        12..=16 => "Good afternoon",
        _ => "Good evening",
    };
    format!("{}, {}", period, username)
}

/// GET /: home page after login and after creating a meeting.
pub async fn index(
    pool: web::Data<PgPool>,
    config: web::Data<AppConfig>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user_id(&session)?;
    let ctx = PageContext::build(&session, &config.app_name, "/")?;

    let now = Local::now();
    let today = now.date_naive();
    let display_name = match user::find_by_id(&pool, user_id).await? {
        Some(u) if !u.display_name.is_empty() => u.display_name,
        _ => ctx.username.clone(),
    };
    let greeting = time_greeting(now.hour(), &display_name);

    let created = meeting::find_created_by(&pool, user_id).await?;
    let joinable = meeting::find_for_user(&pool, user_id).await?;

    // Today's active meetings, whether created or joinable, without duplicates.
    let mut today_meetings: Vec<meeting::MeetingListItem> = Vec::new();
    for m in created.iter().chain(joinable.iter()) {
        if m.status && m.date() == Some(today) && !today_meetings.iter().any(|t| t.id == m.id) {
            today_meetings.push(m.clone());
        }
    }

    let recent_activity = audit::find_recent_for_user(&pool, user_id, 5)
        .await
        .unwrap_or_else(|e| {
            log::warn!("Dashboard: could not load recent activity for user {user_id}: {e}");
            Vec::new()
        });

    let tmpl = DashboardTemplate {
        ctx,
        greeting,
        created_count: created.len(),
        joinable_count: joinable.len(),
        today_meetings,
        recent_activity,
    };
    render(tmpl)
}
