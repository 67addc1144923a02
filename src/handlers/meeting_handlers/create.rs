/// Meeting creation: the type chooser and the two creation forms.
///
/// GET renders a blank form dated today. POST validates; on failure the
/// form comes back with per-field errors, on success the meeting is written,
/// a toast is queued and the user lands on the home page.

use actix_session::Session;
use actix_web::{HttpResponse, web};
use chrono::{Local, NaiveDate};
use sqlx::PgPool;

use crate::audit;
use crate::auth::csrf;
use crate::auth::session::{require_user_id, set_flash};
use crate::config::AppConfig;
use crate::errors::{AppError, render};
use crate::models::meeting::{self, MAX_OPEN_CAPACITY};
use crate::models::user;
use crate::templates_structs::{
    CreateMeetingTemplate, MeetingTypeCard, OneOnOneTemplate, PageContext, UserChoice, VideoConferenceTemplate,
};

use super::forms::{FormKind, INPUT_DATE_FORMAT, MeetingForm, MeetingFormErrors};

// ---------------------------------------------------------------------------
// GET: meeting type chooser
// ---------------------------------------------------------------------------

/// GET /create
pub async fn choose_type(
    config: web::Data<AppConfig>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let ctx = PageContext::build(&session, &config.app_name, "/create")?;
    let cards = vec![
        MeetingTypeCard {
            title: "Create 1 on 1 Meeting",
            description: "Create a personal single person meeting",
            url: "/create/one-on-one",
            icon: "/static/img/one_on_one.svg",
        },
        MeetingTypeCard {
            title: "Create Video Conference",
            description: "Invite multiple persons to the meeting.",
            url: "/create/video-conference",
            icon: "/static/img/video_conference.svg",
        },
    ];
    render(CreateMeetingTemplate { ctx, cards })
}

// ---------------------------------------------------------------------------
// One-on-one
// ---------------------------------------------------------------------------

/// GET /create/one-on-one
pub async fn one_on_one_form(
    pool: web::Data<PgPool>,
    config: web::Data<AppConfig>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let today = Local::now().date_naive();
    render_form(&pool, &config, &session, FormKind::OneOnOne, MeetingForm::blank(today), MeetingFormErrors::default(), today).await
}

/// POST /create/one-on-one
pub async fn one_on_one_submit(
    pool: web::Data<PgPool>,
    config: web::Data<AppConfig>,
    session: Session,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    submit(&pool, &config, &session, &body, FormKind::OneOnOne).await
}

// ---------------------------------------------------------------------------
// Video conference (optionally anyone-can-join)
// ---------------------------------------------------------------------------

/// GET /create/video-conference
pub async fn video_conference_form(
    pool: web::Data<PgPool>,
    config: web::Data<AppConfig>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let today = Local::now().date_naive();
    render_form(&pool, &config, &session, FormKind::VideoConference, MeetingForm::blank(today), MeetingFormErrors::default(), today).await
}

/// POST /create/video-conference
pub async fn video_conference_submit(
    pool: web::Data<PgPool>,
    config: web::Data<AppConfig>,
    session: Session,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    submit(&pool, &config, &session, &body, FormKind::VideoConference).await
}

// ---------------------------------------------------------------------------
// Shared
// ---------------------------------------------------------------------------

async fn submit(
    pool: &PgPool,
    config: &AppConfig,
    session: &Session,
    body: &[u8],
    kind: FormKind,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user_id(session)?;

    let Ok(mut form) = MeetingForm::parse(body) else {
        return Ok(HttpResponse::BadRequest().body("Malformed form data"));
    };
    csrf::validate_csrf(session, &form.csrf_token)?;

    // Invitees must be real users; anything else is silently dropped.
    let known = user::find_existing_ids(pool, &form.invited_users).await?;
    form.invited_users.retain(|id| known.contains(id));

    let today = Local::now().date_naive();
    let new = match form.to_new_meeting(kind, user_id, meeting::generate_meeting_id(), today) {
        Ok(new) => new,
        Err(errors) => return render_form(pool, config, session, kind, form, errors, today).await,
    };

    let created = meeting::create(pool, &new).await?;
    log::info!(
        "User {} created {} meeting '{}' ({})",
        user_id, new.meeting_type, new.meeting_name, created.meeting_id
    );

    let details = serde_json::json!({
        "meeting_id": &created.meeting_id,
        "meeting_type": new.meeting_type.as_str(),
        "meeting_date": meeting::format_meeting_date(new.meeting_date),
        "invited_users": &new.invited_users,
        "max_users": new.max_users,
        "summary": format!("Created {} '{}'", new.meeting_type.label(), new.meeting_name),
    });
    audit::log_quietly(pool, user_id, "meeting.created", "meeting", created.id, details).await;

    set_flash(session, kind.success_toast(form.anyone_can_join));
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", "/"))
        .finish())
}

async fn render_form(
    pool: &PgPool,
    config: &AppConfig,
    session: &Session,
    kind: FormKind,
    form: MeetingForm,
    errors: MeetingFormErrors,
    today: NaiveDate,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user_id(session)?;
    let others = user::find_others(pool, user_id).await?;
    let users = UserChoice::list(&others, &form);
    let min_date = today.format(INPUT_DATE_FORMAT).to_string();
    let ctx = PageContext::build(session, &config.app_name, "/create")?;

    match kind {
        FormKind::OneOnOne => render(OneOnOneTemplate { ctx, form, errors, users, min_date }),
        FormKind::VideoConference => render(VideoConferenceTemplate {
            ctx,
            form,
            errors,
            users,
            min_date,
            max_capacity: MAX_OPEN_CAPACITY,
        }),
    }
}
