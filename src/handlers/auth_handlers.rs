use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::middleware::safe_next;
use crate::auth::session::{get_user_id, set_flash, sign_in};
use crate::auth::{csrf, password, rate_limit::RateLimiter};
use crate::config::AppConfig;
use crate::errors::{AppError, render};
use crate::models::user;
use crate::templates_structs::LoginTemplate;

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub csrf_token: String,
    #[serde(default)]
    pub next: String,
}

#[derive(Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

#[derive(Deserialize)]
pub struct CsrfOnly {
    pub csrf_token: String,
}

fn login_template(session: &Session, config: &AppConfig, error: Option<&str>, username: &str, next: &str) -> LoginTemplate {
    LoginTemplate {
        error: error.map(String::from),
        app_name: config.app_name.clone(),
        csrf_token: csrf::get_or_create_token(session),
        username: username.to_string(),
        next: safe_next(Some(next)).to_string(),
    }
}

pub async fn login_page(
    config: web::Data<AppConfig>,
    session: Session,
    query: web::Query<NextQuery>,
) -> Result<HttpResponse, AppError> {
    // Already logged in
    if get_user_id(&session).is_some() {
        return Ok(HttpResponse::SeeOther()
            .insert_header(("Location", "/"))
            .finish());
    }

    let next = query.next.as_deref().unwrap_or("/");
    render(login_template(&session, &config, None, "", next))
}

pub async fn login_submit(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    config: web::Data<AppConfig>,
    session: Session,
    form: web::Form<LoginForm>,
    limiter: web::Data<RateLimiter>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    // Rate-limit check BEFORE any database access
    let ip = req.peer_addr()
        .map(|addr| addr.ip())
        .unwrap_or(std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED));

    if limiter.is_blocked(ip) {
        log::warn!("Login blocked for {ip}: too many failed attempts");
        let tmpl = login_template(
            &session,
            &config,
            Some("Too many failed login attempts. Please try again later."),
            &form.username,
            &form.next,
        );
        return render(tmpl);
    }

    let found = user::find_by_username(&pool, form.username.trim()).await?;
    let verified = match &found {
        Some(u) => password::verify_password(&form.password, &u.password).unwrap_or_else(|e| {
            log::error!("Stored password hash for '{}' is unreadable: {e}", u.username);
            false
        }),
        None => false,
    };

    match found {
        Some(u) if verified => {
            limiter.clear(ip);
            sign_in(&session, &u)?;
            log::info!("User '{}' signed in", u.username);
            let name = if u.display_name.is_empty() { &u.username } else { &u.display_name };
            set_flash(&session, format!("Welcome back, {name}!"));
            Ok(HttpResponse::SeeOther()
                .insert_header(("Location", safe_next(Some(&form.next))))
                .finish())
        }
        _ => {
            limiter.record_failure(ip);
            let tmpl = login_template(
                &session,
                &config,
                Some("Invalid username or password"),
                &form.username,
                &form.next,
            );
            render(tmpl)
        }
    }
}

pub async fn logout(
    session: Session,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    session.purge();
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", "/login"))
        .finish())
}
