//! End-to-end HTTP tests: login, meeting creation, toasts, and access control.
//!
//! Each test drives an in-process app with the real routes, a cookie
//! session, and a fresh database from `#[sqlx::test]`.

mod common;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use chrono::Local;
use regex::Regex;
use sqlx::PgPool;

use rendezvous::auth::rate_limit::RateLimiter;
use rendezvous::handlers;
use rendezvous::models::meeting;
use common::*;

macro_rules! test_app {
    ($pool:expr) => {{
        let config = test_config();
        test::init_service(
            App::new()
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), config.session_key.clone())
                        .cookie_secure(false)
                        .build(),
                )
                .app_data(web::Data::new($pool.clone()))
                .app_data(web::Data::new(config))
                .app_data(web::Data::new(RateLimiter::default()))
                .configure(handlers::configure)
                .default_service(web::to(handlers::not_found)),
        )
        .await
    }};
}

/// Sign in through the login form. Evaluates to `(session_cookie, csrf_token)`.
macro_rules! login {
    ($app:expr, $username:expr) => {{
        let resp = test::call_service(&$app, test::TestRequest::get().uri("/login").to_request()).await;
        let cookie = session_cookie(&resp).expect("session cookie");
        let html = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        let token = extract_csrf_token(&html);

        let req = test::TestRequest::post()
            .uri("/login")
            .cookie(cookie)
            .set_form([("username", $username), ("password", TEST_PASSWORD), ("csrf_token", token.as_str()), ("next", "/")])
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "login as {} failed", $username);
        (session_cookie(&resp).expect("renewed session cookie"), token)
    }};
}

// ============================================================================
// HELPERS
// ============================================================================

fn owned_meeting(created_by: i64, invitee: i64) -> meeting::NewMeeting {
    meeting::NewMeeting {
        created_by,
        meeting_id: "Owned001".to_string(),
        meeting_name: "Roadmap review".to_string(),
        meeting_type: meeting::MeetingType::VideoConference,
        invited_users: vec![invitee],
        meeting_date: Local::now().date_naive(),
        max_users: 1,
        status: true,
    }
}

fn extract_csrf_token(html: &str) -> String {
    let re = Regex::new(r#"name="csrf_token" value="([^"]+)""#).expect("Failed to compile regex");
    re.captures(html)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
        .expect("CSRF token not found in HTML")
}

fn session_cookie<B>(resp: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|c| c.name() == "id")
        .map(|c| c.into_owned())
}

fn location<B>(resp: &ServiceResponse<B>) -> String {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

fn today_input() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

// ============================================================================
// TESTS
// ============================================================================

#[sqlx::test(migrations = "./migrations")]
async fn test_protected_pages_redirect_to_login(pool: PgPool) {
    let app = test_app!(pool);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/meetings/mine").to_request()).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login?next=%2Fmeetings%2Fmine");

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(location(&resp), "/login");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_wrong_password_rerenders_login(pool: PgPool) {
    seed_three_users(&pool).await;
    let app = test_app!(pool);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/login").to_request()).await;
    let cookie = session_cookie(&resp).expect("session cookie");
    let html = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    let token = extract_csrf_token(&html);

    let req = test::TestRequest::post()
        .uri("/login")
        .cookie(cookie)
        .set_form([("username", "alice"), ("password", "nope"), ("csrf_token", token.as_str()), ("next", "/")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(html.contains("Invalid username or password"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_one_on_one_end_to_end(pool: PgPool) {
    let (alice, bob, charlie) = seed_three_users(&pool).await;
    let app = test_app!(pool);

    // Login page hands out a CSRF token
    let resp = test::call_service(&app, test::TestRequest::get().uri("/login").to_request()).await;
    let cookie = session_cookie(&resp).expect("session cookie");
    let html = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    let token = extract_csrf_token(&html);

    // Sign in as alice
    let req = test::TestRequest::post()
        .uri("/login")
        .cookie(cookie)
        .set_form([("username", "alice"), ("password", TEST_PASSWORD), ("csrf_token", token.as_str()), ("next", "/")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");
    let cookie = session_cookie(&resp).expect("renewed session cookie");

    // The form offers everyone but alice
    let req = test::TestRequest::get().uri("/create/one-on-one").cookie(cookie.clone()).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(html.contains(&format!("value=\"{bob}\"")));
    assert!(html.contains(&format!("value=\"{charlie}\"")));
    assert!(!html.contains(&format!("value=\"{alice}\"")));
    let token = extract_csrf_token(&html);

    // Submit
    let body = format!(
        "csrf_token={token}&meeting_name=Coffee+chat&invited_users={bob}&meeting_date={}",
        today_input()
    );
    let req = test::TestRequest::post()
        .uri("/create/one-on-one")
        .cookie(cookie)
        .insert_header(header::ContentType::form_url_encoded())
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");
    let cookie = session_cookie(&resp).expect("session cookie with toast");

    // The record landed
    let mine = meeting::find_created_by(&pool, alice).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].meeting_name, "Coffee chat");
    assert_eq!(mine[0].meeting_type, "1-on-1");
    assert_eq!(mine[0].max_users, 1);
    assert_eq!(mine[0].invited_count, 1);
    assert!(mine[0].status);

    // Home page shows the toast once
    let req = test::TestRequest::get().uri("/").cookie(cookie).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(html.contains("One on One meeting created Successfully!"));
    assert!(html.contains("Coffee chat"));
    assert!(html.contains("Alice Andersen"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_invalid_video_conference_shows_field_errors(pool: PgPool) {
    let (alice, _, _) = seed_three_users(&pool).await;
    let app = test_app!(pool);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/login").to_request()).await;
    let cookie = session_cookie(&resp).unwrap();
    let html = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    let token = extract_csrf_token(&html);

    let req = test::TestRequest::post()
        .uri("/login")
        .cookie(cookie)
        .set_form([("username", "alice"), ("password", TEST_PASSWORD), ("csrf_token", token.as_str()), ("next", "/")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    let cookie = session_cookie(&resp).unwrap();

    let body = format!("csrf_token={token}&meeting_name=&meeting_date={}", today_input());
    let req = test::TestRequest::post()
        .uri("/create/video-conference")
        .cookie(cookie)
        .insert_header(header::ContentType::form_url_encoded())
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(html.contains("Please Enter Meeting Name"));
    assert!(html.contains("Please Select a user."));

    assert!(meeting::find_created_by(&pool, alice).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_without_csrf_is_forbidden(pool: PgPool) {
    let (alice, bob, _) = seed_three_users(&pool).await;
    let app = test_app!(pool);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/login").to_request()).await;
    let cookie = session_cookie(&resp).unwrap();
    let html = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    let token = extract_csrf_token(&html);

    let req = test::TestRequest::post()
        .uri("/login")
        .cookie(cookie)
        .set_form([("username", "alice"), ("password", TEST_PASSWORD), ("csrf_token", token.as_str()), ("next", "/")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    let cookie = session_cookie(&resp).unwrap();

    let body = format!("csrf_token=forged&meeting_name=Sneaky&invited_users={bob}&meeting_date={}", today_input());
    let req = test::TestRequest::post()
        .uri("/create/one-on-one")
        .cookie(cookie)
        .insert_header(header::ContentType::form_url_encoded())
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert!(meeting::find_created_by(&pool, alice).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_join_page_refuses_uninvited_user(pool: PgPool) {
    let (alice, bob, _) = seed_three_users(&pool).await;
    let created = meeting::create(
        &pool,
        &meeting::NewMeeting {
            created_by: alice,
            meeting_id: "Private1".to_string(),
            meeting_name: "Private chat".to_string(),
            meeting_type: meeting::MeetingType::OneOnOne,
            invited_users: vec![bob],
            meeting_date: Local::now().date_naive(),
            max_users: 1,
            status: true,
        },
    )
    .await
    .unwrap();
    let app = test_app!(pool);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/login").to_request()).await;
    let cookie = session_cookie(&resp).unwrap();
    let html = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    let token = extract_csrf_token(&html);

    let req = test::TestRequest::post()
        .uri("/login")
        .cookie(cookie)
        .set_form([("username", "charlie"), ("password", TEST_PASSWORD), ("csrf_token", token.as_str()), ("next", "/")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    let cookie = session_cookie(&resp).unwrap();

    let req = test::TestRequest::get().uri(&format!("/join/{}", created.meeting_id)).cookie(cookie.clone()).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(html.contains("You are not invited to the meeting."));

    let req = test::TestRequest::get().uri("/join/Nope0000").cookie(cookie).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_video_conference_and_open_meeting(pool: PgPool) {
    let (alice, bob, charlie) = seed_three_users(&pool).await;
    let app = test_app!(pool);
    let (cookie, token) = login!(app, "alice");

    // Invite-only video conference
    let body = format!(
        "csrf_token={token}&meeting_name=Standup&invited_users={bob}&invited_users={charlie}&meeting_date={}",
        today_input()
    );
    let req = test::TestRequest::post()
        .uri("/create/video-conference")
        .cookie(cookie)
        .insert_header(header::ContentType::form_url_encoded())
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");
    let cookie = session_cookie(&resp).unwrap();

    let req = test::TestRequest::get().uri("/").cookie(cookie.clone()).to_request();
    let resp = test::call_service(&app, req).await;
    let cookie = session_cookie(&resp).unwrap_or(cookie);
    let html = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(html.contains("Video Conference created successfully!"));

    // Anyone can join
    let body = format!(
        "csrf_token={token}&meeting_name=Town+hall&anyone_can_join=on&max_users=20&meeting_date={}",
        today_input()
    );
    let req = test::TestRequest::post()
        .uri("/create/video-conference")
        .cookie(cookie)
        .insert_header(header::ContentType::form_url_encoded())
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let cookie = session_cookie(&resp).unwrap();

    let req = test::TestRequest::get().uri("/").cookie(cookie).to_request();
    let resp = test::call_service(&app, req).await;
    let html = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(html.contains("Anyone can join meeting created successfully!"));

    // Newest first
    let mine = meeting::find_created_by(&pool, alice).await.unwrap();
    assert_eq!(mine.len(), 2);

    assert_eq!(mine[0].meeting_name, "Town hall");
    assert_eq!(mine[0].meeting_type, "anyone-can-join");
    assert_eq!(mine[0].max_users, meeting::MAX_OPEN_CAPACITY);
    assert_eq!(mine[0].invited_count, 0);

    assert_eq!(mine[1].meeting_name, "Standup");
    assert_eq!(mine[1].meeting_type, "video-conference");
    assert_eq!(mine[1].max_users, 2);
    assert_eq!(mine[1].invited_count, 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_only_creator_may_change_status(pool: PgPool) {
    let (alice, bob, _) = seed_three_users(&pool).await;
    let created = meeting::create(&pool, &owned_meeting(alice, bob)).await.unwrap();
    let app = test_app!(pool);
    let (cookie, token) = login!(app, "bob");

    let req = test::TestRequest::post()
        .uri(&format!("/meetings/{}/status", created.meeting_id))
        .cookie(cookie)
        .set_form([("csrf_token", token.as_str()), ("active", "false")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let record = meeting::find_by_meeting_id(&pool, &created.meeting_id).await.unwrap().unwrap();
    assert!(record.meeting.status);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_creator_cancels_and_reactivates(pool: PgPool) {
    let (alice, bob, _) = seed_three_users(&pool).await;
    let created = meeting::create(&pool, &owned_meeting(alice, bob)).await.unwrap();
    let app = test_app!(pool);
    let (cookie, token) = login!(app, "alice");
    let status_uri = format!("/meetings/{}/status", created.meeting_id);

    // Cancel
    let req = test::TestRequest::post()
        .uri(&status_uri)
        .cookie(cookie)
        .set_form([("csrf_token", token.as_str()), ("active", "false")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/meetings/mine");
    let cookie = session_cookie(&resp).unwrap();

    let record = meeting::find_by_meeting_id(&pool, &created.meeting_id).await.unwrap().unwrap();
    assert!(!record.meeting.status);

    let req = test::TestRequest::get().uri("/meetings/mine").cookie(cookie.clone()).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = session_cookie(&resp).unwrap_or(cookie);
    let html = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(html.contains("Meeting cancelled."));
    assert!(html.contains("Cancelled"));

    // The invitee no longer sees it
    assert!(meeting::find_for_user(&pool, bob).await.unwrap().is_empty());

    // Reactivate
    let req = test::TestRequest::post()
        .uri(&status_uri)
        .cookie(cookie)
        .set_form([("csrf_token", token.as_str()), ("active", "true")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/meetings/mine");

    let record = meeting::find_by_meeting_id(&pool, &created.meeting_id).await.unwrap().unwrap();
    assert!(record.meeting.status);
    assert_eq!(meeting::find_for_user(&pool, bob).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_dashboard_survives_missing_activity_feed(pool: PgPool) {
    seed_three_users(&pool).await;
    let app = test_app!(pool);
    let (cookie, _) = login!(app, "alice");

    sqlx::query("DROP TABLE audit_log").execute(&pool).await.unwrap();

    let req = test::TestRequest::get().uri("/").cookie(cookie).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(html.contains("Alice Andersen"));
}
