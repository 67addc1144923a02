// Template context structures for Askama templates, organized by page area.

use actix_session::Session;

use crate::auth::csrf;
use crate::auth::session::{get_username, take_flash};
use crate::errors::AppError;

mod common;
mod dashboard;
mod meeting;

pub use self::common::{LoginTemplate, NotFoundTemplate};
pub use self::dashboard::DashboardTemplate;
pub use self::meeting::{
    CreateMeetingTemplate, JoinMeetingTemplate, MeetingListTemplate, MeetingTypeCard, MyMeetingsTemplate,
    OneOnOneTemplate, UserChoice, VideoConferenceTemplate,
};

/// Header navigation entry.
pub struct NavItem {
    pub label: &'static str,
    pub url: &'static str,
    pub is_active: bool,
}

const NAV: [(&str, &str); 4] = [
    ("Home", "/"),
    ("Create Meeting", "/create"),
    ("My Meetings", "/meetings/mine"),
    ("Meetings", "/meetings"),
];

fn navigation(current_path: &str) -> Vec<NavItem> {
    // The longest matching prefix wins, so /meetings/mine doesn't also light up /meetings.
    let active = NAV
        .iter()
        .filter(|(_, url)| {
            if *url == "/" {
                current_path == "/"
            } else {
                current_path == *url || current_path.starts_with(&format!("{url}/"))
            }
        })
        .max_by_key(|(_, url)| url.len())
        .map(|(_, url)| *url);

    NAV.iter()
        .map(|&(label, url)| NavItem { label, url, is_active: Some(url) == active })
        .collect()
}

/// Common context shared by all authenticated pages.
/// Templates access these as `ctx.username`, `ctx.flash`, etc.
pub struct PageContext {
    pub username: String,
    pub avatar_initial: String,
    pub flash: Option<String>,
    pub nav: Vec<NavItem>,
    pub app_name: String,
    pub csrf_token: String,
}

impl PageContext {
    pub fn build(session: &Session, app_name: &str, current_path: &str) -> Result<Self, AppError> {
        let username = get_username(session)
            .map_err(|e| AppError::Session(format!("Failed to get username: {}", e)))?;
        let flash = take_flash(session);
        let csrf_token = csrf::get_or_create_token(session);
        let avatar_initial = username.chars().next().unwrap_or('?').to_uppercase().to_string();
        Ok(Self {
            username,
            avatar_initial,
            flash,
            nav: navigation(current_path),
            app_name: app_name.to_string(),
            csrf_token,
        })
    }
}
