use askama::Template;

use crate::handlers::meeting_handlers::forms::{MeetingForm, MeetingFormErrors};
use crate::models::meeting::{MeetingListItem, MeetingRecord};
use crate::models::user::UserOption;
use super::PageContext;

/// A card on the meeting-type chooser.
pub struct MeetingTypeCard {
    pub title: &'static str,
    pub description: &'static str,
    pub url: &'static str,
    pub icon: &'static str,
}

/// An option in the invite picker, with its selection state.
pub struct UserChoice {
    pub id: i64,
    pub label: String,
    pub selected: bool,
}

impl UserChoice {
    pub fn list(users: &[UserOption], form: &MeetingForm) -> Vec<UserChoice> {
        users
            .iter()
            .map(|u| UserChoice {
                id: u.id,
                label: u.label.clone(),
                selected: form.invited_users.contains(&u.id),
            })
            .collect()
    }
}

#[derive(Template)]
#[template(path = "meetings/create.html")]
pub struct CreateMeetingTemplate {
    pub ctx: PageContext,
    pub cards: Vec<MeetingTypeCard>,
}

#[derive(Template)]
#[template(path = "meetings/one_on_one.html")]
pub struct OneOnOneTemplate {
    pub ctx: PageContext,
    pub form: MeetingForm,
    pub errors: MeetingFormErrors,
    pub users: Vec<UserChoice>,
    pub min_date: String,
}

#[derive(Template)]
#[template(path = "meetings/video_conference.html")]
pub struct VideoConferenceTemplate {
    pub ctx: PageContext,
    pub form: MeetingForm,
    pub errors: MeetingFormErrors,
    pub users: Vec<UserChoice>,
    pub min_date: String,
    pub max_capacity: i64,
}

#[derive(Template)]
#[template(path = "meetings/mine.html")]
pub struct MyMeetingsTemplate {
    pub ctx: PageContext,
    pub meetings: Vec<MeetingListItem>,
}

#[derive(Template)]
#[template(path = "meetings/list.html")]
pub struct MeetingListTemplate {
    pub ctx: PageContext,
    pub meetings: Vec<MeetingListItem>,
}

#[derive(Template)]
#[template(path = "meetings/join.html")]
pub struct JoinMeetingTemplate {
    pub ctx: PageContext,
    pub record: MeetingRecord,
    pub allowed: bool,
    pub message: String,
}
