use askama::Template;

use crate::audit::AuditEntry;
use crate::models::meeting::MeetingListItem;
use super::PageContext;

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub ctx: PageContext,
    pub greeting: String,
    pub created_count: usize,
    pub joinable_count: usize,
    pub today_meetings: Vec<MeetingListItem>,
    pub recent_activity: Vec<AuditEntry>,
}
