use chrono::NaiveDate;
use std::fmt;

/// Stored date format of a meeting record (e.g. `03/14/2026`).
pub const MEETING_DATE_FORMAT: &str = "%m/%d/%Y";

/// Capacity of a one-on-one meeting.
pub const ONE_ON_ONE_CAPACITY: i64 = 1;

/// Upper bound for the capacity of an anyone-can-join meeting.
pub const MAX_OPEN_CAPACITY: i64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeetingType {
    OneOnOne,
    VideoConference,
    AnyoneCanJoin,
}

impl MeetingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingType::OneOnOne => "1-on-1",
            MeetingType::VideoConference => "video-conference",
            MeetingType::AnyoneCanJoin => "anyone-can-join",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "1-on-1" => Some(MeetingType::OneOnOne),
            "video-conference" => Some(MeetingType::VideoConference),
            "anyone-can-join" => Some(MeetingType::AnyoneCanJoin),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MeetingType::OneOnOne => "One on One",
            MeetingType::VideoConference => "Video Conference",
            MeetingType::AnyoneCanJoin => "Anyone Can Join",
        }
    }

    /// Whether only invited users (and the creator) may join.
    pub fn is_invite_only(&self) -> bool {
        !matches!(self, MeetingType::AnyoneCanJoin)
    }
}

impl fmt::Display for MeetingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn format_meeting_date(date: NaiveDate) -> String {
    date.format(MEETING_DATE_FORMAT).to_string()
}

pub fn parse_meeting_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, MEETING_DATE_FORMAT).ok()
}

/// A meeting record ready to be written.
#[derive(Debug, Clone)]
pub struct NewMeeting {
    pub created_by: i64,
    pub meeting_id: String,
    pub meeting_name: String,
    pub meeting_type: MeetingType,
    pub invited_users: Vec<i64>,
    pub meeting_date: NaiveDate,
    pub max_users: i64,
    pub status: bool,
}

/// Identifiers of a freshly written meeting. `meeting_id` can differ from
/// the one requested when it collided with an existing record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedMeeting {
    pub id: i64,
    pub meeting_id: String,
}

/// For meeting lists.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MeetingListItem {
    pub id: i64,
    pub meeting_id: String,
    pub meeting_name: String,
    pub meeting_type: String,
    pub meeting_date: String,
    pub max_users: i64,
    pub status: bool,
    pub created_by: i64,
    pub creator_name: String,
    pub invited_count: i64,
}

impl MeetingListItem {
    pub fn kind(&self) -> Option<MeetingType> {
        MeetingType::parse(&self.meeting_type)
    }

    pub fn type_label(&self) -> &'static str {
        self.kind().map(|k| k.label()).unwrap_or("Unknown")
    }

    pub fn date(&self) -> Option<NaiveDate> {
        parse_meeting_date(&self.meeting_date)
    }
}

/// A full meeting record, including who is invited.
#[derive(Debug, Clone)]
pub struct MeetingRecord {
    pub meeting: MeetingListItem,
    pub invited_users: Vec<i64>,
}

impl MeetingRecord {
    pub fn is_invited(&self, user_id: i64) -> bool {
        self.invited_users.contains(&user_id)
    }

    pub fn is_creator(&self, user_id: i64) -> bool {
        self.meeting.created_by == user_id
    }
}
