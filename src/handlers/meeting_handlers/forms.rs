/// Form structures and validation for the meeting creation pages.
///
/// Both pages post the same fields; which ones matter depends on the page
/// (`FormKind`) and, for video conferences, the anyone-can-join switch.

use chrono::NaiveDate;

use crate::auth::validate;
use crate::models::meeting::{MAX_OPEN_CAPACITY, MeetingType, NewMeeting, ONE_ON_ONE_CAPACITY};

pub const MEETING_NAME_MAX_LEN: usize = 100;

/// Date format of the HTML date input.
pub const INPUT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Which creation page the form was posted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    OneOnOne,
    VideoConference,
}

impl FormKind {
    pub fn success_toast(&self, anyone_can_join: bool) -> &'static str {
        match (self, anyone_can_join) {
            (FormKind::OneOnOne, _) => "One on One meeting created Successfully!",
            (FormKind::VideoConference, true) => "Anyone can join meeting created successfully!",
            (FormKind::VideoConference, false) => "Video Conference created successfully!",
        }
    }
}

/// Error state of a single form field: whether to flag it, and what to say.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldError {
    pub show: bool,
    pub messages: Vec<String>,
}

impl FieldError {
    pub fn from_message(message: Option<String>) -> Self {
        match message {
            Some(m) => FieldError { show: true, messages: vec![m] },
            None => FieldError::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeetingFormErrors {
    pub meeting_name: FieldError,
    pub meeting_user: FieldError,
    pub meeting_date: FieldError,
    pub meeting_size: FieldError,
}

impl MeetingFormErrors {
    pub fn has_errors(&self) -> bool {
        self.meeting_name.show || self.meeting_user.show || self.meeting_date.show || self.meeting_size.show
    }
}

/// Submitted meeting form. Built from the raw body because the invite
/// picker repeats the `invited_users` key once per selected user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingForm {
    pub csrf_token: String,
    pub meeting_name: String,
    pub invited_users: Vec<i64>,
    pub meeting_date: String,
    pub anyone_can_join: bool,
    pub max_users: String,
}

impl MeetingForm {
    /// A blank form dated `today`, as first shown on the page.
    pub fn blank(today: NaiveDate) -> Self {
        Self {
            csrf_token: String::new(),
            meeting_name: String::new(),
            invited_users: vec![],
            meeting_date: today.format(INPUT_DATE_FORMAT).to_string(),
            anyone_can_join: false,
            max_users: "1".to_string(),
        }
    }

    pub fn parse(body: &[u8]) -> Result<Self, serde_urlencoded::de::Error> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)?;
        Ok(Self::from_pairs(&pairs))
    }

    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let field = |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
                .unwrap_or_default()
        };

        let mut invited_users: Vec<i64> = Vec::new();
        for (_, v) in pairs.iter().filter(|(k, _)| k == "invited_users") {
            if let Ok(id) = v.trim().parse::<i64>() {
                if !invited_users.contains(&id) {
                    invited_users.push(id);
                }
            }
        }

        let anyone_can_join = matches!(field("anyone_can_join").as_str(), "on" | "true" | "1");
        let max_users = field("max_users");

        Self {
            csrf_token: field("csrf_token"),
            meeting_name: field("meeting_name"),
            invited_users,
            meeting_date: field("meeting_date"),
            anyone_can_join,
            max_users: if max_users.trim().is_empty() { "1".to_string() } else { max_users },
        }
    }

    fn checks_invites(&self, kind: FormKind) -> bool {
        kind == FormKind::OneOnOne || !self.anyone_can_join
    }

    /// Run the submit-time checks. Fields that pass are cleared.
    pub fn validate(&self, kind: FormKind, today: NaiveDate) -> MeetingFormErrors {
        let mut errors = MeetingFormErrors {
            meeting_name: FieldError::from_message(validate::validate_required(
                &self.meeting_name,
                "Please Enter Meeting Name",
                MEETING_NAME_MAX_LEN,
                "Meeting name",
            )),
            meeting_date: FieldError::from_message(validate_date(&self.meeting_date, today).err()),
            ..MeetingFormErrors::default()
        };

        if self.checks_invites(kind) && self.invited_users.is_empty() {
            errors.meeting_user = FieldError::from_message(Some("Please Select a user.".to_string()));
        }

        if kind == FormKind::VideoConference && self.anyone_can_join {
            errors.meeting_size = FieldError::from_message(match self.max_users.trim().parse::<i64>() {
                Ok(n) => validate::validate_range(n, 1, MAX_OPEN_CAPACITY, "Maximum users"),
                Err(_) => Some("Maximum users must be a number".to_string()),
            });
        }

        errors
    }

    /// Validate and, when clean, build the record to write.
    ///
    /// The creator is never stored as their own invitee. A one-on-one keeps
    /// only the first selected user.
    pub fn to_new_meeting(
        &self,
        kind: FormKind,
        created_by: i64,
        meeting_id: String,
        today: NaiveDate,
    ) -> Result<NewMeeting, MeetingFormErrors> {
        let errors = self.validate(kind, today);
        if errors.has_errors() {
            return Err(errors);
        }

        let invitees: Vec<i64> = self.invited_users.iter().copied().filter(|id| *id != created_by).collect();
        if self.checks_invites(kind) && invitees.is_empty() {
            return Err(MeetingFormErrors {
                meeting_user: FieldError::from_message(Some("Please Select a user.".to_string())),
                ..errors
            });
        }

        let meeting_date = validate_date(&self.meeting_date, today).map_err(|_| errors.clone())?;

        let (meeting_type, invited_users, max_users) = match kind {
            FormKind::OneOnOne => (MeetingType::OneOnOne, invitees[..1].to_vec(), ONE_ON_ONE_CAPACITY),
            // Open meetings are stored at full capacity; the size field only has to be in range.
            FormKind::VideoConference if self.anyone_can_join => (MeetingType::AnyoneCanJoin, vec![], MAX_OPEN_CAPACITY),
            FormKind::VideoConference => {
                let count = invitees.len() as i64;
                (MeetingType::VideoConference, invitees, count)
            }
        };

        Ok(NewMeeting {
            created_by,
            meeting_id,
            meeting_name: self.meeting_name.trim().to_string(),
            meeting_type,
            invited_users,
            meeting_date,
            max_users,
            status: true,
        })
    }
}

/// Parse the date input and reject days before `today`.
pub fn validate_date(value: &str, today: NaiveDate) -> Result<NaiveDate, String> {
    let value = value.trim();
    if value.is_empty() {
        return Err("Please select a meeting date.".to_string());
    }
    let date = NaiveDate::parse_from_str(value, INPUT_DATE_FORMAT)
        .map_err(|_| "Please select a valid date.".to_string())?;
    if date < today {
        return Err("Meeting date cannot be in the past.".to_string());
    }
    Ok(date)
}
