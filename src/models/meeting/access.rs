use chrono::NaiveDate;

use super::types::MeetingRecord;

/// Outcome of a user asking to join a meeting on a given day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinDecision {
    Allowed,
    Cancelled,
    NotInvited,
    NotYet(NaiveDate),
    Ended,
    InvalidDate,
}

impl JoinDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, JoinDecision::Allowed)
    }

    pub fn message(&self) -> String {
        match self {
            JoinDecision::Allowed => "You can join this meeting now.".to_string(),
            JoinDecision::Cancelled => "Meeting has been cancelled by the organizer.".to_string(),
            JoinDecision::NotInvited => "You are not invited to the meeting.".to_string(),
            JoinDecision::NotYet(date) => format!("Meeting is on {}.", date.format("%B %-d, %Y")),
            JoinDecision::Ended => "Meeting has ended.".to_string(),
            JoinDecision::InvalidDate => "Meeting date is invalid.".to_string(),
        }
    }
}

/// Decide whether `user_id` may join `record` on `today`.
///
/// Invitation is checked before the date so that uninvited users learn
/// nothing about the schedule. The creator always counts as invited.
pub fn evaluate(record: &MeetingRecord, user_id: i64, today: NaiveDate) -> JoinDecision {
    let meeting = &record.meeting;
    if !meeting.status {
        return JoinDecision::Cancelled;
    }

    let invite_only = meeting.kind().map(|k| k.is_invite_only()).unwrap_or(true);
    if invite_only && !record.is_creator(user_id) && !record.is_invited(user_id) {
        return JoinDecision::NotInvited;
    }

    let Some(date) = meeting.date() else {
        return JoinDecision::InvalidDate;
    };
    if date > today {
        JoinDecision::NotYet(date)
    } else if date < today {
        JoinDecision::Ended
    } else {
        JoinDecision::Allowed
    }
}
