use actix_session::Session;

use crate::errors::AppError;
use crate::models::user::User;

const USER_ID: &str = "user_id";
const USERNAME: &str = "username";
const FLASH: &str = "flash";

pub fn get_user_id(session: &Session) -> Option<i64> {
    session.get::<i64>(USER_ID).unwrap_or(None)
}

/// The signed-in user's id, or a session error (which redirects to /login).
pub fn require_user_id(session: &Session) -> Result<i64, AppError> {
    get_user_id(session).ok_or_else(|| AppError::Session("Not logged in".to_string()))
}

pub fn get_username(session: &Session) -> Result<String, String> {
    match session.get::<String>(USERNAME) {
        Ok(Some(username)) => Ok(username),
        Ok(None) => Err("No username in session".to_string()),
        Err(e) => Err(format!("Session error: {}", e)),
    }
}

/// Store the authenticated identity. The session is renewed first so a
/// pre-login cookie cannot be reused.
pub fn sign_in(session: &Session, user: &User) -> Result<(), AppError> {
    session.renew();
    session
        .insert(USER_ID, user.id)
        .and_then(|_| session.insert(USERNAME, &user.username))
        .map_err(|e| AppError::Session(e.to_string()))
}

/// Queue a one-shot toast message for the next rendered page.
pub fn set_flash(session: &Session, message: impl Into<String>) {
    if let Err(e) = session.insert(FLASH, message.into()) {
        log::warn!("Could not store flash message: {e}");
    }
}

pub fn take_flash(session: &Session) -> Option<String> {
    let flash = session.get::<String>(FLASH).unwrap_or(None);
    if flash.is_some() {
        session.remove(FLASH);
    }
    flash
}
