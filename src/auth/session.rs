use actix_session::Session;

use crate::models::user::User;

pub fn get_user_id(session: &Session) -> Option<i64> {
    session.get::<i64>("user_id").unwrap_or(None)
}

/// Bind the session to the given user.
pub fn login(session: &Session, user: &User) {
    let _ = session.insert("user_id", user.id);
    let _ = session.insert("username", &user.username);
}

pub fn logout(session: &Session) {
    session.purge();
}
