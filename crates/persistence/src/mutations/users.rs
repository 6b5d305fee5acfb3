// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User and session mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use folio_domain::{Profile, timestamp_now};
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::data_models::{NewUser, SessionData, UserData, format_timestamp};
use crate::diesel_schema::{profiles, sessions, users};
use crate::error::PersistenceError;
use crate::queries::profiles::get_profile_by_user;
use crate::queries::users::{get_session_by_token, get_user_by_id};

/// Creates a user account and its empty profile in one transaction.
///
/// The password is hashed with bcrypt at `hash_cost` before it is stored.
///
/// # Errors
///
/// Returns [`PersistenceError::UniqueViolation`] if the username or email is
/// taken, or another error if hashing or an insert fails. Nothing is kept on
/// failure.
pub fn create_user(
    conn: &mut SqliteConnection,
    new_user: NewUser<'_>,
    hash_cost: u32,
) -> Result<(UserData, Profile), PersistenceError> {
    info!(
        username = new_user.username,
        role = new_user.role,
        "Creating user"
    );

    let password_hash: String = bcrypt::hash(new_user.password, hash_cost)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash password: {e}")))?;
    let now: String = format_timestamp(timestamp_now())?;

    conn.transaction::<_, PersistenceError, _>(|tx| {
        diesel::insert_into(users::table)
            .values((
                users::username.eq(new_user.username),
                users::email.eq(new_user.email),
                users::display_name.eq(new_user.display_name),
                users::password_hash.eq(&password_hash),
                users::role.eq(new_user.role),
                users::created_at.eq(&now),
                users::updated_at.eq(&now),
            ))
            .execute(tx)?;
        let user_id: i64 = tx.get_last_insert_rowid()?;

        diesel::insert_into(profiles::table)
            .values((
                profiles::user_id.eq(user_id),
                profiles::created_at.eq(&now),
                profiles::updated_at.eq(&now),
            ))
            .execute(tx)?;

        let user: UserData = get_user_by_id(tx, user_id)?
            .ok_or_else(|| PersistenceError::NotFound(format!("User {user_id}")))?;
        let profile: Profile = get_profile_by_user(tx, user_id)?;

        info!(user_id, profile_id = profile.profile_id, "Created user");
        Ok((user, profile))
    })
}

/// Records a successful login.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_last_login(conn: &mut SqliteConnection, user_id: i64) -> Result<(), PersistenceError> {
    debug!(user_id, "Updating last_login_at");

    diesel::update(users::table)
        .filter(users::user_id.eq(user_id))
        .set(users::last_login_at.eq(Some(format_timestamp(timestamp_now())?)))
        .execute(conn)?;

    Ok(())
}

/// Stores a new session.
///
/// # Errors
///
/// Returns an error if the insert fails, including a token collision.
pub fn create_session(
    conn: &mut SqliteConnection,
    session_token: &str,
    user_id: i64,
    expires_at: OffsetDateTime,
) -> Result<SessionData, PersistenceError> {
    let now: String = format_timestamp(timestamp_now())?;

    diesel::insert_into(sessions::table)
        .values((
            sessions::session_token.eq(session_token),
            sessions::user_id.eq(user_id),
            sessions::created_at.eq(&now),
            sessions::last_activity_at.eq(&now),
            sessions::expires_at.eq(format_timestamp(expires_at)?),
        ))
        .execute(conn)?;

    info!(user_id, "Created session");

    get_session_by_token(conn, session_token)?
        .ok_or_else(|| PersistenceError::NotFound(String::from("Session")))
}

/// Refreshes a session's activity timestamp.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_session_activity(
    conn: &mut SqliteConnection,
    session_id: i64,
) -> Result<(), PersistenceError> {
    diesel::update(sessions::table)
        .filter(sessions::session_id.eq(session_id))
        .set(sessions::last_activity_at.eq(format_timestamp(timestamp_now())?))
        .execute(conn)?;

    Ok(())
}

/// Deletes a session by token.
///
/// Returns whether a session was removed.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_session(
    conn: &mut SqliteConnection,
    session_token: &str,
) -> Result<bool, PersistenceError> {
    let rows_affected: usize = diesel::delete(sessions::table)
        .filter(sessions::session_token.eq(session_token))
        .execute(conn)?;

    debug!(rows_affected, "Deleted session");
    Ok(rows_affected > 0)
}

/// Deletes every session whose expiry lies before `now`.
///
/// Expiry timestamps are stored in UTC RFC 3339 form, so text comparison
/// orders them correctly.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_expired_sessions(
    conn: &mut SqliteConnection,
    now: OffsetDateTime,
) -> Result<usize, PersistenceError> {
    let cutoff: String = format_timestamp(now)?;

    let rows_affected: usize = diesel::delete(sessions::table)
        .filter(sessions::expires_at.lt(&cutoff))
        .execute(conn)?;

    if rows_affected > 0 {
        info!(rows_affected, "Deleted expired sessions");
    }
    Ok(rows_affected)
}
