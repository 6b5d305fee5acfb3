// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User and session queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use folio_domain::Page;
use tracing::debug;

use crate::data_models::{SessionData, SessionRow, UserData, UserRow};
use crate::diesel_schema::{sessions, users};
use crate::error::PersistenceError;

/// Retrieves a user by login name.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the user is not found.
pub fn get_user_by_username(
    conn: &mut SqliteConnection,
    username: &str,
) -> Result<Option<UserData>, PersistenceError> {
    debug!(username, "Looking up user by username");

    users::table
        .filter(users::username.eq(username))
        .select(UserRow::as_select())
        .first::<UserRow>(conn)
        .optional()?
        .map(UserRow::into_data)
        .transpose()
}

/// Retrieves a user by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the user is not found.
pub fn get_user_by_id(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Option<UserData>, PersistenceError> {
    debug!(user_id, "Looking up user by ID");

    users::table
        .filter(users::user_id.eq(user_id))
        .select(UserRow::as_select())
        .first::<UserRow>(conn)
        .optional()?
        .map(UserRow::into_data)
        .transpose()
}

/// Lists users by username.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_users(
    conn: &mut SqliteConnection,
    page: Page,
) -> Result<Vec<UserData>, PersistenceError> {
    users::table
        .select(UserRow::as_select())
        .order_by(users::username.asc())
        .offset(page.offset())
        .limit(page.limit())
        .load::<UserRow>(conn)?
        .into_iter()
        .map(UserRow::into_data)
        .collect()
}

/// Counts all user accounts.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_users(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(users::table.count().get_result(conn)?)
}

/// Retrieves a session by token.
///
/// Expiry is not checked here.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the session is not found.
pub fn get_session_by_token(
    conn: &mut SqliteConnection,
    session_token: &str,
) -> Result<Option<SessionData>, PersistenceError> {
    debug!("Looking up session by token");

    sessions::table
        .filter(sessions::session_token.eq(session_token))
        .select(SessionRow::as_select())
        .first::<SessionRow>(conn)
        .optional()?
        .map(SessionRow::into_data)
        .transpose()
}

/// Checks a plain-text password against a stored bcrypt hash.
///
/// # Errors
///
/// Returns an error if the hash is malformed.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, PersistenceError> {
    bcrypt::verify(password, password_hash)
        .map_err(|e| PersistenceError::Other(format!("Failed to verify password: {e}")))
}
