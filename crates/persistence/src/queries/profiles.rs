// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use folio_domain::Profile;
use tracing::debug;

use crate::data_models::ProfileRow;
use crate::diesel_schema::{profiles, users};
use crate::error::PersistenceError;

type ProfileJoin = (ProfileRow, String, String);

fn into_profile((row, username, display_name): ProfileJoin) -> Result<Profile, PersistenceError> {
    row.into_domain(username, display_name)
}

/// Retrieves a profile by ID.
///
/// # Errors
///
/// Returns [`PersistenceError::NotFound`] if the profile does not exist.
pub fn get_profile(
    conn: &mut SqliteConnection,
    profile_id: i64,
) -> Result<Profile, PersistenceError> {
    debug!(profile_id, "Fetching profile");

    profiles::table
        .inner_join(users::table)
        .filter(profiles::profile_id.eq(profile_id))
        .select((ProfileRow::as_select(), users::username, users::display_name))
        .first::<ProfileJoin>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("Profile {profile_id}")))
        .and_then(into_profile)
}

/// Retrieves the profile owned by a user.
///
/// # Errors
///
/// Returns [`PersistenceError::NotFound`] if the user has no profile.
pub fn get_profile_by_user(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Profile, PersistenceError> {
    profiles::table
        .inner_join(users::table)
        .filter(profiles::user_id.eq(user_id))
        .select((ProfileRow::as_select(), users::username, users::display_name))
        .first::<ProfileJoin>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("Profile for user {user_id}")))
        .and_then(into_profile)
}

/// Retrieves the current holder of the featured flag.
///
/// # Errors
///
/// Returns [`PersistenceError::NotFound`] when no profile is featured.
pub fn get_featured_profile(conn: &mut SqliteConnection) -> Result<Profile, PersistenceError> {
    profiles::table
        .inner_join(users::table)
        .filter(profiles::is_featured.eq(true))
        .select((ProfileRow::as_select(), users::username, users::display_name))
        .first::<ProfileJoin>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(String::from("Featured profile")))
        .and_then(into_profile)
}
