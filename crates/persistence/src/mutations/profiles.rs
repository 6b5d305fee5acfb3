// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Profile mutations and the featured-profile swap.
//!
//! At most one profile may hold `is_featured = true` at any committed point.
//! The swap below keeps that true under normal operation; the partial
//! unique index `idx_profiles_single_featured` rejects any write that would
//! break it regardless of how the write was issued.

use diesel::SqliteConnection;
use diesel::prelude::*;
use folio_domain::{Profile, timestamp_now};
use tracing::{debug, info, warn};

use crate::data_models::format_timestamp;
use crate::diesel_schema::profiles;
use crate::error::PersistenceError;
use crate::queries::profiles::{get_featured_profile, get_profile};

/// Overwrites the editable columns of a profile.
///
/// The featured flag is left alone.
///
/// # Errors
///
/// Returns [`PersistenceError::NotFound`] if the profile does not exist.
pub fn update_profile(
    conn: &mut SqliteConnection,
    profile: &Profile,
) -> Result<Profile, PersistenceError> {
    let profile_id: i64 = profile.profile_id;

    let rows_affected: usize = diesel::update(profiles::table)
        .filter(profiles::profile_id.eq(profile_id))
        .set((
            profiles::headline.eq(&profile.headline),
            profiles::bio.eq(&profile.bio),
            profiles::location.eq(&profile.location),
            profiles::updated_at.eq(format_timestamp(timestamp_now())?),
        ))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!("Profile {profile_id}")));
    }

    info!(profile_id, "Updated profile");
    get_profile(conn, profile_id)
}

fn write_featured_flag(
    conn: &mut SqliteConnection,
    profile_id: i64,
    featured: bool,
    updated_at: &str,
) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::update(profiles::table)
        .filter(profiles::profile_id.eq(profile_id))
        .set((
            profiles::is_featured.eq(Some(featured)),
            profiles::updated_at.eq(updated_at),
        ))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!("Profile {profile_id}")));
    }
    Ok(())
}

/// Makes `profile_id` the featured profile.
///
/// With no current holder the target is updated on its own. Otherwise the
/// holder is cleared and the target set inside one transaction; if either
/// write or the commit fails, neither change is kept.
///
/// Returns the rows that changed: the target, preceded by the previous
/// holder when there was one.
///
/// # Errors
///
/// - [`PersistenceError::NotFound`] if the target does not exist.
/// - [`PersistenceError::AlreadyFeatured`] if the target already holds the
///   flag. Nothing is written.
/// - [`PersistenceError::UniqueViolation`] if another writer featured a
///   profile between the holder lookup and the single-row update.
/// - [`PersistenceError::TransactionFailed`] if the swap was rolled back.
pub fn set_featured(
    conn: &mut SqliteConnection,
    profile_id: i64,
) -> Result<Vec<Profile>, PersistenceError> {
    let target: Profile = get_profile(conn, profile_id)?;
    if target.is_featured() {
        debug!(profile_id, "Profile already featured");
        return Err(PersistenceError::AlreadyFeatured { profile_id });
    }

    let holder: Option<Profile> = match get_featured_profile(conn) {
        Ok(holder) => Some(holder),
        Err(PersistenceError::NotFound(_)) => None,
        Err(e) => return Err(e),
    };

    let now: String = format_timestamp(timestamp_now())?;

    let Some(holder) = holder else {
        write_featured_flag(conn, profile_id, true, &now)?;
        info!(profile_id, "Featured profile with no previous holder");
        return Ok(vec![get_profile(conn, profile_id)?]);
    };

    let holder_id: i64 = holder.profile_id;
    conn.transaction::<(), PersistenceError, _>(|tx| {
        write_featured_flag(tx, holder_id, false, &now)?;
        write_featured_flag(tx, profile_id, true, &now)?;
        Ok(())
    })
    .map_err(|e| {
        warn!(holder_id, profile_id, error = %e, "Featured swap rolled back");
        PersistenceError::TransactionFailed(e.to_string())
    })?;

    info!(
        previous = holder_id,
        profile_id, "Moved featured flag to new profile"
    );
    Ok(vec![
        get_profile(conn, holder_id)?,
        get_profile(conn, profile_id)?,
    ])
}
