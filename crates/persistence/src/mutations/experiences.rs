// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use folio_domain::{Dependent, Experience, PredicateSet, timestamp_now};
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::data_models::{format_date, format_optional_timestamp, format_timestamp};
use crate::diesel_schema::experiences;
use crate::error::PersistenceError;
use crate::queries::experiences::get_experience;

/// Inserts a new experience entry.
///
/// The ID and timestamps of `draft` are ignored. The owning organization
/// must exist; foreign key enforcement rejects the insert otherwise.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_experience(
    conn: &mut SqliteConnection,
    draft: &Experience,
) -> Result<Dependent<Experience>, PersistenceError> {
    let now: String = format_timestamp(timestamp_now())?;

    diesel::insert_into(experiences::table)
        .values((
            experiences::organization_id.eq(draft.organization_id),
            experiences::title.eq(&draft.title),
            experiences::description.eq(&draft.description),
            experiences::location.eq(&draft.location),
            experiences::start_date.eq(format_date(draft.start_date)?),
            experiences::end_date.eq(draft.end_date.map(format_date).transpose()?),
            experiences::created_at.eq(&now),
            experiences::updated_at.eq(&now),
            experiences::deleted_at.eq(format_optional_timestamp(draft.deleted_at)?),
        ))
        .execute(conn)?;

    let experience_id: i64 = conn.get_last_insert_rowid()?;
    info!(
        experience_id,
        organization_id = draft.organization_id,
        "Created experience"
    );

    get_experience(conn, experience_id, &PredicateSet::unrestricted())
}

/// Overwrites the mutable columns of an experience entry, including its
/// organization and deletion timestamp.
///
/// # Errors
///
/// Returns [`PersistenceError::NotFound`] if the entry does not exist.
pub fn update_experience(
    conn: &mut SqliteConnection,
    experience: &Experience,
) -> Result<Dependent<Experience>, PersistenceError> {
    let experience_id: i64 = experience.experience_id;

    let rows_affected: usize = diesel::update(experiences::table)
        .filter(experiences::experience_id.eq(experience_id))
        .set((
            experiences::organization_id.eq(experience.organization_id),
            experiences::title.eq(&experience.title),
            experiences::description.eq(&experience.description),
            experiences::location.eq(&experience.location),
            experiences::start_date.eq(format_date(experience.start_date)?),
            experiences::end_date.eq(experience.end_date.map(format_date).transpose()?),
            experiences::updated_at.eq(format_timestamp(timestamp_now())?),
            experiences::deleted_at.eq(format_optional_timestamp(experience.deleted_at)?),
        ))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Experience {experience_id}"
        )));
    }

    info!(
        experience_id,
        organization_id = experience.organization_id,
        trashed = experience.deleted_at.is_some(),
        "Updated experience"
    );
    get_experience(conn, experience_id, &PredicateSet::unrestricted())
}

/// Permanently deletes an experience entry.
///
/// # Errors
///
/// Returns [`PersistenceError::NotFound`] if the entry does not exist.
pub fn delete_experience(
    conn: &mut SqliteConnection,
    experience_id: i64,
) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::delete(experiences::table)
        .filter(experiences::experience_id.eq(experience_id))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Experience {experience_id}"
        )));
    }

    info!(experience_id, "Deleted experience");
    Ok(())
}
