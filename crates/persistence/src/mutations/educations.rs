// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use folio_domain::{Dependent, Education, PredicateSet, timestamp_now};
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::data_models::{format_optional_timestamp, format_timestamp};
use crate::diesel_schema::educations;
use crate::error::PersistenceError;
use crate::queries::educations::get_education;

/// Inserts a new education entry.
///
/// The ID and timestamps of `draft` are ignored. The owning organization
/// must exist; foreign key enforcement rejects the insert otherwise.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_education(
    conn: &mut SqliteConnection,
    draft: &Education,
) -> Result<Dependent<Education>, PersistenceError> {
    let now: String = format_timestamp(timestamp_now())?;

    diesel::insert_into(educations::table)
        .values((
            educations::organization_id.eq(draft.organization_id),
            educations::degree.eq(&draft.degree),
            educations::field_of_study.eq(&draft.field_of_study),
            educations::gpa.eq(&draft.gpa),
            educations::activities.eq(&draft.activities),
            educations::start_year.eq(draft.start_year),
            educations::end_year.eq(draft.end_year),
            educations::created_at.eq(&now),
            educations::updated_at.eq(&now),
            educations::deleted_at.eq(format_optional_timestamp(draft.deleted_at)?),
        ))
        .execute(conn)?;

    let education_id: i64 = conn.get_last_insert_rowid()?;
    info!(
        education_id,
        organization_id = draft.organization_id,
        "Created education"
    );

    get_education(conn, education_id, &PredicateSet::unrestricted())
}

/// Overwrites the mutable columns of an education entry, including its
/// organization and deletion timestamp.
///
/// # Errors
///
/// Returns [`PersistenceError::NotFound`] if the entry does not exist.
pub fn update_education(
    conn: &mut SqliteConnection,
    education: &Education,
) -> Result<Dependent<Education>, PersistenceError> {
    let education_id: i64 = education.education_id;

    let rows_affected: usize = diesel::update(educations::table)
        .filter(educations::education_id.eq(education_id))
        .set((
            educations::organization_id.eq(education.organization_id),
            educations::degree.eq(&education.degree),
            educations::field_of_study.eq(&education.field_of_study),
            educations::gpa.eq(&education.gpa),
            educations::activities.eq(&education.activities),
            educations::start_year.eq(education.start_year),
            educations::end_year.eq(education.end_year),
            educations::updated_at.eq(format_timestamp(timestamp_now())?),
            educations::deleted_at.eq(format_optional_timestamp(education.deleted_at)?),
        ))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Education {education_id}"
        )));
    }

    info!(
        education_id,
        organization_id = education.organization_id,
        trashed = education.deleted_at.is_some(),
        "Updated education"
    );
    get_education(conn, education_id, &PredicateSet::unrestricted())
}

/// Permanently deletes an education entry.
///
/// # Errors
///
/// Returns [`PersistenceError::NotFound`] if the entry does not exist.
pub fn delete_education(
    conn: &mut SqliteConnection,
    education_id: i64,
) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::delete(educations::table)
        .filter(educations::education_id.eq(education_id))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Education {education_id}"
        )));
    }

    info!(education_id, "Deleted education");
    Ok(())
}
