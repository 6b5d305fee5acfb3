// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use folio_domain::{Organization, PredicateSet, timestamp_now};
use tracing::{info, warn};

use crate::backend::PersistenceBackend;
use crate::data_models::{format_optional_timestamp, format_timestamp};
use crate::diesel_schema::organizations;
use crate::error::PersistenceError;
use crate::queries::organizations::{count_dependents, get_organization};

/// Inserts a new organization.
///
/// The ID and timestamps of `draft` are ignored; the database assigns the
/// ID and both timestamps are set to the current time.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_organization(
    conn: &mut SqliteConnection,
    draft: &Organization,
) -> Result<Organization, PersistenceError> {
    let now: String = format_timestamp(timestamp_now())?;

    diesel::insert_into(organizations::table)
        .values((
            organizations::name.eq(&draft.name),
            organizations::website.eq(&draft.website),
            organizations::location.eq(&draft.location),
            organizations::created_at.eq(&now),
            organizations::updated_at.eq(&now),
            organizations::deleted_at.eq(format_optional_timestamp(draft.deleted_at)?),
        ))
        .execute(conn)?;

    let organization_id: i64 = conn.get_last_insert_rowid()?;
    info!(organization_id, name = %draft.name, "Created organization");

    get_organization(conn, organization_id, &PredicateSet::unrestricted())
}

/// Overwrites the mutable columns of an organization, including its
/// deletion timestamp.
///
/// # Errors
///
/// Returns [`PersistenceError::NotFound`] if the organization does not
/// exist.
pub fn update_organization(
    conn: &mut SqliteConnection,
    organization: &Organization,
) -> Result<Organization, PersistenceError> {
    let organization_id: i64 = organization.organization_id;

    let rows_affected: usize = diesel::update(organizations::table)
        .filter(organizations::organization_id.eq(organization_id))
        .set((
            organizations::name.eq(&organization.name),
            organizations::website.eq(&organization.website),
            organizations::location.eq(&organization.location),
            organizations::updated_at.eq(format_timestamp(timestamp_now())?),
            organizations::deleted_at.eq(format_optional_timestamp(organization.deleted_at)?),
        ))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Organization {organization_id}"
        )));
    }

    info!(
        organization_id,
        trashed = organization.deleted_at.is_some(),
        "Updated organization"
    );
    get_organization(conn, organization_id, &PredicateSet::unrestricted())
}

/// Permanently deletes an organization.
///
/// Refused while any experience or education entry references it, trashed
/// entries included.
///
/// # Errors
///
/// Returns [`PersistenceError::OrganizationReferenced`] if entries still
/// reference the organization, or [`PersistenceError::NotFound`] if it does
/// not exist.
pub fn delete_organization(
    conn: &mut SqliteConnection,
    organization_id: i64,
) -> Result<(), PersistenceError> {
    let dependents: i64 = count_dependents(conn, organization_id)?;
    if dependents > 0 {
        warn!(
            organization_id,
            dependents, "Refusing to delete referenced organization"
        );
        return Err(PersistenceError::OrganizationReferenced {
            organization_id,
            dependents,
        });
    }

    let rows_affected: usize = diesel::delete(organizations::table)
        .filter(organizations::organization_id.eq(organization_id))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Organization {organization_id}"
        )));
    }

    info!(organization_id, "Deleted organization");
    Ok(())
}
