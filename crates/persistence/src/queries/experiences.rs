// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::Bool;
use folio_domain::{Dependent, Experience, Page, PredicateSet};
use tracing::debug;

use super::{EXPERIENCES, ORGANIZATIONS};
use crate::data_models::{ExperienceRow, OrganizationRow};
use crate::diesel_schema::{experiences, organizations};
use crate::error::PersistenceError;

fn into_dependent(
    (row, organization): (ExperienceRow, OrganizationRow),
) -> Result<Dependent<Experience>, PersistenceError> {
    Ok(Dependent {
        record: row.into_domain()?,
        organization: organization.into_domain()?,
    })
}

/// Retrieves an experience entry and its organization, provided the pair
/// satisfies `predicates`.
///
/// # Errors
///
/// Returns [`PersistenceError::NotFound`] when no row matches, whether it
/// is absent or filtered out.
pub fn get_experience(
    conn: &mut SqliteConnection,
    experience_id: i64,
    predicates: &PredicateSet,
) -> Result<Dependent<Experience>, PersistenceError> {
    debug!(experience_id, ?predicates, "Fetching experience");

    let mut query = experiences::table
        .inner_join(organizations::table)
        .filter(experiences::experience_id.eq(experience_id))
        .select((ExperienceRow::as_select(), OrganizationRow::as_select()))
        .into_boxed();
    if let Some(clause) = predicates.where_clause(EXPERIENCES, ORGANIZATIONS) {
        query = query.filter(sql::<Bool>(&clause));
    }

    let row = query
        .first::<(ExperienceRow, OrganizationRow)>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("Experience {experience_id}")))?;
    into_dependent(row)
}

/// Lists experience entries, ongoing roles first, then by end date and
/// start date, newest first.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_experiences(
    conn: &mut SqliteConnection,
    predicates: &PredicateSet,
    page: Page,
) -> Result<Vec<Dependent<Experience>>, PersistenceError> {
    let mut query = experiences::table
        .inner_join(organizations::table)
        .select((ExperienceRow::as_select(), OrganizationRow::as_select()))
        .into_boxed();
    if let Some(clause) = predicates.where_clause(EXPERIENCES, ORGANIZATIONS) {
        query = query.filter(sql::<Bool>(&clause));
    }

    query
        .order_by((
            experiences::end_date.is_null().desc(),
            experiences::end_date.desc(),
            experiences::start_date.desc(),
            experiences::experience_id.desc(),
        ))
        .offset(page.offset())
        .limit(page.limit())
        .load::<(ExperienceRow, OrganizationRow)>(conn)?
        .into_iter()
        .map(into_dependent)
        .collect()
}
