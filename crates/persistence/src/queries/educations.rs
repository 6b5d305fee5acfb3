// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::Bool;
use folio_domain::{Dependent, Education, Page, PredicateSet};
use tracing::debug;

use super::{EDUCATIONS, ORGANIZATIONS};
use crate::data_models::{EducationRow, OrganizationRow};
use crate::diesel_schema::{educations, organizations};
use crate::error::PersistenceError;

fn into_dependent(
    (row, organization): (EducationRow, OrganizationRow),
) -> Result<Dependent<Education>, PersistenceError> {
    Ok(Dependent {
        record: row.into_domain()?,
        organization: organization.into_domain()?,
    })
}

/// Retrieves an education entry and its organization, provided the pair
/// satisfies `predicates`.
///
/// # Errors
///
/// Returns [`PersistenceError::NotFound`] when no row matches, whether it
/// is absent or filtered out.
pub fn get_education(
    conn: &mut SqliteConnection,
    education_id: i64,
    predicates: &PredicateSet,
) -> Result<Dependent<Education>, PersistenceError> {
    debug!(education_id, ?predicates, "Fetching education");

    let mut query = educations::table
        .inner_join(organizations::table)
        .filter(educations::education_id.eq(education_id))
        .select((EducationRow::as_select(), OrganizationRow::as_select()))
        .into_boxed();
    if let Some(clause) = predicates.where_clause(EDUCATIONS, ORGANIZATIONS) {
        query = query.filter(sql::<Bool>(&clause));
    }

    let row = query
        .first::<(EducationRow, OrganizationRow)>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("Education {education_id}")))?;
    into_dependent(row)
}

/// Lists education entries, unfinished ones first, then by end year and
/// start year, newest first.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_educations(
    conn: &mut SqliteConnection,
    predicates: &PredicateSet,
    page: Page,
) -> Result<Vec<Dependent<Education>>, PersistenceError> {
    let mut query = educations::table
        .inner_join(organizations::table)
        .select((EducationRow::as_select(), OrganizationRow::as_select()))
        .into_boxed();
    if let Some(clause) = predicates.where_clause(EDUCATIONS, ORGANIZATIONS) {
        query = query.filter(sql::<Bool>(&clause));
    }

    query
        .order_by((
            educations::end_year.is_null().desc(),
            educations::end_year.desc(),
            educations::start_year.desc(),
            educations::education_id.desc(),
        ))
        .offset(page.offset())
        .limit(page.limit())
        .load::<(EducationRow, OrganizationRow)>(conn)?
        .into_iter()
        .map(into_dependent)
        .collect()
}
