// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::Bool;
use folio_domain::{Organization, Page, PredicateSet};
use tracing::debug;

use super::ORGANIZATIONS;
use crate::data_models::OrganizationRow;
use crate::diesel_schema::{educations, experiences, organizations};
use crate::error::PersistenceError;

/// Retrieves an organization that satisfies `predicates`.
///
/// # Errors
///
/// Returns [`PersistenceError::NotFound`] when no row matches, whether it
/// is absent or filtered out.
pub fn get_organization(
    conn: &mut SqliteConnection,
    organization_id: i64,
    predicates: &PredicateSet,
) -> Result<Organization, PersistenceError> {
    debug!(organization_id, ?predicates, "Fetching organization");

    let mut query = organizations::table
        .filter(organizations::organization_id.eq(organization_id))
        .select(OrganizationRow::as_select())
        .into_boxed();
    if let Some(clause) = predicates.where_clause(ORGANIZATIONS, ORGANIZATIONS) {
        query = query.filter(sql::<Bool>(&clause));
    }

    query
        .first::<OrganizationRow>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("Organization {organization_id}")))?
        .into_domain()
}

/// Lists organizations by name.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_organizations(
    conn: &mut SqliteConnection,
    predicates: &PredicateSet,
    page: Page,
) -> Result<Vec<Organization>, PersistenceError> {
    let mut query = organizations::table
        .select(OrganizationRow::as_select())
        .into_boxed();
    if let Some(clause) = predicates.where_clause(ORGANIZATIONS, ORGANIZATIONS) {
        query = query.filter(sql::<Bool>(&clause));
    }

    query
        .order_by((organizations::name.asc(), organizations::organization_id.asc()))
        .offset(page.offset())
        .limit(page.limit())
        .load::<OrganizationRow>(conn)?
        .into_iter()
        .map(OrganizationRow::into_domain)
        .collect()
}

/// Counts the experience and education entries that reference an
/// organization, trashed or not.
///
/// # Errors
///
/// Returns an error if either count fails.
pub fn count_dependents(
    conn: &mut SqliteConnection,
    organization_id: i64,
) -> Result<i64, PersistenceError> {
    let experience_count: i64 = experiences::table
        .filter(experiences::organization_id.eq(organization_id))
        .count()
        .get_result(conn)?;
    let education_count: i64 = educations::table
        .filter(educations::organization_id.eq(organization_id))
        .count()
        .get_result(conn)?;

    Ok(experience_count + education_count)
}
