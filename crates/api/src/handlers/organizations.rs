// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use folio_domain::{
    Organization, OrganizationPatch, Page, PredicateSet, Privilege, StateFilter,
    VisibilityPolicy, timestamp_now, validate_organization,
};
use folio_persistence::SqlitePersistence;
use tracing::{debug, info};

use crate::auth::{AuthorizationService, Caller};
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::request_response::{
    CreateOrganizationRequest, ExportLevel, ListOrganizationsResponse, ListQuery,
    OrganizationView, PatchOrganizationRequest,
};

const RESOURCE: &str = "Organization";

/// Creates an organization. Admin only.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, a field is invalid, or
/// the insert fails.
pub fn create_organization(
    persistence: &mut SqlitePersistence,
    caller: &Caller,
    request: CreateOrganizationRequest,
) -> Result<OrganizationView, ApiError> {
    AuthorizationService::require_admin(caller, "create_organization")?;

    let draft: Organization = request.into_draft(timestamp_now());
    validate_organization(&draft).map_err(translate_domain_error)?;

    let created: Organization = persistence
        .create_organization(&draft)
        .map_err(|e| translate_persistence_error(e, RESOURCE))?;

    OrganizationView::export(&created, ExportLevel::Admin)
}

/// Reads one organization. Trashed organizations are only visible to admins.
///
/// # Errors
///
/// Returns [`ApiError::ResourceNotFound`] if it is absent or hidden.
pub fn get_organization(
    persistence: &mut SqlitePersistence,
    caller: &Caller,
    organization_id: i64,
) -> Result<OrganizationView, ApiError> {
    let privilege: Privilege = caller.privilege();
    let organization: Organization = if privilege.is_admin() {
        persistence.get_any_organization_by_id(organization_id)
    } else {
        persistence.get_organization_by_id(organization_id)
    }
    .map_err(|e| translate_persistence_error(e, RESOURCE))?;

    OrganizationView::export(&organization, ExportLevel::for_privilege(privilege))
}

/// Lists organizations by name.
///
/// # Errors
///
/// Returns an error if an admin sends a malformed `op`, or the query fails.
pub fn list_organizations(
    persistence: &mut SqlitePersistence,
    caller: &Caller,
    query: &ListQuery,
) -> Result<ListOrganizationsResponse, ApiError> {
    let privilege: Privilege = caller.privilege();
    let filter: StateFilter = query.state_filter(privilege)?;
    let predicates: PredicateSet = VisibilityPolicy::resolve_standalone(privilege, &filter);
    let page: Page = query.page();

    let level: ExportLevel = ExportLevel::for_privilege(privilege);
    let organizations: Vec<OrganizationView> = persistence
        .list_organizations(&predicates, page)
        .map_err(|e| translate_persistence_error(e, RESOURCE))?
        .iter()
        .map(|organization| OrganizationView::export(organization, level))
        .collect::<Result<_, _>>()?;

    Ok(ListOrganizationsResponse {
        organizations,
        offset: page.offset(),
        limit: page.limit(),
    })
}

/// Applies a partial update, including trashing and restoring. Admin only.
///
/// A patch that changes nothing is not written, so repeating a request
/// returns the same payload.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, the organization does
/// not exist, or the merged record is invalid.
pub fn update_organization(
    persistence: &mut SqlitePersistence,
    caller: &Caller,
    organization_id: i64,
    request: PatchOrganizationRequest,
) -> Result<OrganizationView, ApiError> {
    AuthorizationService::require_admin(caller, "update_organization")?;

    let patch: OrganizationPatch = request.into();
    let existing: Organization = persistence
        .get_any_organization_by_id(organization_id)
        .map_err(|e| translate_persistence_error(e, RESOURCE))?;

    let merged: Organization = patch.merge(&existing, timestamp_now());
    validate_organization(&merged).map_err(translate_domain_error)?;

    if merged == existing {
        debug!(organization_id, "Patch leaves organization unchanged");
        return OrganizationView::export(&existing, ExportLevel::Admin);
    }

    let updated: Organization = persistence
        .update_organization(&merged)
        .map_err(|e| translate_persistence_error(e, RESOURCE))?;
    info!(
        organization_id,
        trashed = updated.deleted_at.is_some(),
        "Organization patched"
    );

    OrganizationView::export(&updated, ExportLevel::Admin)
}

/// Hard-deletes an organization. Admin only.
///
/// # Errors
///
/// Returns [`ApiError::Conflict`] on `organization_id` while experience or
/// education entries still reference it, trashed ones included.
pub fn delete_organization(
    persistence: &mut SqlitePersistence,
    caller: &Caller,
    organization_id: i64,
) -> Result<(), ApiError> {
    AuthorizationService::require_admin(caller, "delete_organization")?;

    persistence
        .delete_organization(organization_id)
        .map_err(|e| translate_persistence_error(e, RESOURCE))
}
