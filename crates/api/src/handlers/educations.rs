// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use folio_domain::{
    Dependent, Education, EducationPatch, Page, PredicateSet, Privilege, StateFilter,
    VisibilityPolicy, timestamp_now, validate_education,
};
use folio_persistence::SqlitePersistence;
use tracing::{debug, info};

use super::fetch_parent_organization;
use crate::auth::{AuthorizationService, Caller};
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::request_response::{
    CreateEducationRequest, EducationView, ExportLevel, ListEducationsResponse, ListQuery,
    PatchEducationRequest,
};

const RESOURCE: &str = "Education";

/// Creates an education entry under an existing organization. Admin only.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, the organization does
/// not exist, or a field is invalid.
pub fn create_education(
    persistence: &mut SqlitePersistence,
    caller: &Caller,
    request: CreateEducationRequest,
) -> Result<EducationView, ApiError> {
    AuthorizationService::require_admin(caller, "create_education")?;

    let draft: Education = request.into_draft(timestamp_now());
    fetch_parent_organization(persistence, caller, draft.organization_id)?;
    validate_education(&draft).map_err(translate_domain_error)?;

    let created: Dependent<Education> = persistence
        .create_education(&draft)
        .map_err(|e| translate_persistence_error(e, RESOURCE))?;

    EducationView::export(&created, ExportLevel::Admin)
}

/// Reads one education entry; hidden from non-admins once it or its
/// organization is trashed.
///
/// # Errors
///
/// Returns [`ApiError::ResourceNotFound`] if it is absent or hidden.
pub fn get_education(
    persistence: &mut SqlitePersistence,
    caller: &Caller,
    education_id: i64,
) -> Result<EducationView, ApiError> {
    let privilege: Privilege = caller.privilege();
    let education: Dependent<Education> = if privilege.is_admin() {
        persistence.get_any_education_by_id(education_id)
    } else {
        persistence.get_education_by_id(education_id)
    }
    .map_err(|e| translate_persistence_error(e, RESOURCE))?;

    EducationView::export(&education, ExportLevel::for_privilege(privilege))
}

/// Lists education entries, ongoing ones first and then most recent.
///
/// # Errors
///
/// Returns an error if an admin sends a malformed `op`, or the query fails.
pub fn list_educations(
    persistence: &mut SqlitePersistence,
    caller: &Caller,
    query: &ListQuery,
) -> Result<ListEducationsResponse, ApiError> {
    let privilege: Privilege = caller.privilege();
    let filter: StateFilter = query.state_filter(privilege)?;
    let predicates: PredicateSet = VisibilityPolicy::resolve(privilege, &filter);
    let page: Page = query.page();

    let level: ExportLevel = ExportLevel::for_privilege(privilege);
    let educations: Vec<EducationView> = persistence
        .list_educations(&predicates, page)
        .map_err(|e| translate_persistence_error(e, RESOURCE))?
        .iter()
        .map(|education| EducationView::export(education, level))
        .collect::<Result<_, _>>()?;

    Ok(ListEducationsResponse {
        educations,
        offset: page.offset(),
        limit: page.limit(),
    })
}

/// Applies a partial update to an education entry. Admin only.
///
/// Same flow as experience updates: load whatever the state, merge,
/// check a new parent, validate the merged record, write once.
///
/// # Errors
///
/// - [`ApiError::ResourceNotFound`] if the entry does not exist.
/// - [`ApiError::InvalidInput`] on `organization_id` if the new parent does
///   not exist, or on the first invalid field of the merged record.
pub fn update_education(
    persistence: &mut SqlitePersistence,
    caller: &Caller,
    education_id: i64,
    request: PatchEducationRequest,
) -> Result<EducationView, ApiError> {
    AuthorizationService::require_admin(caller, "update_education")?;

    let patch: EducationPatch = request.into();
    let existing: Dependent<Education> = persistence
        .get_any_education_by_id(education_id)
        .map_err(|e| translate_persistence_error(e, RESOURCE))?;

    let merged: Education = patch.merge(&existing.record, timestamp_now());
    if merged.organization_id != existing.record.organization_id {
        fetch_parent_organization(persistence, caller, merged.organization_id)?;
    }
    validate_education(&merged).map_err(translate_domain_error)?;

    if merged == existing.record {
        debug!(education_id, "Patch leaves education unchanged");
        return EducationView::export(&existing, ExportLevel::Admin);
    }

    let updated: Dependent<Education> = persistence
        .update_education(&merged)
        .map_err(|e| translate_persistence_error(e, RESOURCE))?;
    info!(
        education_id,
        organization_id = updated.record.organization_id,
        trashed = updated.record.deleted_at.is_some(),
        "Education patched"
    );

    EducationView::export(&updated, ExportLevel::Admin)
}

/// Hard-deletes an education entry. Admin only.
///
/// # Errors
///
/// Returns [`ApiError::ResourceNotFound`] if it does not exist.
pub fn delete_education(
    persistence: &mut SqlitePersistence,
    caller: &Caller,
    education_id: i64,
) -> Result<(), ApiError> {
    AuthorizationService::require_admin(caller, "delete_education")?;

    persistence
        .delete_education(education_id)
        .map_err(|e| translate_persistence_error(e, RESOURCE))
}
