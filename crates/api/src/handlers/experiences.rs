// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use folio_domain::{
    Dependent, Experience, ExperiencePatch, Page, PredicateSet, Privilege, StateFilter,
    VisibilityPolicy, timestamp_now, validate_experience,
};
use folio_persistence::SqlitePersistence;
use tracing::{debug, info};

use super::fetch_parent_organization;
use crate::auth::{AuthorizationService, Caller};
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::request_response::{
    CreateExperienceRequest, ExperienceView, ExportLevel, ListExperiencesResponse, ListQuery,
    PatchExperienceRequest,
};

const RESOURCE: &str = "Experience";

/// Creates an experience entry under an existing organization. Admin only.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, the organization does
/// not exist, or a field is invalid.
pub fn create_experience(
    persistence: &mut SqlitePersistence,
    caller: &Caller,
    request: CreateExperienceRequest,
) -> Result<ExperienceView, ApiError> {
    AuthorizationService::require_admin(caller, "create_experience")?;

    let draft: Experience = request.into_draft(timestamp_now())?;
    fetch_parent_organization(persistence, caller, draft.organization_id)?;
    validate_experience(&draft).map_err(translate_domain_error)?;

    let created: Dependent<Experience> = persistence
        .create_experience(&draft)
        .map_err(|e| translate_persistence_error(e, RESOURCE))?;

    ExperienceView::export(&created, ExportLevel::Admin)
}

/// Reads one experience entry.
///
/// Non-admins only see it while neither it nor its organization is
/// trashed; otherwise it is reported as not found.
///
/// # Errors
///
/// Returns [`ApiError::ResourceNotFound`] if it is absent or hidden.
pub fn get_experience(
    persistence: &mut SqlitePersistence,
    caller: &Caller,
    experience_id: i64,
) -> Result<ExperienceView, ApiError> {
    let privilege: Privilege = caller.privilege();
    let experience: Dependent<Experience> = if privilege.is_admin() {
        persistence.get_any_experience_by_id(experience_id)
    } else {
        persistence.get_experience_by_id(experience_id)
    }
    .map_err(|e| translate_persistence_error(e, RESOURCE))?;

    ExperienceView::export(&experience, ExportLevel::for_privilege(privilege))
}

/// Lists experience entries, ongoing ones first and then most recent.
///
/// # Errors
///
/// Returns an error if an admin sends a malformed `op`, or the query fails.
pub fn list_experiences(
    persistence: &mut SqlitePersistence,
    caller: &Caller,
    query: &ListQuery,
) -> Result<ListExperiencesResponse, ApiError> {
    let privilege: Privilege = caller.privilege();
    let filter: StateFilter = query.state_filter(privilege)?;
    let predicates: PredicateSet = VisibilityPolicy::resolve(privilege, &filter);
    let page: Page = query.page();

    let level: ExportLevel = ExportLevel::for_privilege(privilege);
    let experiences: Vec<ExperienceView> = persistence
        .list_experiences(&predicates, page)
        .map_err(|e| translate_persistence_error(e, RESOURCE))?
        .iter()
        .map(|experience| ExperienceView::export(experience, level))
        .collect::<Result<_, _>>()?;

    Ok(ListExperiencesResponse {
        experiences,
        offset: page.offset(),
        limit: page.limit(),
    })
}

/// Applies a partial update: field changes, re-parenting and trashing or
/// restoring. Admin only.
///
/// The entry is loaded whatever its state, the patch is merged, and the
/// merged record is validated as a whole before a single write. A patch
/// that changes nothing is not written.
///
/// # Errors
///
/// - [`ApiError::ResourceNotFound`] if the entry does not exist.
/// - [`ApiError::InvalidInput`] on `organization_id` if the new parent does
///   not exist, or on the first invalid field of the merged record.
pub fn update_experience(
    persistence: &mut SqlitePersistence,
    caller: &Caller,
    experience_id: i64,
    request: PatchExperienceRequest,
) -> Result<ExperienceView, ApiError> {
    AuthorizationService::require_admin(caller, "update_experience")?;

    let patch: ExperiencePatch = request.into_patch()?;
    let existing: Dependent<Experience> = persistence
        .get_any_experience_by_id(experience_id)
        .map_err(|e| translate_persistence_error(e, RESOURCE))?;

    let merged: Experience = patch.merge(&existing.record, timestamp_now());
    if merged.organization_id != existing.record.organization_id {
        fetch_parent_organization(persistence, caller, merged.organization_id)?;
    }
    validate_experience(&merged).map_err(translate_domain_error)?;

    if merged == existing.record {
        debug!(experience_id, "Patch leaves experience unchanged");
        return ExperienceView::export(&existing, ExportLevel::Admin);
    }

    let updated: Dependent<Experience> = persistence
        .update_experience(&merged)
        .map_err(|e| translate_persistence_error(e, RESOURCE))?;
    info!(
        experience_id,
        organization_id = updated.record.organization_id,
        trashed = updated.record.deleted_at.is_some(),
        "Experience patched"
    );

    ExperienceView::export(&updated, ExportLevel::Admin)
}

/// Hard-deletes an experience entry. Admin only.
///
/// # Errors
///
/// Returns [`ApiError::ResourceNotFound`] if it does not exist.
pub fn delete_experience(
    persistence: &mut SqlitePersistence,
    caller: &Caller,
    experience_id: i64,
) -> Result<(), ApiError> {
    AuthorizationService::require_admin(caller, "delete_experience")?;

    persistence
        .delete_experience(experience_id)
        .map_err(|e| translate_persistence_error(e, RESOURCE))
}
